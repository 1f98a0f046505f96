//! Lexical constant scopes and style-namespace aliases.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::domain::ast::Node;
use crate::domain::synthesize::dashify;
use crate::domain::value::Value;

/// Module specifiers accepted as the style namespace unless configured.
pub const DEFAULT_MODULES: &[&str] = &["@stylexjs/stylex", "stylex"];

/// Identifier treated as the style namespace even without an import.
pub const DEFAULT_NAMESPACE: &str = "stylex";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("cannot pop a scope frame from an empty stack")]
    Underflow,
    #[error("cannot bind `{0}` without an active scope frame")]
    NoActiveScope(String),
}

/// Canonical members of the style namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiMember {
    Create,
    CreateTheme,
    DefineVars,
    Keyframes,
    FirstThatWorks,
    Types,
    Props,
    StyleXStyles,
    StaticStyles,
    Other(String),
}

/// API calls that produce style objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Create,
    CreateTheme,
    DefineVars,
    Keyframes,
}

impl CallKind {
    /// Theme contexts declare custom properties on `:root` or a theme class.
    pub fn is_theme(self) -> bool {
        matches!(self, CallKind::CreateTheme | CallKind::DefineVars)
    }
}

impl ApiMember {
    pub fn from_name(name: &str) -> Self {
        match name {
            "create" => ApiMember::Create,
            "createTheme" => ApiMember::CreateTheme,
            "defineVars" => ApiMember::DefineVars,
            "keyframes" => ApiMember::Keyframes,
            "firstThatWorks" => ApiMember::FirstThatWorks,
            "types" => ApiMember::Types,
            "props" => ApiMember::Props,
            "StyleXStyles" => ApiMember::StyleXStyles,
            "StaticStyles" => ApiMember::StaticStyles,
            other => ApiMember::Other(other.to_string()),
        }
    }

    pub fn call_kind(&self) -> Option<CallKind> {
        match self {
            ApiMember::Create => Some(CallKind::Create),
            ApiMember::CreateTheme => Some(CallKind::CreateTheme),
            ApiMember::DefineVars => Some(CallKind::DefineVars),
            ApiMember::Keyframes => Some(CallKind::Keyframes),
            _ => None,
        }
    }
}

/// Per-request scope stack plus alias registry.
#[derive(Debug, Clone)]
pub struct ScopeTracker {
    frames: Vec<HashMap<String, Value>>,
    namespaces: HashSet<String>,
    members: HashMap<String, ApiMember>,
    modules: Vec<String>,
}

impl Default for ScopeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::with_modules(DEFAULT_MODULES.iter().copied())
    }

    /// A tracker accepting imports only from the given module specifiers.
    pub fn with_modules<I, S>(modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut namespaces = HashSet::new();
        namespaces.insert(DEFAULT_NAMESPACE.to_string());
        Self {
            frames: Vec::new(),
            namespaces,
            members: HashMap::new(),
            modules: modules.into_iter().map(Into::into).collect(),
        }
    }

    // ───── Constant scopes ─────

    pub fn push_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) -> Result<(), ScopeError> {
        self.frames.pop().map(|_| ()).ok_or(ScopeError::Underflow)
    }

    /// Binds `name` in the innermost frame, shadowing outer bindings.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> Result<(), ScopeError> {
        let name = name.into();
        match self.frames.last_mut() {
            Some(frame) => {
                frame.insert(name, value);
                Ok(())
            }
            None => Err(ScopeError::NoActiveScope(name)),
        }
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    // ───── Aliases ─────

    pub fn accepts_module(&self, specifier: &str) -> bool {
        self.modules.iter().any(|m| m == specifier)
    }

    pub fn add_namespace(&mut self, local: impl Into<String>) {
        self.namespaces.insert(local.into());
    }

    pub fn is_namespace(&self, name: &str) -> bool {
        self.namespaces.contains(name)
    }

    /// Registers `local` as an alias of the namespace member `imported`.
    pub fn add_member(&mut self, local: impl Into<String>, imported: &str) {
        self.members.insert(local.into(), ApiMember::from_name(imported));
    }

    pub fn member(&self, local: &str) -> Option<&ApiMember> {
        self.members.get(local)
    }

    /// Resolves `ns.member` or a local alias to its canonical member.
    pub fn resolve_callee(&self, callee: &Node) -> Option<ApiMember> {
        match callee {
            Node::Identifier(ident) => self.member(&ident.value).cloned(),
            Node::MemberExpression(member) => {
                let object = member.object.as_identifier()?;
                if !self.is_namespace(object) {
                    return None;
                }
                member.property.as_identifier().map(ApiMember::from_name)
            }
            _ => None,
        }
    }

    /// Dashed name of a CSS value-type constructor (`ns.types.lengthPercentage`
    /// gives `length-percentage`).
    pub fn resolve_value_type(&self, callee: &Node) -> Option<String> {
        let Node::MemberExpression(member) = callee else {
            return None;
        };
        let type_name = member.property.as_identifier()?;
        let is_types = match member.object.as_ref() {
            Node::Identifier(ident) => self.member(&ident.value) == Some(&ApiMember::Types),
            object @ Node::MemberExpression(_) => {
                self.resolve_callee(object) == Some(ApiMember::Types)
            }
            _ => false,
        };
        is_types.then(|| dashify(type_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innermost_binding_wins() {
        let mut tracker = ScopeTracker::new();
        tracker.push_scope();
        tracker.bind("a", Value::Number(1.0)).unwrap();
        tracker.push_scope();
        tracker.bind("a", Value::Number(2.0)).unwrap();
        assert_eq!(tracker.lookup("a"), Some(&Value::Number(2.0)));

        tracker.pop_scope().unwrap();
        assert_eq!(tracker.lookup("a"), Some(&Value::Number(1.0)));

        tracker.pop_scope().unwrap();
        assert_eq!(tracker.lookup("a"), None);
    }

    #[test]
    fn test_underflow_is_an_error() {
        let mut tracker = ScopeTracker::new();
        assert_eq!(tracker.pop_scope(), Err(ScopeError::Underflow));
        assert_eq!(
            tracker.bind("x", Value::Null),
            Err(ScopeError::NoActiveScope("x".into()))
        );
    }

    #[test]
    fn test_default_namespace_and_allow_list() {
        let tracker = ScopeTracker::with_modules(["@acme/styles"]);
        assert!(tracker.is_namespace("stylex"));
        assert!(tracker.accepts_module("@acme/styles"));
        assert!(!tracker.accepts_module("@stylexjs/stylex"));
    }

    #[test]
    fn test_call_kinds() {
        assert_eq!(ApiMember::from_name("keyframes").call_kind(), Some(CallKind::Keyframes));
        assert_eq!(ApiMember::from_name("firstThatWorks").call_kind(), None);
        assert!(CallKind::DefineVars.is_theme());
        assert!(!CallKind::Create.is_theme());
    }
}
