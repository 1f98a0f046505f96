//! Registers style-namespace aliases from `import` declarations and
//! `require` calls.

use crate::domain::ast::{ImportDeclaration, Node, VariableDeclarator};
use crate::domain::evaluate::property_key;
use crate::domain::scope::ScopeTracker;

/// Applies one import declaration. Imports from modules outside the
/// allow-list are ignored.
pub fn register_import(tracker: &mut ScopeTracker, decl: &ImportDeclaration) {
    let Some(source) = decl.source.as_string_literal() else {
        return;
    };
    if !tracker.accepts_module(source) {
        return;
    }

    for specifier in &decl.specifiers {
        match specifier {
            Node::ImportDefaultSpecifier(spec) | Node::ImportNamespaceSpecifier(spec) => {
                if let Some(local) = spec.local.as_identifier() {
                    tracker.add_namespace(local);
                }
            }
            Node::ImportSpecifier(spec) => {
                let Some(local) = spec.local.as_identifier() else {
                    continue;
                };
                let imported = spec
                    .imported
                    .as_deref()
                    .and_then(Node::module_export_name)
                    .unwrap_or(local);
                if imported == "default" {
                    tracker.add_namespace(local);
                } else {
                    tracker.add_member(local, imported);
                }
            }
            _ => {}
        }
    }
}

/// Applies `const x = require("module")` and its destructuring forms.
pub fn register_require(tracker: &mut ScopeTracker, declarator: &VariableDeclarator) {
    let Some(init) = declarator.init.as_deref() else {
        return;
    };
    let Some(module) = required_module(init) else {
        return;
    };
    if !tracker.accepts_module(module) {
        return;
    }
    // `require(m).default` is the namespace itself.
    let is_default_access = matches!(init, Node::MemberExpression(_));

    match declarator.id.as_ref() {
        Node::Identifier(ident) => tracker.add_namespace(ident.value.clone()),
        Node::ObjectPattern(pattern) => {
            for property in &pattern.properties {
                match property {
                    Node::KeyValuePatternProperty(kv) => {
                        let Some(key) = property_key(&kv.key, tracker) else {
                            continue;
                        };
                        let Some(local) = binding_name(&kv.value) else {
                            continue;
                        };
                        if key == "default" && !is_default_access {
                            tracker.add_namespace(local);
                        } else {
                            tracker.add_member(local, &key);
                        }
                    }
                    Node::AssignmentPatternProperty(prop) => {
                        if let Some(key) = prop.key.as_identifier() {
                            tracker.add_member(key, key);
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

/// Module specifier of `require("m")` or `require("m").default`.
fn required_module(init: &Node) -> Option<&str> {
    match init {
        Node::CallExpression(call) => {
            if call.callee.as_identifier() != Some("require") {
                return None;
            }
            let first = call.arguments.first()?;
            if first.is_spread() {
                return None;
            }
            first.expression.as_string_literal()
        }
        Node::MemberExpression(member) if member.property.as_identifier() == Some("default") => {
            match member.object.as_ref() {
                call @ Node::CallExpression(_) => required_module(call),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Local name bound by a destructuring target (`x` or `x = fallback`).
fn binding_name(target: &Node) -> Option<&str> {
    match target {
        Node::Identifier(ident) => Some(&ident.value),
        Node::AssignmentPattern(assign) => assign.left.as_identifier(),
        _ => None,
    }
}
