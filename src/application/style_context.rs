// Bookkeeping shared by the capability visitors: constant scopes, alias
// registration and recognition of style API calls.

use anyhow::Result;

use crate::domain::ast::{Call, Node, VariableDeclaration};
use crate::domain::document::Document;
use crate::domain::evaluate::evaluate;
use crate::domain::imports::{register_import, register_require};
use crate::domain::scope::{CallKind, ScopeError, ScopeTracker};
use crate::domain::walk::{Flow, WalkOutcome};

/// Scope and alias state for one walk.
pub(crate) struct Bookkeeping {
    pub tracker: ScopeTracker,
    error: Option<ScopeError>,
}

impl Bookkeeping {
    pub fn new(tracker: ScopeTracker) -> Self {
        Self { tracker, error: None }
    }

    /// Pre-order bookkeeping. `Some` means the node is done with.
    pub fn enter<S>(&mut self, node: &Node) -> Option<Flow<S>> {
        let outcome = match node {
            Node::Module(_) | Node::Script(_) | Node::BlockStatement(_) => {
                self.tracker.push_scope();
                Ok(false)
            }
            Node::VariableDeclaration(decl) if decl.kind == "const" => {
                bind_constants(&mut self.tracker, decl).map(|_| false)
            }
            Node::VariableDeclarator(declarator) => {
                register_require(&mut self.tracker, declarator);
                Ok(false)
            }
            Node::ImportDeclaration(decl) => {
                register_import(&mut self.tracker, decl);
                Ok(true)
            }
            Node::WithStatement(_) => Ok(true),
            _ => Ok(false),
        };
        match outcome {
            Ok(true) => Some(Flow::Skip),
            Ok(false) => None,
            Err(error) => {
                self.error = Some(error);
                Some(Flow::Exit)
            }
        }
    }

    /// Post-order bookkeeping: pops the frame a scope node pushed.
    pub fn exit<S>(&mut self, node: &Node) -> Flow<S> {
        if !matches!(node, Node::Module(_) | Node::Script(_) | Node::BlockStatement(_)) {
            return Flow::Continue;
        }
        match self.tracker.pop_scope() {
            Ok(()) => Flow::Continue,
            Err(error) => {
                self.error = Some(error);
                Flow::Exit
            }
        }
    }

    /// Turns a finished walk into the capability's answer: scope errors
    /// propagate, cancellation means no answer.
    pub fn finish<T>(self, outcome: WalkOutcome, component: &str, answer: T) -> Result<Option<T>> {
        if let Some(error) = self.error {
            return Err(error.into());
        }
        if outcome.canceled() {
            log::debug!("[{}] Request canceled", component);
            return Ok(None);
        }
        Ok(Some(answer))
    }
}

/// The style API call a call expression makes, if any.
pub(crate) fn style_call(tracker: &ScopeTracker, call: &Call) -> Option<CallKind> {
    tracker.resolve_callee(&call.callee).and_then(|member| member.call_kind())
}

/// Nodes the cursor-based visitors never prune: they carry bindings and
/// aliases that later nodes depend on.
pub(crate) fn always_visited(node: &Node) -> bool {
    matches!(
        node,
        Node::Module(_)
            | Node::Script(_)
            | Node::ImportDeclaration(_)
            | Node::ExportDeclaration(_)
            | Node::VariableDeclaration(_)
            | Node::VariableDeclarator(_)
    )
}

/// Parser offset of the document's first byte.
pub(crate) fn span_base(document: &Document, tree: &Node) -> u32 {
    match tree {
        Node::Module(program) | Node::Script(program) => document.span_base(program.span.start),
        other => document.span_base(other.span().start),
    }
}

fn bind_constants(tracker: &mut ScopeTracker, decl: &VariableDeclaration) -> Result<(), ScopeError> {
    for declarator in &decl.declarations {
        let Node::VariableDeclarator(declarator) = declarator else {
            continue;
        };
        let (Some(name), Some(init)) = (declarator.id.as_identifier(), declarator.init.as_deref()) else {
            continue;
        };
        if let Some(value) = evaluate(init, tracker).into_value() {
            tracker.bind(name, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast_builder::*;
    use crate::domain::value::Value;

    #[test]
    fn test_constants_bound_in_innermost_frame() {
        let mut b = Locator::new("const a = 1; { const a = 2; }");
        let outer = const_decl(b.ident("a"), b.num(1.0));
        let inner = const_decl(b.ident("a"), b.num(2.0));
        let inner_block = block(vec![inner.clone()]);

        let mut books = Bookkeeping::new(ScopeTracker::new());
        assert!(books.enter::<()>(&b.module(vec![])).is_none());
        books.enter::<()>(&outer);
        books.enter::<()>(&inner_block);
        books.enter::<()>(&inner);
        assert_eq!(books.tracker.lookup("a"), Some(&Value::Number(2.0)));

        books.exit::<()>(&inner_block);
        assert_eq!(books.tracker.lookup("a"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_let_and_dynamic_constants_are_not_bound() {
        let mut b = Locator::new("let a = 1; const c = f();");
        let let_decl = declaration("let", vec![declarator(b.ident("a"), b.num(1.0))]);
        let dynamic = const_decl(b.ident("c"), call(b.ident("f"), vec![]));

        let mut books = Bookkeeping::new(ScopeTracker::new());
        books.enter::<()>(&b.module(vec![]));
        books.enter::<()>(&let_decl);
        books.enter::<()>(&dynamic);
        assert_eq!(books.tracker.lookup("a"), None);
        assert_eq!(books.tracker.lookup("c"), None);
    }

    #[test]
    fn test_imports_are_registered_and_skipped() {
        let mut b = Locator::new("import * as css from 'stylex'");
        let decl = import(vec![namespace_specifier(b.ident("css"))], b.str("stylex"));

        let mut books = Bookkeeping::new(ScopeTracker::new());
        assert_eq!(books.enter::<()>(&decl), Some(Flow::Skip));
        assert!(books.tracker.is_namespace("css"));
    }

    #[test]
    fn test_unbalanced_exit_is_an_error() {
        let mut books = Bookkeeping::new(ScopeTracker::new());
        let empty = block(vec![]);
        assert_eq!(books.exit::<()>(&empty), Flow::Exit);
        assert!(books.finish(WalkOutcome::Terminated, "Test", ()).is_err());
    }

    #[test]
    fn test_canceled_walk_has_no_answer() {
        let books = Bookkeeping::new(ScopeTracker::new());
        assert_eq!(books.finish(WalkOutcome::Canceled, "Test", 1).unwrap(), None);
    }
}
