//! CSS preview for the style key under the cursor.

use anyhow::Result;
use serde::Serialize;

use crate::application::style_context::{always_visited, span_base, style_call, Bookkeeping};
use crate::domain::ast::{Call, KeyValue, Node};
use crate::domain::children::{ChildRef, Field};
use crate::domain::document::{Document, Position, Range};
use crate::domain::evaluate::{evaluate, property_key};
use crate::domain::scope::{CallKind, ScopeTracker};
use crate::domain::synthesize::{synthesize, DeclarationContext};
use crate::domain::walk::{walk, CancellationToken, Flow, Visitor};
use crate::ports::ValueNormalizer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    /// Markdown with one fenced `css` block.
    pub contents: String,
    /// The hovered key.
    pub range: Range,
}

/// Finds the style key at `position` and renders the CSS it compiles to.
pub fn hover(
    document: &Document,
    tree: &Node,
    tracker: ScopeTracker,
    position: Position,
    normalizer: &dyn ValueNormalizer,
    token: &CancellationToken,
) -> Result<Option<Hover>> {
    let mut visitor = HoverVisitor {
        books: Bookkeeping::new(tracker),
        document,
        normalizer,
        base: span_base(document, tree),
        cursor: document.byte_of_position(position),
        hover: None,
    };
    let outcome = walk(tree, &mut visitor, token, HoverState::default());
    let HoverVisitor { books, hover, .. } = visitor;
    if let Some(found) = &hover {
        log::debug!("[Hover] Found preview at {:?}", found.range.start);
    }
    books.finish(outcome, "Hover", hover).map(Option::flatten)
}

#[derive(Debug, Clone, Default)]
struct HoverState {
    call: Option<CallKind>,
    /// Variable the enclosing call is assigned to.
    caller: Option<String>,
    parents: Vec<String>,
    value_type: Option<String>,
    /// Key whose value is the next style call (`animationName: keyframes(...)`).
    pending_caller: Option<String>,
}

struct HoverVisitor<'a> {
    books: Bookkeeping,
    document: &'a Document,
    normalizer: &'a dyn ValueNormalizer,
    base: u32,
    cursor: usize,
    hover: Option<Hover>,
}

impl Visitor for HoverVisitor<'_> {
    type State = HoverState;

    fn wildcard(&mut self, node: &Node, _state: &HoverState) -> Flow<HoverState> {
        if always_visited(node) {
            return Flow::Continue;
        }
        let span = node.span();
        let start = self.document.local_byte(span.start, self.base);
        let end = self.document.local_byte(span.end, self.base);
        if self.cursor < start || self.cursor > end {
            Flow::Skip
        } else {
            Flow::Continue
        }
    }

    fn enter(&mut self, node: &Node, parent: Option<&Node>, state: &HoverState) -> Flow<HoverState> {
        if let Some(flow) = self.books.enter(node) {
            return flow;
        }
        match node {
            Node::CallExpression(call) => self.call_expression(call, parent, state),
            Node::KeyValueProperty(property) => self.key_value(property, state),
            _ => Flow::Continue,
        }
    }

    fn exit(&mut self, node: &Node, _state: &HoverState) -> Flow<HoverState> {
        self.books.exit(node)
    }
}

impl HoverVisitor<'_> {
    fn call_expression(&self, call: &Call, parent: Option<&Node>, state: &HoverState) -> Flow<HoverState> {
        let tracker = &self.books.tracker;

        if let Some(kind) = style_call(tracker, call) {
            let caller = match parent {
                Some(Node::VariableDeclarator(declarator)) => declarator.id.as_identifier().map(str::to_string),
                _ => state.pending_caller.clone(),
            };
            let next = HoverState { call: Some(kind), caller, pending_caller: None, ..state.clone() };
            return match kind {
                CallKind::Create | CallKind::Keyframes => Flow::Replace(next),
                // The first argument of createTheme is the variable group, not styles.
                CallKind::CreateTheme => Flow::ReplaceIgnoring {
                    state: next,
                    ignore: vec![ChildRef::at(Field::Arguments, 0), ChildRef::field(Field::Callee)],
                },
                CallKind::DefineVars => Flow::ReplaceIgnoring {
                    state: next,
                    ignore: vec![ChildRef::field(Field::Callee)],
                },
            };
        }

        if let Some(value_type) = tracker.resolve_value_type(&call.callee) {
            return Flow::Replace(HoverState { value_type: Some(value_type), ..state.clone() });
        }

        Flow::Replace(HoverState { call: None, caller: None, pending_caller: None, ..state.clone() })
    }

    fn key_value(&mut self, property: &KeyValue, state: &HoverState) -> Flow<HoverState> {
        let Some(call) = state.call else {
            return Flow::Continue;
        };
        let tracker = &self.books.tracker;
        let Some(key) = property_key(&property.key, tracker) else {
            return Flow::Continue;
        };

        let mut value = property.value.as_ref();
        let mut value_type = state.value_type.clone();
        if let Node::CallExpression(inner) = value {
            if let Some(declared) = tracker.resolve_value_type(&inner.callee) {
                let Some(first) = inner.arguments.first() else {
                    return Flow::Skip;
                };
                value = &first.expression;
                value_type = Some(declared);
            }
        }

        if matches!(value, Node::ObjectExpression(_) | Node::ArrowFunctionExpression(_)) {
            let mut next = state.clone();
            next.parents.push(key);
            return Flow::Replace(next);
        }

        if let Node::CallExpression(inner) = property.value.as_ref() {
            if style_call(tracker, inner) == Some(CallKind::Keyframes) {
                return Flow::Replace(HoverState {
                    call: Some(CallKind::Keyframes),
                    caller: None,
                    parents: Vec::new(),
                    value_type: state.value_type.clone(),
                    pending_caller: Some(key),
                });
            }
        }

        let key_span = property.key.span();
        let start = self.document.local_byte(key_span.start, self.base);
        let end = self.document.local_byte(key_span.end, self.base);
        if self.cursor < start || self.cursor > end {
            return Flow::Continue;
        }

        let ctx = DeclarationContext {
            call,
            caller: state.caller.as_deref(),
            parents: &state.parents,
            key: &key,
            value_type: value_type.as_deref(),
        };
        let evaluated = evaluate(value, tracker);
        if let Some(preview) = synthesize(&ctx, &evaluated, self.normalizer) {
            self.hover = Some(Hover {
                contents: preview.to_markdown(),
                range: self.document.range_of_span(key_span, self.base),
            });
        }
        Flow::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast_builder::*;
    use crate::infrastructure::normalizer::StylexValueNormalizer;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "import * as stylex from '@stylexjs/stylex';\n";

    fn header(b: &mut Locator) -> Node {
        import(vec![namespace_specifier(b.ident("stylex"))], b.str("@stylexjs/stylex"))
    }

    fn hover_at(source: &str, tree: &Node, needle: &str) -> Option<Hover> {
        let document = Document::new("file:///t.ts", "typescript", 1, source);
        let byte = source.find(needle).expect("needle in source") + 1;
        let position = document.position_of_byte(byte);
        hover(
            &document,
            tree,
            ScopeTracker::new(),
            position,
            &StylexValueNormalizer::default(),
            &CancellationToken::new(),
        )
        .unwrap()
    }

    /// `const styles = stylex.create({ <name>: { <property>: <value> } });`
    fn create_module(source: &str, name: &str, property: &str, value: impl FnOnce(&mut Locator) -> Node) -> Node {
        let mut b = Locator::new(source);
        let import_decl = header(&mut b);
        let id = b.ident("styles");
        let callee = member(b.ident("stylex"), b.ident("create"));
        let namespace = b.ident(name);
        let key = b.ident(property);
        let value = value(&mut b);
        let styles = object(vec![prop(namespace, object(vec![prop(key, value)]))]);
        let body = vec![import_decl, const_decl(id, call(callee, vec![styles]))];
        b.module(body)
    }

    #[test]
    fn test_hover_on_create_key() {
        let source = format!("{}const styles = stylex.create({{ button: {{ color: 'blue' }} }});", HEADER);
        let tree = create_module(&source, "button", "color", |b| b.str("blue"));

        let found = hover_at(&source, &tree, "color").expect("hover");
        assert_eq!(found.contents, "```css\n.button {\n  color: blue;\n}\n```");
        let column = source.lines().nth(1).unwrap().find("color").unwrap() as u32;
        assert_eq!(found.range, Range::new(Position::new(1, column), Position::new(1, column + 5)));
    }

    #[test]
    fn test_no_hover_away_from_keys() {
        let source = format!("{}const styles = stylex.create({{ button: {{ color: 'blue' }} }});", HEADER);
        let tree = create_module(&source, "button", "color", |b| b.str("blue"));

        assert_eq!(hover_at(&source, &tree, "blue"), None);
        assert_eq!(hover_at(&source, &tree, "const"), None);
    }

    #[test]
    fn test_constants_fold_into_the_preview() {
        let source = format!(
            "{}const size = 16;\nconst styles = stylex.create({{ box: {{ width: size }} }});",
            HEADER
        );
        let mut b = Locator::new(&source);
        let import_decl = header(&mut b);
        let size_decl = const_decl(b.ident("size"), b.num(16.0));
        let id = b.ident("styles");
        let callee = member(b.ident("stylex"), b.ident("create"));
        let namespace = b.ident("box");
        let key = b.ident("width");
        let value = b.ident("size");
        let styles = object(vec![prop(namespace, object(vec![prop(key, value)]))]);
        let body = vec![import_decl, size_decl, const_decl(id, call(callee, vec![styles]))];
        let tree = b.module(body);

        let found = hover_at(&source, &tree, "width").expect("hover");
        assert_eq!(found.contents, "```css\n.box {\n  width: 16px;\n}\n```");
    }

    #[test]
    fn test_define_vars_uses_caller_class() {
        let source = format!("{}export const vars = stylex.defineVars({{ primary: 'red' }});", HEADER);
        let mut b = Locator::new(&source);
        let import_decl = header(&mut b);
        let id = b.ident("vars");
        let callee = member(b.ident("stylex"), b.ident("defineVars"));
        let key = b.ident("primary");
        let value = b.str("red");
        let decl = export(const_decl(id, call(callee, vec![object(vec![prop(key, value)])])));
        let tree = b.module(vec![import_decl, decl]);

        let found = hover_at(&source, &tree, "primary").expect("hover");
        assert_eq!(found.contents, "```css\n.vars {\n  --primary: red;\n}\n```");
    }

    #[test]
    fn test_nested_keyframes_take_the_key_as_name() {
        let source = format!(
            "{}const styles = stylex.create({{ fade: {{ animationName: stylex.keyframes({{ from: {{ opacity: 0 }} }}) }} }});",
            HEADER
        );
        let mut b = Locator::new(&source);
        let import_decl = header(&mut b);
        let id = b.ident("styles");
        let create = member(b.ident("stylex"), b.ident("create"));
        let fade = b.ident("fade");
        let animation_name = b.ident("animationName");
        let keyframes = member(b.ident("stylex"), b.ident("keyframes"));
        let from = b.ident("from");
        let opacity = b.ident("opacity");
        let zero = b.num(0.0);
        let frames = call(keyframes, vec![object(vec![prop(from, object(vec![prop(opacity, zero)]))])]);
        let styles = object(vec![prop(fade, object(vec![prop(animation_name, frames)]))]);
        let tree = b.module(vec![import_decl, const_decl(id, call(create, vec![styles]))]);

        let found = hover_at(&source, &tree, "opacity").expect("hover");
        assert_eq!(
            found.contents,
            "```css\n@keyframes animationName {\n  from {\n    opacity: 0;\n  }\n}\n```"
        );
    }

    #[test]
    fn test_dynamic_value_has_no_preview() {
        let source = format!("{}const styles = stylex.create({{ box: {{ width: f() }} }});", HEADER);
        let tree = create_module(&source, "box", "width", |b| call(b.ident("f"), vec![]));
        assert_eq!(hover_at(&source, &tree, "width"), None);
    }

    #[test]
    fn test_foreign_namespace_is_ignored() {
        let source = "const styles = css.create({ box: { width: 1 } });";
        let mut b = Locator::new(source);
        let id = b.ident("styles");
        let callee = member(b.ident("css"), b.ident("create"));
        let namespace = b.ident("box");
        let key = b.ident("width");
        let value = b.num(1.0);
        let styles = object(vec![prop(namespace, object(vec![prop(key, value)]))]);
        let tree = b.module(vec![const_decl(id, call(callee, vec![styles]))]);
        assert_eq!(hover_at(source, &tree, "width"), None);
    }

    #[test]
    fn test_spans_with_a_base_offset() {
        let source = format!("{}const styles = stylex.create({{ button: {{ color: 'blue' }} }});", HEADER);
        let mut b = Locator::with_base(&source, 4096);
        let import_decl = header(&mut b);
        let id = b.ident("styles");
        let callee = member(b.ident("stylex"), b.ident("create"));
        let namespace = b.ident("button");
        let key = b.ident("color");
        let value = b.str("blue");
        let styles = object(vec![prop(namespace, object(vec![prop(key, value)]))]);
        let tree = b.module(vec![import_decl, const_decl(id, call(callee, vec![styles]))]);

        assert!(hover_at(&source, &tree, "color").is_some());
    }

    #[test]
    fn test_canceled_request_has_no_answer() {
        let source = format!("{}const styles = stylex.create({{ button: {{ color: 'blue' }} }});", HEADER);
        let tree = create_module(&source, "button", "color", |b| b.str("blue"));
        let document = Document::new("file:///t.ts", "typescript", 1, source.as_str());
        let token = CancellationToken::new();
        token.cancel();

        let result = hover(
            &document,
            &tree,
            ScopeTracker::new(),
            Position::new(1, 34),
            &StylexValueNormalizer::default(),
            &token,
        )
        .unwrap();
        assert_eq!(result, None);
    }
}
