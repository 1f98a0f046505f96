//! Value completions inside style string literals.
//!
//! The literal under the cursor is copied into a one-declaration virtual
//! stylesheet, the CSS completion service answers for that document, and the
//! edit ranges are shifted back onto the source.

use anyhow::Result;
use serde::Serialize;

use crate::application::style_context::{always_visited, span_base, style_call, Bookkeeping};
use crate::domain::ast::{Call, KeyValue, Node, StringLiteral};
use crate::domain::children::{ChildRef, Field};
use crate::domain::document::{Document, Position, Range};
use crate::domain::evaluate::property_key;
use crate::domain::scope::{ApiMember, CallKind, ScopeTracker};
use crate::domain::synthesize::dashify;
use crate::domain::virtual_document::VirtualDocument;
use crate::domain::walk::{walk, CancellationToken, Flow, Visitor};
use crate::ports::{CompletionItem, CssCompletionService};

/// Property name used for theme values, which may hold any CSS value.
pub const CUSTOM_PROPERTY: &str = "--stylelens-custom";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionList {
    pub items: Vec<CompletionItem>,
    pub is_incomplete: bool,
}

pub fn completions(
    document: &Document,
    tree: &Node,
    tracker: ScopeTracker,
    position: Position,
    service: &dyn CssCompletionService,
    token: &CancellationToken,
) -> Result<Option<CompletionList>> {
    let mut visitor = CompletionVisitor {
        books: Bookkeeping::new(tracker),
        document,
        service,
        base: span_base(document, tree),
        position,
        items: Vec::new(),
    };
    let outcome = walk(tree, &mut visitor, token, CompletionState::default());
    let CompletionVisitor { books, items, .. } = visitor;
    log::debug!("[Completion] {} items for {}", items.len(), document.uri);
    books.finish(outcome, "Completion", CompletionList { items, is_incomplete: true })
}

#[derive(Debug, Clone, Default)]
struct CompletionState {
    call: Option<CallKind>,
    property: Option<String>,
    /// Object nesting inside the style call; properties sit at depth 2.
    depth: u32,
}

struct CompletionVisitor<'a> {
    books: Bookkeeping,
    document: &'a Document,
    service: &'a dyn CssCompletionService,
    base: u32,
    position: Position,
    items: Vec<CompletionItem>,
}

impl Visitor for CompletionVisitor<'_> {
    type State = CompletionState;

    fn wildcard(&mut self, node: &Node, _state: &CompletionState) -> Flow<CompletionState> {
        if always_visited(node) {
            return Flow::Continue;
        }
        let range = self.document.range_of_span(node.span(), self.base);
        if self.position.line < range.start.line || self.position.line > range.end.line {
            Flow::Skip
        } else {
            Flow::Continue
        }
    }

    fn enter(&mut self, node: &Node, parent: Option<&Node>, state: &CompletionState) -> Flow<CompletionState> {
        if let Some(flow) = self.books.enter(node) {
            return flow;
        }
        match node {
            Node::CallExpression(call) => self.call_expression(call, state),
            Node::KeyValueProperty(property) => self.key_value(property, state),
            Node::StringLiteral(literal) => {
                let is_key = matches!(parent, Some(Node::KeyValueProperty(kv)) if kv.key.span() == literal.span);
                if is_key {
                    Flow::Continue
                } else {
                    self.string_literal(literal, state)
                }
            }
            _ => Flow::Continue,
        }
    }

    fn exit(&mut self, node: &Node, _state: &CompletionState) -> Flow<CompletionState> {
        self.books.exit(node)
    }
}

impl CompletionVisitor<'_> {
    fn call_expression(&self, call: &Call, state: &CompletionState) -> Flow<CompletionState> {
        let tracker = &self.books.tracker;
        if let Some(kind) = style_call(tracker, call) {
            let next = CompletionState { call: Some(kind), depth: 1, ..state.clone() };
            return match kind {
                CallKind::Create | CallKind::Keyframes => Flow::Replace(next),
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
        // Fallback lists keep the property context.
        if tracker.resolve_callee(&call.callee) == Some(ApiMember::FirstThatWorks) {
            return Flow::Continue;
        }
        Flow::Replace(CompletionState { call: None, ..state.clone() })
    }

    fn key_value(&self, property: &KeyValue, state: &CompletionState) -> Flow<CompletionState> {
        let Some(call) = state.call else {
            return Flow::Continue;
        };
        if call.is_theme() {
            let nested = matches!(property.value.as_ref(), Node::ObjectExpression(_));
            return Flow::Replace(CompletionState {
                property: Some(CUSTOM_PROPERTY.to_string()),
                depth: state.depth + u32::from(nested),
                ..state.clone()
            });
        }
        if state.depth == 2 {
            return Flow::Replace(CompletionState {
                property: property_key(&property.key, &self.books.tracker),
                depth: 3,
                ..state.clone()
            });
        }
        Flow::Replace(CompletionState { depth: state.depth + 1, ..state.clone() })
    }

    fn string_literal(&mut self, literal: &StringLiteral, state: &CompletionState) -> Flow<CompletionState> {
        if state.call.is_none() || state.property.as_deref() == Some("content") {
            return Flow::Continue;
        }
        let range = self.document.range_of_span(literal.span, self.base);
        if !range.contains(self.position) {
            return Flow::Skip;
        }

        let property = dashify(state.property.as_deref().unwrap_or("--custom"));
        let virtual_doc = VirtualDocument::new(&property, &literal.value);
        let inside = self.position.character.saturating_sub(range.start.character) as usize;
        let virtual_position = virtual_doc.position_at(virtual_doc.map_offset(inside));

        let line_delta = i64::from(self.position.line) - i64::from(virtual_position.line);
        let character_delta = i64::from(self.position.character) - i64::from(virtual_position.character);
        self.items = self
            .service
            .complete(&virtual_doc, virtual_position)
            .into_iter()
            .map(|mut item| {
                if let Some(edit) = item.text_edit.as_mut() {
                    edit.range = shift(edit.range, line_delta, character_delta);
                }
                item
            })
            .collect();
        Flow::Exit
    }
}

fn shift(range: Range, lines: i64, characters: i64) -> Range {
    let moved = |position: Position| {
        Position::new(
            (i64::from(position.line) + lines).max(0) as u32,
            (i64::from(position.character) + characters).max(0) as u32,
        )
    };
    Range::new(moved(range.start), moved(range.end))
}
