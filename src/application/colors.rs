//! Color swatches for static color values in style objects and in
//! `StyleXStyles<{...}>` type arguments.

use anyhow::Result;

use crate::application::style_context::{span_base, style_call, Bookkeeping};
use crate::domain::ast::{KeyValue, Node, Span, TsTypeReference};
use crate::domain::color::{parse_color, ColorInformation};
use crate::domain::document::Document;
use crate::domain::evaluate::evaluate;
use crate::domain::scope::{ApiMember, CallKind, ScopeTracker};
use crate::domain::value::{Evaluation, Value};
use crate::domain::walk::{walk, CancellationToken, Flow, Visitor};

/// Every color swatch in the document, sorted by range start.
pub fn document_colors(
    document: &Document,
    tree: &Node,
    tracker: ScopeTracker,
    token: &CancellationToken,
) -> Result<Option<Vec<ColorInformation>>> {
    let mut visitor = ColorVisitor {
        books: Bookkeeping::new(tracker),
        document,
        base: span_base(document, tree),
        colors: Vec::new(),
    };
    let outcome = walk(tree, &mut visitor, token, None);
    let ColorVisitor { books, mut colors, .. } = visitor;
    colors.sort_by(|a, b| a.range.start.cmp(&b.range.start));
    log::debug!("[Colors] Found {} colors in {}", colors.len(), document.uri);
    books.finish(outcome, "Colors", colors)
}

struct ColorVisitor<'a> {
    books: Bookkeeping,
    document: &'a Document,
    base: u32,
    colors: Vec<ColorInformation>,
}

impl Visitor for ColorVisitor<'_> {
    /// The style call the node sits in.
    type State = Option<CallKind>;

    fn enter(&mut self, node: &Node, _parent: Option<&Node>, state: &Option<CallKind>) -> Flow<Option<CallKind>> {
        if let Some(flow) = self.books.enter(node) {
            return flow;
        }
        match node {
            Node::CallExpression(call) => match style_call(&self.books.tracker, call) {
                Some(kind) => Flow::Replace(Some(kind)),
                None => Flow::Continue,
            },
            Node::TsTypeReference(reference) => {
                self.type_reference(reference);
                Flow::Continue
            }
            Node::KeyValueProperty(property) if state.is_some() => self.key_value(property),
            _ => Flow::Continue,
        }
    }

    fn exit(&mut self, node: &Node, _state: &Option<CallKind>) -> Flow<Option<CallKind>> {
        self.books.exit(node)
    }
}

impl ColorVisitor<'_> {
    fn key_value(&mut self, property: &KeyValue) -> Flow<Option<CallKind>> {
        let mut value = property.value.as_ref();
        if !may_hold_color(value) {
            return Flow::Continue;
        }

        let tracker = &self.books.tracker;
        if let Node::CallExpression(inner) = value {
            if let Some(value_type) = tracker.resolve_value_type(&inner.callee) {
                if value_type != "color" {
                    return Flow::Skip;
                }
                let Some(first) = inner.arguments.first() else {
                    return Flow::Continue;
                };
                if may_hold_color(&first.expression) {
                    value = &first.expression;
                }
            }
        }

        match evaluate(value, tracker) {
            Evaluation::Static { value: Value::String(text), span } => self.push(&text, span),
            Evaluation::Static { value: Value::Array(items), .. } => {
                for item in items {
                    if let Evaluation::Static { value: Value::String(text), span } = item {
                        self.push(&text, span);
                    }
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn type_reference(&mut self, reference: &TsTypeReference) {
        let tracker = &self.books.tracker;
        let is_style_type = match reference.type_name.as_ref() {
            Node::Identifier(ident) => matches!(
                tracker.member(&ident.value),
                Some(ApiMember::StyleXStyles | ApiMember::StaticStyles)
            ),
            Node::TsQualifiedName(name) => {
                name.left.as_identifier().is_some_and(|ns| tracker.is_namespace(ns))
                    && matches!(name.right.as_identifier(), Some("StyleXStyles" | "StaticStyles"))
            }
            _ => false,
        };
        if !is_style_type {
            return;
        }
        let Some(Node::TsTypeParameterInstantiation(params)) = reference.type_params.as_deref() else {
            return;
        };

        for param in &params.params {
            let Node::TsTypeLiteral(literal) = param else {
                continue;
            };
            for member in &literal.members {
                let Node::TsPropertySignature(signature) = member else {
                    continue;
                };
                if let Some(Node::TsTypeAnnotation(annotation)) = signature.type_annotation.as_deref() {
                    self.type_strings(&annotation.type_annotation);
                }
            }
        }
    }

    fn type_strings(&mut self, ty: &Node) {
        match ty {
            Node::TsUnionType(union) => {
                for member in union.types.iter().filter(|t| matches!(t, Node::TsLiteralType(_))) {
                    self.type_strings(member);
                }
            }
            Node::TsLiteralType(literal) => {
                if !matches!(literal.literal.as_ref(), Node::StringLiteral(_) | Node::TemplateLiteral(_)) {
                    return;
                }
                if let Evaluation::Static { value: Value::String(text), span } =
                    evaluate(&literal.literal, &self.books.tracker)
                {
                    self.push(&text, span);
                }
            }
            _ => {}
        }
    }

    /// Records a swatch for a quoted literal; the range excludes the quotes.
    fn push(&mut self, text: &str, span: Span) {
        let Some(color) = parse_color(text) else {
            return;
        };
        if color.alpha == 0.0 {
            return;
        }
        let start = self.document.local_byte(span.start, self.base);
        let end = self.document.local_byte(span.end, self.base);
        let quoted = matches!(self.document.text().as_bytes().get(start), Some(b'"' | b'\'' | b'`'));
        if !quoted || end < start + 2 {
            return;
        }
        self.colors.push(ColorInformation { range: self.document.range_of(start + 1, end - 1), color });
    }
}

fn may_hold_color(value: &Node) -> bool {
    matches!(
        value,
        Node::StringLiteral(_) | Node::CallExpression(_) | Node::ArrayExpression(_) | Node::TemplateLiteral(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast_builder::*;
    use crate::domain::color::Rgba;
    use crate::domain::document::{Position, Range};

    const HEADER: &str = "import * as stylex from '@stylexjs/stylex';\n";

    fn colors_of(source: &str, tree: &Node) -> Vec<ColorInformation> {
        let document = Document::new("file:///t.ts", "typescript", 1, source);
        document_colors(&document, tree, ScopeTracker::new(), &CancellationToken::new())
            .unwrap()
            .expect("completed walk")
    }

    fn range_inside(source: &str, literal: &str) -> Range {
        let line = source.lines().position(|l| l.contains(literal)).unwrap() as u32;
        let column = source.lines().nth(line as usize).unwrap().find(literal).unwrap() as u32;
        Range::new(Position::new(line, column + 1), Position::new(line, column + literal.len() as u32 - 1))
    }

    /// `const s = stylex.create({ a: { <property>: <value> } });`
    fn create_module(source: &str, property: &str, value: impl FnOnce(&mut Locator) -> Node) -> Node {
        let mut b = Locator::new(source);
        let import_decl = import(vec![namespace_specifier(b.ident("stylex"))], b.str("@stylexjs/stylex"));
        let id = b.ident("s");
        let callee = member(b.ident("stylex"), b.ident("create"));
        let namespace = b.ident("a");
        let key = b.ident(property);
        let value = value(&mut b);
        let styles = object(vec![prop(namespace, object(vec![prop(key, value)]))]);
        let body = vec![import_decl, const_decl(id, call(callee, vec![styles]))];
        b.module(body)
    }

    #[test]
    fn test_string_color_range_excludes_quotes() {
        let source = format!("{}const s = stylex.create({{ a: {{ color: 'red' }} }});", HEADER);
        let tree = create_module(&source, "color", |b| b.str("red"));

        let colors = colors_of(&source, &tree);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].range, range_inside(&source, "'red'"));
        assert_eq!(colors[0].color, Rgba { red: 1.0, green: 0.0, blue: 0.0, alpha: 1.0 });
    }

    #[test]
    fn test_array_fallbacks_and_transparent_values() {
        let source = format!(
            "{}const s = stylex.create({{ a: {{ color: ['#00ff00', 'transparent', 'rgba(0, 0, 0, 0)'] }} }});",
            HEADER
        );
        let tree = create_module(&source, "color", |b| {
            array(vec![b.str("#00ff00"), b.str("transparent"), b.str("rgba(0, 0, 0, 0)")])
        });

        let colors = colors_of(&source, &tree);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].range, range_inside(&source, "'#00ff00'"));
    }

    #[test]
    fn test_types_color_is_unwrapped_and_other_types_skipped() {
        let source = format!(
            "{}const s = stylex.create({{ a: {{ color: stylex.types.color('blue') }} }});",
            HEADER
        );
        let tree = create_module(&source, "color", |b| {
            let callee = member(member(b.ident("stylex"), b.ident("types")), b.ident("color"));
            call(callee, vec![b.str("blue")])
        });
        assert_eq!(colors_of(&source, &tree).len(), 1);

        let source = format!(
            "{}const s = stylex.create({{ a: {{ width: stylex.types.length('red') }} }});",
            HEADER
        );
        let tree = create_module(&source, "width", |b| {
            let callee = member(member(b.ident("stylex"), b.ident("types")), b.ident("length"));
            call(callee, vec![b.str("red")])
        });
        assert!(colors_of(&source, &tree).is_empty());
    }

    #[test]
    fn test_constants_are_not_swatches_at_their_use() {
        let source = format!(
            "{}const red = 'red';\nconst s = stylex.create({{ a: {{ color: red }} }});",
            HEADER
        );
        let mut b = Locator::new(&source);
        let import_decl = import(vec![namespace_specifier(b.ident("stylex"))], b.str("@stylexjs/stylex"));
        let red_decl = const_decl(b.ident("red"), b.str("red"));
        let id = b.ident("s");
        let callee = member(b.ident("stylex"), b.ident("create"));
        let namespace = b.ident("a");
        let key = b.ident("color");
        let value = b.ident("red");
        let styles = object(vec![prop(namespace, object(vec![prop(key, value)]))]);
        let tree = b.module(vec![import_decl, red_decl, const_decl(id, call(callee, vec![styles]))]);

        assert!(colors_of(&source, &tree).is_empty());
    }

    #[test]
    fn test_values_outside_style_calls_are_ignored() {
        let source = "const s = { color: 'red' };";
        let mut b = Locator::new(source);
        let id = b.ident("s");
        let key = b.ident("color");
        let value = b.str("red");
        let tree = b.module(vec![const_decl(id, object(vec![prop(key, value)]))]);
        assert!(colors_of(source, &tree).is_empty());
    }

    #[test]
    fn test_style_type_arguments() {
        let source = "import type { StyleXStyles } from '@stylexjs/stylex';\ntype P = StyleXStyles<{ color: 'red' | 'blue' }>;";
        let mut b = Locator::new(source);
        let specifier = named_specifier(b.ident("StyleXStyles"), None);
        let import_decl = import(vec![specifier], b.str("@stylexjs/stylex"));
        let alias = b.ident("P");
        let name = b.ident("StyleXStyles");
        let key = b.ident("color");
        let union = union_type(vec![literal_type(b.str("red")), literal_type(b.str("blue"))]);
        let ty = type_ref(name, vec![type_literal(vec![property_signature(key, union)])]);
        let tree = b.module(vec![import_decl, type_alias(alias, ty)]);

        let colors = colors_of(source, &tree);
        assert_eq!(colors.len(), 2);
        assert_eq!(colors[0].range, range_inside(source, "'red'"));
        assert_eq!(colors[1].range, range_inside(source, "'blue'"));
    }
}
