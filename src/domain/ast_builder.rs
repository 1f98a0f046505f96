//! Programmatic syntax tree construction.
//!
//! [`Locator`] creates leaf nodes and finds their spans by scanning the
//! source text left to right, so leaves must be created in source order.
//! Container constructors are free functions whose span is the union of
//! their children. Used where a tree is needed without running a parser.

use crate::domain::ast::*;
use crate::domain::document::leading_trivia_len;
use crate::domain::value::format_number;

/// Creates leaves with spans located in `source`.
#[derive(Debug, Clone)]
pub struct Locator<'s> {
    source: &'s str,
    cursor: usize,
    base: u32,
}

impl<'s> Locator<'s> {
    pub fn new(source: &'s str) -> Self {
        Self::with_base(source, 0)
    }

    /// Offsets every span by `base`, as parsers sharing a source map do.
    pub fn with_base(source: &'s str, base: u32) -> Self {
        Self { source, cursor: 0, base }
    }

    pub fn ident(&mut self, name: &str) -> Node {
        let span = self.find_word(name);
        Node::Identifier(Identifier { span, value: name.to_string(), ..Default::default() })
    }

    pub fn str(&mut self, value: &str) -> Node {
        let single = format!("'{}'", value);
        let double = format!("\"{}\"", value);
        let rest = &self.source[self.cursor..];
        let (quoted, found) = match (rest.find(&single), rest.find(&double)) {
            (Some(a), Some(b)) if b < a => (double, Some(b)),
            (Some(a), _) => (single, Some(a)),
            (None, found) => (double, found),
        };
        let span = self.claim(found, quoted.len());
        Node::StringLiteral(StringLiteral { span, value: value.to_string(), raw: Some(quoted) })
    }

    pub fn num(&mut self, value: f64) -> Node {
        let span = self.find_word(&format_number(value));
        Node::NumericLiteral(NumericLiteral { span, value, raw: None })
    }

    pub fn boolean(&mut self, value: bool) -> Node {
        let span = self.find_word(if value { "true" } else { "false" });
        Node::BooleanLiteral(BooleanLiteral { span, value })
    }

    pub fn null(&mut self) -> Node {
        Node::NullLiteral(Leaf { span: self.find_word("null") })
    }

    /// Module spanning the source from its first token to its end.
    pub fn module(&self, body: Vec<Node>) -> Node {
        let start = self.base + leading_trivia_len(self.source) as u32;
        let end = self.base + self.source.len() as u32;
        Node::Module(Program { span: Span::new(start, end), body, interpreter: None })
    }

    fn find_word(&mut self, word: &str) -> Span {
        let bytes = self.source.as_bytes();
        let is_word = |b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'$';
        let mut from = self.cursor;
        while let Some(found) = self.source[from..].find(word).map(|i| i + from) {
            let end = found + word.len();
            let before = found.checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(end).copied();
            if !before.is_some_and(is_word) && !after.is_some_and(is_word) {
                return self.claim(Some(found - self.cursor), word.len());
            }
            from = found + 1;
        }
        self.claim(None, word.len())
    }

    /// Turns a match relative to the cursor into a span and advances past it.
    /// A missing match yields an empty span at the cursor.
    fn claim(&mut self, found: Option<usize>, len: usize) -> Span {
        match found {
            Some(offset) => {
                let start = self.cursor + offset;
                self.cursor = start + len;
                Span::new(self.base + start as u32, self.base + (start + len) as u32)
            }
            None => {
                let at = self.base + self.cursor as u32;
                Span::new(at, at)
            }
        }
    }
}

fn union_all<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Span {
    nodes.into_iter().fold(Span::default(), |acc, node| acc.union(node.span()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

pub fn item(expression: Node) -> ExprOrSpread {
    ExprOrSpread { spread: None, expression: Box::new(expression) }
}

pub fn spread_item(expression: Node) -> ExprOrSpread {
    let span = expression.span();
    ExprOrSpread { spread: Some(Span::new(span.start, span.start)), expression: Box::new(expression) }
}

pub fn array(elements: Vec<Node>) -> Node {
    array_of(elements.into_iter().map(item).collect())
}

pub fn array_of(elements: Vec<ExprOrSpread>) -> Node {
    let span = union_all(elements.iter().map(|e| e.expression.as_ref()));
    Node::ArrayExpression(ArrayLiteral { span, elements: elements.into_iter().map(Some).collect() })
}

pub fn object(properties: Vec<Node>) -> Node {
    let span = union_all(&properties);
    Node::ObjectExpression(ObjectLiteral { span, properties })
}

/// `key: value` inside an object literal.
pub fn prop(key: Node, value: Node) -> Node {
    Node::KeyValueProperty(KeyValue { key: Box::new(key), value: Box::new(value) })
}

/// `...arguments` inside an object literal.
pub fn spread(arguments: Node) -> Node {
    Node::SpreadElement(Spread { span: arguments.span(), arguments: Box::new(arguments) })
}

pub fn computed(expression: Node) -> Node {
    Node::Computed(Wrapped { span: expression.span(), expression: Box::new(expression) })
}

pub fn paren(expression: Node) -> Node {
    Node::ParenthesisExpression(Wrapped { span: expression.span(), expression: Box::new(expression) })
}

pub fn member(object: Node, property: Node) -> Node {
    let span = object.span().union(property.span());
    Node::MemberExpression(Member { span, object: Box::new(object), property: Box::new(property) })
}

pub fn call(callee: Node, arguments: Vec<Node>) -> Node {
    call_of(callee, arguments.into_iter().map(item).collect())
}

pub fn call_of(callee: Node, arguments: Vec<ExprOrSpread>) -> Node {
    let span = arguments.iter().fold(callee.span(), |acc, arg| acc.union(arg.expression.span()));
    Node::CallExpression(Call { span, callee: Box::new(callee), arguments, type_arguments: None })
}

pub fn binary(operator: &str, left: Node, right: Node) -> Node {
    let span = left.span().union(right.span());
    Node::BinaryExpression(Binary {
        span,
        operator: operator.to_string(),
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn unary(operator: &str, argument: Node) -> Node {
    Node::UnaryExpression(Unary {
        span: argument.span(),
        operator: operator.to_string(),
        argument: Box::new(argument),
    })
}

pub fn conditional(test: Node, consequent: Node, alternate: Node) -> Node {
    let span = union_all([&test, &consequent, &alternate]);
    Node::ConditionalExpression(Conditional {
        span,
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Some(Box::new(alternate)),
    })
}

/// `() => body`.
pub fn arrow(body: Node) -> Node {
    Node::ArrowFunctionExpression(Arrow { span: body.span(), body: Box::new(body), ..Default::default() })
}

/// `(params) => body`.
pub fn arrow_with(params: Vec<Node>, body: Node) -> Node {
    let span = union_all(params.iter().chain([&body]));
    Node::ArrowFunctionExpression(Arrow { span, params, body: Box::new(body), ..Default::default() })
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements and declarations
// ─────────────────────────────────────────────────────────────────────────────

pub fn declarator(id: Node, init: Node) -> Node {
    let span = id.span().union(init.span());
    Node::VariableDeclarator(VariableDeclarator {
        span,
        id: Box::new(id),
        init: Some(Box::new(init)),
        definite: false,
    })
}

pub fn declaration(kind: &str, declarations: Vec<Node>) -> Node {
    let span = union_all(&declarations);
    Node::VariableDeclaration(VariableDeclaration {
        span,
        kind: kind.to_string(),
        declare: false,
        declarations,
    })
}

/// `const id = init`.
pub fn const_decl(id: Node, init: Node) -> Node {
    declaration("const", vec![declarator(id, init)])
}

pub fn expr_stmt(expression: Node) -> Node {
    Node::ExpressionStatement(Wrapped { span: expression.span(), expression: Box::new(expression) })
}

pub fn block(stmts: Vec<Node>) -> Node {
    Node::BlockStatement(Block { span: union_all(&stmts), stmts })
}

pub fn export(declaration: Node) -> Node {
    Node::ExportDeclaration(ExportDeclaration { span: declaration.span(), declaration: Box::new(declaration) })
}

pub fn import(specifiers: Vec<Node>, source: Node) -> Node {
    let span = union_all(specifiers.iter().chain([&source]));
    Node::ImportDeclaration(ImportDeclaration {
        span,
        specifiers,
        source: Box::new(source),
        type_only: false,
        asserts: None,
    })
}

pub fn default_specifier(local: Node) -> Node {
    Node::ImportDefaultSpecifier(LocalSpecifier { span: local.span(), local: Box::new(local) })
}

pub fn namespace_specifier(local: Node) -> Node {
    Node::ImportNamespaceSpecifier(LocalSpecifier { span: local.span(), local: Box::new(local) })
}

/// `imported as local`, or just `local` when `imported` is `None`.
pub fn named_specifier(local: Node, imported: Option<Node>) -> Node {
    let span = imported.as_ref().map_or(local.span(), |i| i.span().union(local.span()));
    Node::ImportSpecifier(ImportSpecifier {
        span,
        local: Box::new(local),
        imported: imported.map(Box::new),
        is_type_only: false,
    })
}

pub fn object_pattern(properties: Vec<Node>) -> Node {
    Node::ObjectPattern(ObjectPattern { span: union_all(&properties), properties, ..Default::default() })
}

/// `key: value` inside a destructuring pattern.
pub fn pattern_prop(key: Node, value: Node) -> Node {
    Node::KeyValuePatternProperty(KeyValue { key: Box::new(key), value: Box::new(value) })
}

/// `{ key }` inside a destructuring pattern.
pub fn shorthand_prop(key: Node) -> Node {
    Node::AssignmentPatternProperty(AssignPatternProperty { span: key.span(), key: Box::new(key), value: None })
}

// ─────────────────────────────────────────────────────────────────────────────
// TypeScript
// ─────────────────────────────────────────────────────────────────────────────

/// `type id = annotation`.
pub fn type_alias(id: Node, annotation: Node) -> Node {
    let span = id.span().union(annotation.span());
    Node::TsTypeAliasDeclaration(TsTypeAliasDecl {
        span,
        id: Box::new(id),
        type_params: None,
        type_annotation: Box::new(annotation),
    })
}

/// `Name<params>`.
pub fn type_ref(name: Node, params: Vec<Node>) -> Node {
    let span = union_all(params.iter().chain([&name]));
    let type_params = (!params.is_empty()).then(|| {
        Box::new(Node::TsTypeParameterInstantiation(TsTypeParamInstantiation { span: union_all(&params), params }))
    });
    Node::TsTypeReference(TsTypeReference { span, type_name: Box::new(name), type_params })
}

pub fn type_literal(members: Vec<Node>) -> Node {
    Node::TsTypeLiteral(TsTypeLiteral { span: union_all(&members), members })
}

/// `key: ty` inside a type literal.
pub fn property_signature(key: Node, ty: Node) -> Node {
    let span = key.span().union(ty.span());
    let annotation = Node::TsTypeAnnotation(TsTypeAnnotation { span: ty.span(), type_annotation: Box::new(ty) });
    Node::TsPropertySignature(TsPropertySignature {
        span,
        key: Box::new(key),
        type_annotation: Some(Box::new(annotation)),
        ..Default::default()
    })
}

pub fn literal_type(literal: Node) -> Node {
    Node::TsLiteralType(TsLiteralType { span: literal.span(), literal: Box::new(literal) })
}

pub fn union_type(types: Vec<Node>) -> Node {
    Node::TsUnionType(TsUnion { span: union_all(&types), types })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaves_are_located_in_order() {
        let mut b = Locator::new("const a = 'a' + a;");
        let first = b.ident("a");
        let text = b.str("a");
        let second = b.ident("a");
        assert_eq!(first.span(), Span::new(6, 7));
        assert_eq!(text.span(), Span::new(10, 13));
        assert_eq!(second.span(), Span::new(16, 17));
    }

    #[test]
    fn test_base_offsets_spans() {
        let source = "// header\nx;";
        let mut b = Locator::with_base(source, 1);
        let x = b.ident("x");
        let module = b.module(vec![expr_stmt(x)]);
        assert_eq!(module.span(), Span::new(11, 13));
    }

    #[test]
    fn test_container_span_is_union() {
        let mut b = Locator::new("f(1, 22)");
        let node = call(b.ident("f"), vec![b.num(1.0), b.num(22.0)]);
        assert_eq!(node.span(), Span::new(0, 7));
    }
}
