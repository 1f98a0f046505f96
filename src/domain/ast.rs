// Syntax tree types for StyleLens.
// The shapes follow the JSON emitted by SWC: every node carries a `type` tag,
// camelCase field names, and a byte-offset `span`.

use std::ops::ControlFlow;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::domain::children::{ChildRef, ChildSlot, Field};

/// A half-open byte range in the parser's coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Spans missing from the input deserialize as `0..0`.
    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    /// Smallest span covering both; dummy spans are ignored.
    pub fn union(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Inclusive on both ends, so a cursor right after a token still hits it.
    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Anything that can report its source span.
pub trait Spanned {
    fn span(&self) -> Span;
}

macro_rules! ast_struct {
    ($(#[$meta:meta])* $name:ident { $($(#[$fmeta:meta])* $field:ident : $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            $($(#[$fmeta])* pub $field: $ty,)*
        }
    };
}

macro_rules! spanned {
    ($($name:ident),* $(,)?) => {
        $(impl Spanned for $name {
            fn span(&self) -> Span {
                self.span
            }
        })*
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared node shapes
// ─────────────────────────────────────────────────────────────────────────────

ast_struct!(Leaf { span: Span });
ast_struct!(Keyword { span: Span, kind: String });
ast_struct!(Program { span: Span, body: Vec<Node>, interpreter: Option<String> });
ast_struct!(Body { span: Span, body: Vec<Node> });
ast_struct!(Block { span: Span, stmts: Vec<Node> });
ast_struct!(Wrapped { span: Span, expression: Box<Node> });
ast_struct!(Named { span: Span, name: Box<Node> });

ast_struct!(StringLiteral { span: Span, value: String, raw: Option<String> });
ast_struct!(NumericLiteral { span: Span, value: f64, raw: Option<String> });
ast_struct!(BooleanLiteral { span: Span, value: bool });
ast_struct!(BigIntLiteral { span: Span, raw: Option<String> });
ast_struct!(RegexLiteral { span: Span, pattern: String, flags: String });
ast_struct!(Identifier {
    span: Span,
    value: String,
    optional: bool,
    type_annotation: Option<Box<Node>>,
});
ast_struct!(PrivateName { span: Span, id: Option<Box<Node>>, name: Option<String> });

// Statements

ast_struct!(With { span: Span, object: Box<Node>, body: Box<Node> });
ast_struct!(Argument { span: Span, argument: Option<Box<Node>>, delegate: bool });
ast_struct!(Labeled { span: Span, label: Box<Node>, body: Box<Node> });
ast_struct!(Jump { span: Span, label: Option<Box<Node>> });
ast_struct!(Conditional {
    span: Span,
    test: Box<Node>,
    consequent: Box<Node>,
    alternate: Option<Box<Node>>,
});
ast_struct!(Switch { span: Span, discriminant: Box<Node>, cases: Vec<Node> });
ast_struct!(SwitchCase { span: Span, test: Option<Box<Node>>, consequent: Vec<Node> });
ast_struct!(Try {
    span: Span,
    block: Box<Node>,
    handler: Option<Box<Node>>,
    finalizer: Option<Box<Node>>,
});
ast_struct!(CatchClause { span: Span, param: Option<Box<Node>>, body: Box<Node> });
ast_struct!(Loop { span: Span, test: Box<Node>, body: Box<Node> });
ast_struct!(For {
    span: Span,
    init: Option<Box<Node>>,
    test: Option<Box<Node>>,
    update: Option<Box<Node>>,
    body: Box<Node>,
});
ast_struct!(ForEach {
    span: Span,
    left: Box<Node>,
    right: Box<Node>,
    body: Box<Node>,
    is_await: bool,
});
ast_struct!(VariableDeclaration {
    span: Span,
    kind: String,
    declare: bool,
    declarations: Vec<Node>,
});
ast_struct!(VariableDeclarator {
    span: Span,
    id: Box<Node>,
    init: Option<Box<Node>>,
    definite: bool,
});

// Functions and classes

ast_struct!(Function {
    span: Span,
    identifier: Option<Box<Node>>,
    params: Vec<Node>,
    decorators: Vec<Node>,
    body: Option<Box<Node>>,
    #[serde(rename = "async")]
    is_async: bool,
    #[serde(rename = "generator")]
    is_generator: bool,
    type_parameters: Option<Box<Node>>,
    return_type: Option<Box<Node>>,
});
ast_struct!(Arrow {
    span: Span,
    params: Vec<Node>,
    body: Box<Node>,
    #[serde(rename = "async")]
    is_async: bool,
    #[serde(rename = "generator")]
    is_generator: bool,
    type_parameters: Option<Box<Node>>,
    return_type: Option<Box<Node>>,
});
ast_struct!(MethodProperty {
    span: Span,
    key: Box<Node>,
    params: Vec<Node>,
    decorators: Vec<Node>,
    body: Option<Box<Node>>,
    type_parameters: Option<Box<Node>>,
    return_type: Option<Box<Node>>,
});
ast_struct!(Class {
    span: Span,
    identifier: Option<Box<Node>>,
    body: Vec<Node>,
    super_class: Option<Box<Node>>,
    type_params: Option<Box<Node>>,
    super_type_params: Option<Box<Node>>,
    implements: Vec<Node>,
    decorators: Vec<Node>,
});
ast_struct!(Constructor { span: Span, key: Box<Node>, params: Vec<Node>, body: Option<Box<Node>> });
ast_struct!(ClassMethod {
    span: Span,
    key: Box<Node>,
    #[serde(rename = "function")]
    func: Function,
    kind: String,
    is_static: bool,
});
ast_struct!(ClassProperty {
    span: Span,
    key: Box<Node>,
    value: Option<Box<Node>>,
    type_annotation: Option<Box<Node>>,
    decorators: Vec<Node>,
    is_static: bool,
});
ast_struct!(StaticBlock { span: Span, body: Box<Node> });
ast_struct!(Parameter { span: Span, decorators: Vec<Node>, pat: Box<Node> });

// Expressions

/// An array element or call argument, optionally spread (`...expr`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExprOrSpread {
    pub spread: Option<Span>,
    pub expression: Box<Node>,
}

impl ExprOrSpread {
    pub fn is_spread(&self) -> bool {
        self.spread.is_some()
    }
}

ast_struct!(ArrayLiteral { span: Span, elements: Vec<Option<ExprOrSpread>> });
ast_struct!(ObjectLiteral { span: Span, properties: Vec<Node> });
ast_struct!(Spread { span: Span, arguments: Box<Node> });
ast_struct!(Unary { span: Span, operator: String, argument: Box<Node> });
ast_struct!(Update { span: Span, operator: String, prefix: bool, argument: Box<Node> });
ast_struct!(Binary { span: Span, operator: String, left: Box<Node>, right: Box<Node> });
ast_struct!(Member { span: Span, object: Box<Node>, property: Box<Node> });
ast_struct!(SuperProp { span: Span, obj: Box<Node>, property: Box<Node> });
ast_struct!(Call {
    span: Span,
    callee: Box<Node>,
    arguments: Vec<ExprOrSpread>,
    type_arguments: Option<Box<Node>>,
});
ast_struct!(New {
    span: Span,
    callee: Box<Node>,
    arguments: Option<Vec<ExprOrSpread>>,
    type_arguments: Option<Box<Node>>,
});
ast_struct!(Sequence { span: Span, expressions: Vec<Node> });
ast_struct!(Template { span: Span, quasis: Vec<Node>, expressions: Vec<Node>, types: Vec<Node> });
ast_struct!(TemplateElement { span: Span, tail: bool, cooked: Option<String>, raw: String });
ast_struct!(TaggedTemplate {
    span: Span,
    tag: Box<Node>,
    type_parameters: Option<Box<Node>>,
    template: Box<Node>,
});
ast_struct!(OptionalChain { span: Span, base: Box<Node> });
ast_struct!(TypeCast {
    span: Span,
    expression: Box<Node>,
    type_annotation: Option<Box<Node>>,
    type_arguments: Option<Box<Node>>,
});

// JSX

ast_struct!(JsxElement {
    span: Span,
    opening: Box<Node>,
    children: Vec<Node>,
    closing: Option<Box<Node>>,
});
ast_struct!(JsxOpening {
    span: Span,
    name: Box<Node>,
    attributes: Vec<Node>,
    self_closing: bool,
    type_arguments: Option<Box<Node>>,
});
ast_struct!(JsxAttribute { span: Span, name: Box<Node>, value: Option<Box<Node>> });
ast_struct!(JsxNamespaced { span: Span, namespace: Box<Node>, name: Box<Node> });
ast_struct!(JsxText { span: Span, value: String, raw: String });

// Module declarations

ast_struct!(ImportDeclaration {
    span: Span,
    specifiers: Vec<Node>,
    source: Box<Node>,
    type_only: bool,
    asserts: Option<Box<Node>>,
});
ast_struct!(LocalSpecifier { span: Span, local: Box<Node> });
ast_struct!(ImportSpecifier {
    span: Span,
    local: Box<Node>,
    imported: Option<Box<Node>>,
    is_type_only: bool,
});
ast_struct!(ExportDeclaration { span: Span, declaration: Box<Node> });
ast_struct!(ExportNamed {
    span: Span,
    specifiers: Vec<Node>,
    source: Option<Box<Node>>,
    type_only: bool,
    asserts: Option<Box<Node>>,
});
ast_struct!(ExportAll { span: Span, source: Box<Node>, asserts: Option<Box<Node>> });
ast_struct!(ExportDefaultDecl { span: Span, decl: Box<Node> });
ast_struct!(ExportSpecifier {
    span: Span,
    orig: Box<Node>,
    exported: Option<Box<Node>>,
    is_type_only: bool,
});
ast_struct!(ExportDefaultSpecifier { span: Span, exported: Box<Node> });

// Patterns and properties

ast_struct!(ArrayPattern {
    span: Span,
    elements: Vec<Option<Node>>,
    optional: bool,
    type_annotation: Option<Box<Node>>,
});
ast_struct!(ObjectPattern {
    span: Span,
    properties: Vec<Node>,
    optional: bool,
    type_annotation: Option<Box<Node>>,
});
ast_struct!(Rest { span: Span, argument: Box<Node>, type_annotation: Option<Box<Node>> });
ast_struct!(
    /// `key: value` inside object literals and patterns. SWC emits no span
    /// for these; the span is derived from the key and value.
    KeyValue { key: Box<Node>, value: Box<Node> }
);
ast_struct!(AssignPatternProperty { span: Span, key: Box<Node>, value: Option<Box<Node>> });
ast_struct!(GetterProperty {
    span: Span,
    key: Box<Node>,
    type_annotation: Option<Box<Node>>,
    body: Option<Box<Node>>,
});
ast_struct!(SetterProperty {
    span: Span,
    key: Box<Node>,
    param: Box<Node>,
    body: Option<Box<Node>>,
});

// TypeScript

ast_struct!(TsTypeAnnotation { span: Span, type_annotation: Box<Node> });
ast_struct!(TsTypeOperator { span: Span, op: String, type_annotation: Box<Node> });
ast_struct!(TsTypeParamDecl { span: Span, parameters: Vec<Node> });
ast_struct!(TsTypeParam {
    span: Span,
    name: Box<Node>,
    constraint: Option<Box<Node>>,
    default: Option<Box<Node>>,
});
ast_struct!(TsTypeParamInstantiation { span: Span, params: Vec<Node> });
ast_struct!(TsParamProp { span: Span, decorators: Vec<Node>, param: Box<Node> });
ast_struct!(TsQualifiedName { span: Span, left: Box<Node>, right: Box<Node> });
ast_struct!(TsSignature {
    span: Span,
    params: Vec<Node>,
    type_annotation: Option<Box<Node>>,
    type_params: Option<Box<Node>>,
});
ast_struct!(TsPropertySignature {
    span: Span,
    key: Box<Node>,
    computed: bool,
    optional: bool,
    type_annotation: Option<Box<Node>>,
});
ast_struct!(TsGetterSignature { span: Span, key: Box<Node>, type_annotation: Option<Box<Node>> });
ast_struct!(TsSetterSignature { span: Span, key: Box<Node>, param: Box<Node> });
ast_struct!(TsMethodSignature {
    span: Span,
    key: Box<Node>,
    params: Vec<Node>,
    type_ann: Option<Box<Node>>,
    type_params: Option<Box<Node>>,
});
ast_struct!(TsIndexSignature { span: Span, params: Vec<Node>, type_annotation: Option<Box<Node>> });
ast_struct!(TsTypeReference { span: Span, type_name: Box<Node>, type_params: Option<Box<Node>> });
ast_struct!(TsTypePredicate {
    span: Span,
    param_name: Box<Node>,
    type_annotation: Option<Box<Node>>,
    asserts: bool,
});
ast_struct!(TsImportType {
    span: Span,
    argument: Box<Node>,
    qualifier: Option<Box<Node>>,
    type_arguments: Option<Box<Node>>,
});
ast_struct!(TsTypeQuery { span: Span, expr_name: Box<Node>, type_arguments: Option<Box<Node>> });
ast_struct!(TsTypeLiteral { span: Span, members: Vec<Node> });
ast_struct!(TsArrayType { span: Span, elem_type: Box<Node> });
ast_struct!(TsTupleType { span: Span, elem_types: Vec<Node> });
ast_struct!(TsTupleElement { span: Span, label: Option<Box<Node>>, ty: Box<Node> });
ast_struct!(TsUnion { span: Span, types: Vec<Node> });
ast_struct!(TsConditionalType {
    span: Span,
    check_type: Box<Node>,
    extends_type: Box<Node>,
    true_type: Box<Node>,
    false_type: Box<Node>,
});
ast_struct!(TsInferType { span: Span, type_param: Box<Node> });
ast_struct!(TsIndexedAccessType {
    span: Span,
    object_type: Box<Node>,
    index_type: Box<Node>,
    readonly: bool,
});
ast_struct!(TsMappedType {
    span: Span,
    type_param: Box<Node>,
    name_type: Option<Box<Node>>,
    type_annotation: Option<Box<Node>>,
});
ast_struct!(TsLiteralType { span: Span, literal: Box<Node> });
ast_struct!(TsInterfaceDecl {
    span: Span,
    id: Box<Node>,
    type_params: Option<Box<Node>>,
    extends: Vec<Node>,
    body: Box<Node>,
});
ast_struct!(TsExprWithTypeArgs { span: Span, expression: Box<Node>, type_arguments: Option<Box<Node>> });
ast_struct!(TsTypeAliasDecl {
    span: Span,
    id: Box<Node>,
    type_params: Option<Box<Node>>,
    type_annotation: Box<Node>,
});
ast_struct!(TsEnumDecl { span: Span, id: Box<Node>, members: Vec<Node> });
ast_struct!(TsEnumMember { span: Span, id: Box<Node>, init: Option<Box<Node>> });
ast_struct!(TsModuleDecl { span: Span, id: Box<Node>, body: Option<Box<Node>> });
ast_struct!(TsImportEquals { span: Span, id: Box<Node>, module_ref: Box<Node> });
ast_struct!(TsNamespaceExport { span: Span, id: Box<Node> });

spanned!(
    Leaf, Keyword, Program, Body, Block, Wrapped, Named, StringLiteral, NumericLiteral,
    BooleanLiteral, BigIntLiteral, RegexLiteral, Identifier, PrivateName, With, Argument,
    Labeled, Jump, Conditional, Switch, SwitchCase, Try, CatchClause, Loop, For, ForEach,
    VariableDeclaration, VariableDeclarator, Function, Arrow, MethodProperty, Class, Constructor,
    ClassMethod, ClassProperty, StaticBlock, Parameter, ArrayLiteral, ObjectLiteral, Spread,
    Unary, Update, Binary, Member, SuperProp, Call, New, Sequence, Template, TemplateElement,
    TaggedTemplate, OptionalChain, TypeCast, JsxElement, JsxOpening, JsxAttribute,
    JsxNamespaced, JsxText, ImportDeclaration, LocalSpecifier, ImportSpecifier,
    ExportDeclaration, ExportNamed, ExportAll, ExportDefaultDecl, ExportSpecifier,
    ExportDefaultSpecifier, ArrayPattern, ObjectPattern, Rest, AssignPatternProperty,
    GetterProperty, SetterProperty, TsTypeAnnotation, TsTypeOperator, TsTypeParamDecl,
    TsTypeParam, TsTypeParamInstantiation, TsParamProp, TsQualifiedName, TsSignature,
    TsPropertySignature, TsGetterSignature, TsSetterSignature, TsMethodSignature,
    TsIndexSignature, TsTypeReference, TsTypePredicate, TsImportType, TsTypeQuery,
    TsTypeLiteral, TsArrayType, TsTupleType, TsTupleElement, TsUnion, TsConditionalType,
    TsInferType, TsIndexedAccessType, TsMappedType, TsLiteralType, TsInterfaceDecl,
    TsExprWithTypeArgs, TsTypeAliasDecl, TsEnumDecl, TsEnumMember, TsModuleDecl,
    TsImportEquals, TsNamespaceExport,
);

impl Spanned for KeyValue {
    fn span(&self) -> Span {
        self.key.span().union(self.value.span())
    }
}

impl BigIntLiteral {
    /// Parses the literal from its raw text (`123n`, `0xffn`, `1_000n`).
    pub fn value(&self) -> Option<BigInt> {
        let raw = self.raw.as_deref()?.trim_end_matches('n').replace('_', "");
        let lower = raw.to_ascii_lowercase();
        let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
            (rest.to_string(), 16)
        } else if let Some(rest) = lower.strip_prefix("0o") {
            (rest.to_string(), 8)
        } else if let Some(rest) = lower.strip_prefix("0b") {
            (rest.to_string(), 2)
        } else {
            (lower, 10)
        };
        BigInt::parse_bytes(digits.as_bytes(), radix)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Node kinds and traversal rules
// ═══════════════════════════════════════════════════════════════════════════

macro_rules! node_kinds {
    ($($(#[$attr:meta])* $kind:ident($ty:ident) { $($field:ident => $tag:ident),* $(,)? }),* $(,)?) => {
        /// A syntax tree node. Immutable once deserialized.
        #[derive(Debug, Clone, Deserialize)]
        #[serde(tag = "type")]
        pub enum Node {
            $($(#[$attr])* $kind($ty),)*
        }

        /// Fieldless tag of every [`Node`] variant.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($kind,)*
        }

        impl Node {
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(Node::$kind(_) => NodeKind::$kind,)*
                }
            }

            pub fn span(&self) -> Span {
                match self {
                    $(Node::$kind(n) => n.span(),)*
                }
            }

            /// Visits the direct children in traversal-rule order, skipping
            /// absent optional children and array holes.
            #[allow(unused_variables)]
            pub fn for_each_child<'a, B, F>(&'a self, mut f: F) -> ControlFlow<B>
            where
                F: FnMut(ChildRef, &'a Node) -> ControlFlow<B>,
            {
                match self {
                    $(Node::$kind(n) => {
                        $(n.$field.each(Field::$tag, &mut f)?;)*
                    })*
                }
                ControlFlow::Continue(())
            }
        }
    };
}

node_kinds! {
    Module(Program) { body => Body },
    Script(Program) { body => Body },

    // Statements
    BlockStatement(Block) { stmts => Stmts },
    ExpressionStatement(Wrapped) { expression => Expression },
    EmptyStatement(Leaf) {},
    DebuggerStatement(Leaf) {},
    WithStatement(With) { object => Object, body => Body },
    ReturnStatement(Argument) { argument => Argument },
    LabeledStatement(Labeled) { label => Label, body => Body },
    BreakStatement(Jump) { label => Label },
    ContinueStatement(Jump) { label => Label },
    IfStatement(Conditional) { test => Test, consequent => Consequent, alternate => Alternate },
    SwitchStatement(Switch) { discriminant => Discriminant, cases => Cases },
    SwitchCase(SwitchCase) { test => Test, consequent => Consequent },
    ThrowStatement(Argument) { argument => Argument },
    TryStatement(Try) { block => Block, handler => Handler, finalizer => Finalizer },
    CatchClause(CatchClause) { param => Param, body => Body },
    WhileStatement(Loop) { test => Test, body => Body },
    DoWhileStatement(Loop) { test => Test, body => Body },
    ForStatement(For) { init => Init, test => Test, update => Update, body => Body },
    ForInStatement(ForEach) { left => Left, right => Right, body => Body },
    ForOfStatement(ForEach) { left => Left, right => Right, body => Body },
    VariableDeclaration(VariableDeclaration) { declarations => Declarations },
    VariableDeclarator(VariableDeclarator) { init => Init, id => Id },

    // Functions and classes
    FunctionDeclaration(Function) {
        identifier => Identifier, body => Body, params => Params,
        type_parameters => TypeParameters, return_type => ReturnType, decorators => Decorators,
    },
    FunctionExpression(Function) {
        identifier => Identifier, body => Body, params => Params,
        type_parameters => TypeParameters, return_type => ReturnType, decorators => Decorators,
    },
    ArrowFunctionExpression(Arrow) {
        params => Params, body => Body, type_parameters => TypeParameters, return_type => ReturnType,
    },
    ClassDeclaration(Class) {
        body => Body, identifier => Identifier, super_class => SuperClass,
        type_params => TypeParams, super_type_params => SuperTypeParams, implements => Implements,
    },
    ClassExpression(Class) {
        body => Body, identifier => Identifier, super_class => SuperClass,
        type_params => TypeParams, super_type_params => SuperTypeParams, implements => Implements,
    },
    Constructor(Constructor) { key => Key, params => Params, body => Body },
    ClassMethod(ClassMethod) { func => Body, key => Key },
    PrivateMethod(ClassMethod) { func => Body, key => Key },
    ClassProperty(ClassProperty) { value => Value, type_annotation => TypeAnnotation, key => Key },
    PrivateProperty(ClassProperty) { value => Value, type_annotation => TypeAnnotation, key => Key },
    StaticBlock(StaticBlock) { body => Body },
    Parameter(Parameter) { decorators => Decorators, pat => Pat },
    Decorator(Wrapped) { expression => Expression },

    // Literals and names
    StringLiteral(StringLiteral) {},
    NumericLiteral(NumericLiteral) {},
    BooleanLiteral(BooleanLiteral) {},
    NullLiteral(Leaf) {},
    BigIntLiteral(BigIntLiteral) {},
    RegExpLiteral(RegexLiteral) {},
    Identifier(Identifier) { type_annotation => TypeAnnotation },
    PrivateName(PrivateName) { id => Id },

    // Expressions
    ThisExpression(Leaf) {},
    Super(Leaf) {},
    Import(Leaf) {},
    ArrayExpression(ArrayLiteral) { elements => Elements },
    ObjectExpression(ObjectLiteral) { properties => Properties },
    SpreadElement(Spread) { arguments => Arguments },
    UnaryExpression(Unary) { argument => Argument },
    UpdateExpression(Update) { argument => Argument },
    BinaryExpression(Binary) { left => Left, right => Right },
    AssignmentExpression(Binary) { left => Left, right => Right },
    MemberExpression(Member) { object => Object, property => Property },
    SuperPropExpression(SuperProp) { obj => Obj, property => Property },
    ConditionalExpression(Conditional) {
        test => Test, consequent => Consequent, alternate => Alternate,
    },
    CallExpression(Call) { callee => Callee, arguments => Arguments, type_arguments => TypeArguments },
    NewExpression(New) { callee => Callee, arguments => Arguments, type_arguments => TypeArguments },
    SequenceExpression(Sequence) { expressions => Expressions },
    YieldExpression(Argument) { argument => Argument },
    AwaitExpression(Argument) { argument => Argument },
    MetaProperty(Keyword) {},
    TemplateLiteral(Template) { quasis => Quasis, expressions => Expressions, types => Types },
    TemplateElement(TemplateElement) {},
    TaggedTemplateExpression(TaggedTemplate) {
        tag => Tag, template => Template, type_parameters => TypeParameters,
    },
    ParenthesisExpression(Wrapped) { expression => Expression },
    OptionalChainingExpression(OptionalChain) { base => Base },
    TsAsExpression(TypeCast) { expression => Expression, type_annotation => TypeAnnotation },
    TsSatisfiesExpression(TypeCast) { expression => Expression, type_annotation => TypeAnnotation },
    TsTypeAssertion(TypeCast) { expression => Expression, type_annotation => TypeAnnotation },
    TsInstantiation(TypeCast) { expression => Expression, type_arguments => TypeArguments },
    TsConstAssertion(Wrapped) { expression => Expression },
    TsNonNullExpression(Wrapped) { expression => Expression },
    Invalid(Leaf) {},

    // JSX
    #[serde(rename = "JSXElement")]
    JsxElement(JsxElement) { opening => Opening, children => Children, closing => Closing },
    #[serde(rename = "JSXFragment")]
    JsxFragment(JsxElement) { opening => Opening, children => Children, closing => Closing },
    #[serde(rename = "JSXOpeningElement")]
    JsxOpeningElement(JsxOpening) { name => Name, attributes => Attributes, type_arguments => TypeArguments },
    #[serde(rename = "JSXClosingElement")]
    JsxClosingElement(Named) { name => Name },
    #[serde(rename = "JSXOpeningFragment")]
    JsxOpeningFragment(Leaf) {},
    #[serde(rename = "JSXClosingFragment")]
    JsxClosingFragment(Leaf) {},
    #[serde(rename = "JSXAttribute")]
    JsxAttribute(JsxAttribute) { name => Name, value => Value },
    #[serde(rename = "JSXMemberExpression")]
    JsxMemberExpression(Member) { object => Object, property => Property },
    #[serde(rename = "JSXNamespacedName")]
    JsxNamespacedName(JsxNamespaced) { namespace => Namespace, name => Name },
    #[serde(rename = "JSXEmptyExpression")]
    JsxEmptyExpression(Leaf) {},
    #[serde(rename = "JSXExpressionContainer")]
    JsxExpressionContainer(Wrapped) { expression => Expression },
    #[serde(rename = "JSXSpreadChild")]
    JsxSpreadChild(Wrapped) { expression => Expression },
    #[serde(rename = "JSXText")]
    JsxText(JsxText) {},

    // Module declarations
    ImportDeclaration(ImportDeclaration) { specifiers => Specifiers, source => Source, asserts => Asserts },
    ImportDefaultSpecifier(LocalSpecifier) { local => Local },
    ImportNamespaceSpecifier(LocalSpecifier) { local => Local },
    ImportSpecifier(ImportSpecifier) { local => Local, imported => Imported },
    ExportDeclaration(ExportDeclaration) { declaration => Declaration },
    ExportNamedDeclaration(ExportNamed) { specifiers => Specifiers, source => Source, asserts => Asserts },
    ExportAllDeclaration(ExportAll) { source => Source, asserts => Asserts },
    ExportDefaultDeclaration(ExportDefaultDecl) { decl => Decl },
    ExportDefaultExpression(Wrapped) { expression => Expression },
    ExportSpecifier(ExportSpecifier) { orig => Orig, exported => Exported },
    ExportNamespaceSpecifier(Named) { name => Name },
    ExportDefaultSpecifier(ExportDefaultSpecifier) { exported => Exported },

    // Patterns and properties
    ArrayPattern(ArrayPattern) { elements => Elements, type_annotation => TypeAnnotation },
    ObjectPattern(ObjectPattern) { properties => Properties, type_annotation => TypeAnnotation },
    AssignmentPattern(Binary) { left => Left, right => Right },
    RestElement(Rest) { argument => Argument, type_annotation => TypeAnnotation },
    KeyValuePatternProperty(KeyValue) { key => Key, value => Value },
    AssignmentPatternProperty(AssignPatternProperty) { key => Key, value => Value },
    KeyValueProperty(KeyValue) { key => Key, value => Value },
    AssignmentProperty(KeyValue) { key => Key, value => Value },
    GetterProperty(GetterProperty) { key => Key, type_annotation => TypeAnnotation, body => Body },
    SetterProperty(SetterProperty) { key => Key, param => Param, body => Body },
    MethodProperty(MethodProperty) {
        key => Key, params => Params, body => Body,
        type_parameters => TypeParameters, return_type => ReturnType,
    },
    Computed(Wrapped) { expression => Expression },

    // TypeScript
    TsTypeAnnotation(TsTypeAnnotation) { type_annotation => TypeAnnotation },
    TsTypeParameterDeclaration(TsTypeParamDecl) { parameters => Parameters },
    TsTypeParameter(TsTypeParam) { constraint => Constraint, default => Default, name => Name },
    TsTypeParameterInstantiation(TsTypeParamInstantiation) { params => Params },
    TsParameterProperty(TsParamProp) { param => Param, decorators => Decorators },
    TsQualifiedName(TsQualifiedName) { left => Left, right => Right },
    TsCallSignatureDeclaration(TsSignature) {
        params => Params, type_annotation => TypeAnnotation, type_params => TypeParams,
    },
    TsConstructSignatureDeclaration(TsSignature) {
        params => Params, type_annotation => TypeAnnotation, type_params => TypeParams,
    },
    TsPropertySignature(TsPropertySignature) { key => Key, type_annotation => TypeAnnotation },
    TsGetterSignature(TsGetterSignature) { key => Key, type_annotation => TypeAnnotation },
    TsSetterSignature(TsSetterSignature) { key => Key, param => Param },
    TsMethodSignature(TsMethodSignature) {
        key => Key, params => Params, type_ann => TypeAnn, type_params => TypeParams,
    },
    TsIndexSignature(TsIndexSignature) { params => Params, type_annotation => TypeAnnotation },
    TsKeywordType(Keyword) {},
    TsThisType(Leaf) {},
    TsFunctionType(TsSignature) {
        params => Params, type_params => TypeParams, type_annotation => TypeAnnotation,
    },
    TsConstructorType(TsSignature) {
        params => Params, type_params => TypeParams, type_annotation => TypeAnnotation,
    },
    TsTypeReference(TsTypeReference) { type_name => TypeName, type_params => TypeParams },
    TsTypePredicate(TsTypePredicate) { param_name => ParamName, type_annotation => TypeAnnotation },
    TsImportType(TsImportType) {
        argument => Argument, qualifier => Qualifier, type_arguments => TypeArguments,
    },
    TsTypeQuery(TsTypeQuery) { expr_name => ExprName, type_arguments => TypeArguments },
    TsTypeLiteral(TsTypeLiteral) { members => Members },
    TsArrayType(TsArrayType) { elem_type => ElemType },
    TsTupleType(TsTupleType) { elem_types => ElemTypes },
    TsTupleElement(TsTupleElement) { label => Label, ty => Ty },
    TsOptionalType(TsTypeAnnotation) { type_annotation => TypeAnnotation },
    TsRestType(TsTypeAnnotation) { type_annotation => TypeAnnotation },
    TsUnionType(TsUnion) { types => Types },
    TsIntersectionType(TsUnion) { types => Types },
    TsConditionalType(TsConditionalType) {
        check_type => CheckType, extends_type => ExtendsType,
        true_type => TrueType, false_type => FalseType,
    },
    TsInferType(TsInferType) { type_param => TypeParam },
    TsParenthesizedType(TsTypeAnnotation) { type_annotation => TypeAnnotation },
    TsTypeOperator(TsTypeOperator) { type_annotation => TypeAnnotation },
    TsIndexedAccessType(TsIndexedAccessType) { object_type => ObjectType, index_type => IndexType },
    TsMappedType(TsMappedType) {
        type_param => TypeParam, name_type => NameType, type_annotation => TypeAnnotation,
    },
    TsLiteralType(TsLiteralType) { literal => Literal },
    TsInterfaceDeclaration(TsInterfaceDecl) {
        id => Id, type_params => TypeParams, extends => Extends, body => Body,
    },
    TsInterfaceBody(Body) { body => Body },
    TsExpressionWithTypeArguments(TsExprWithTypeArgs) {
        expression => Expression, type_arguments => TypeArguments,
    },
    TsTypeAliasDeclaration(TsTypeAliasDecl) {
        id => Id, type_params => TypeParams, type_annotation => TypeAnnotation,
    },
    TsEnumDeclaration(TsEnumDecl) { id => Id, members => Members },
    TsEnumMember(TsEnumMember) { id => Id, init => Init },
    TsModuleDeclaration(TsModuleDecl) { id => Id, body => Body },
    TsModuleBlock(Body) { body => Body },
    TsNamespaceDeclaration(TsModuleDecl) { id => Id, body => Body },
    TsImportEqualsDeclaration(TsImportEquals) { id => Id, module_ref => ModuleRef },
    TsExternalModuleReference(Wrapped) { expression => Expression },
    TsExportAssignment(Wrapped) { expression => Expression },
    TsNamespaceExportDeclaration(TsNamespaceExport) { id => Id },
}

impl Default for Node {
    fn default() -> Self {
        Node::Invalid(Leaf::default())
    }
}

impl Node {
    /// The name of an `Identifier` node.
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Node::Identifier(ident) => Some(&ident.value),
            _ => None,
        }
    }

    /// The value of a `StringLiteral` node.
    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Node::StringLiteral(lit) => Some(&lit.value),
            _ => None,
        }
    }

    /// Name of an identifier or string literal, as used by module export
    /// names (`import { "a-b" as c }`).
    pub fn module_export_name(&self) -> Option<&str> {
        self.as_identifier().or_else(|| self.as_string_literal())
    }
}
