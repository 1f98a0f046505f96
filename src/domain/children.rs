//! Child slots of AST nodes.
//!
//! Every node kind declares its traversal rule as an ordered list of
//! `(field, Field)` pairs in [`crate::domain::ast`]. The field values are
//! visited through [`ChildSlot`], which knows how to flatten boxed, optional,
//! and array-valued children (including spread wrappers) into a stream of
//! `(ChildRef, &Node)` pairs.

use std::fmt;
use std::ops::ControlFlow;

use crate::domain::ast::{ExprOrSpread, Function, Node};

/// Names of every child-bearing field across all node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Alternate,
    Argument,
    Arguments,
    Asserts,
    Attributes,
    Base,
    Block,
    Body,
    Callee,
    Cases,
    CheckType,
    Children,
    Closing,
    Consequent,
    Constraint,
    Decl,
    Declaration,
    Declarations,
    Decorators,
    Default,
    Discriminant,
    ElemType,
    ElemTypes,
    Elements,
    Exported,
    ExprName,
    Expression,
    Expressions,
    Extends,
    ExtendsType,
    FalseType,
    Finalizer,
    Handler,
    Id,
    Identifier,
    Implements,
    Imported,
    IndexType,
    Init,
    Key,
    Label,
    Left,
    Literal,
    Local,
    Members,
    ModuleRef,
    Name,
    NameType,
    Namespace,
    Obj,
    Object,
    ObjectType,
    Opening,
    Orig,
    Param,
    ParamName,
    Parameters,
    Params,
    Pat,
    Properties,
    Property,
    Qualifier,
    Quasis,
    ReturnType,
    Right,
    Source,
    Specifiers,
    Stmts,
    SuperClass,
    SuperTypeParams,
    Tag,
    Template,
    Test,
    TrueType,
    Ty,
    TypeAnn,
    TypeAnnotation,
    TypeArguments,
    TypeName,
    TypeParam,
    TypeParameters,
    TypeParams,
    Types,
    Update,
    Value,
}

impl Field {
    /// The field's name as it appears in the serialized tree.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Alternate => "alternate",
            Field::Argument => "argument",
            Field::Arguments => "arguments",
            Field::Asserts => "asserts",
            Field::Attributes => "attributes",
            Field::Base => "base",
            Field::Block => "block",
            Field::Body => "body",
            Field::Callee => "callee",
            Field::Cases => "cases",
            Field::CheckType => "checkType",
            Field::Children => "children",
            Field::Closing => "closing",
            Field::Consequent => "consequent",
            Field::Constraint => "constraint",
            Field::Decl => "decl",
            Field::Declaration => "declaration",
            Field::Declarations => "declarations",
            Field::Decorators => "decorators",
            Field::Default => "default",
            Field::Discriminant => "discriminant",
            Field::ElemType => "elemType",
            Field::ElemTypes => "elemTypes",
            Field::Elements => "elements",
            Field::Exported => "exported",
            Field::ExprName => "exprName",
            Field::Expression => "expression",
            Field::Expressions => "expressions",
            Field::Extends => "extends",
            Field::ExtendsType => "extendsType",
            Field::FalseType => "falseType",
            Field::Finalizer => "finalizer",
            Field::Handler => "handler",
            Field::Id => "id",
            Field::Identifier => "identifier",
            Field::Implements => "implements",
            Field::Imported => "imported",
            Field::IndexType => "indexType",
            Field::Init => "init",
            Field::Key => "key",
            Field::Label => "label",
            Field::Left => "left",
            Field::Literal => "literal",
            Field::Local => "local",
            Field::Members => "members",
            Field::ModuleRef => "moduleRef",
            Field::Name => "name",
            Field::NameType => "nameType",
            Field::Namespace => "namespace",
            Field::Obj => "obj",
            Field::Object => "object",
            Field::ObjectType => "objectType",
            Field::Opening => "opening",
            Field::Orig => "orig",
            Field::Param => "param",
            Field::ParamName => "paramName",
            Field::Parameters => "parameters",
            Field::Params => "params",
            Field::Pat => "pat",
            Field::Properties => "properties",
            Field::Property => "property",
            Field::Qualifier => "qualifier",
            Field::Quasis => "quasis",
            Field::ReturnType => "returnType",
            Field::Right => "right",
            Field::Source => "source",
            Field::Specifiers => "specifiers",
            Field::Stmts => "stmts",
            Field::SuperClass => "superClass",
            Field::SuperTypeParams => "superTypeParams",
            Field::Tag => "tag",
            Field::Template => "template",
            Field::Test => "test",
            Field::TrueType => "trueType",
            Field::Ty => "ty",
            Field::TypeAnn => "typeAnn",
            Field::TypeAnnotation => "typeAnnotation",
            Field::TypeArguments => "typeArguments",
            Field::TypeName => "typeName",
            Field::TypeParam => "typeParam",
            Field::TypeParameters => "typeParameters",
            Field::TypeParams => "typeParams",
            Field::Types => "types",
            Field::Update => "update",
            Field::Value => "value",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one child of a node: a whole field, or one element of an
/// array-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildRef {
    pub field: Field,
    pub index: Option<usize>,
}

impl ChildRef {
    /// A reference to a field as a whole (or to a single-valued field).
    pub const fn field(field: Field) -> Self {
        Self { field, index: None }
    }

    /// A reference to element `index` of an array-valued field.
    pub const fn at(field: Field, index: usize) -> Self {
        Self {
            field,
            index: Some(index),
        }
    }

    /// True if suppressing `self` suppresses the child `other`.
    ///
    /// A whole-field reference covers every element of the field.
    pub fn covers(&self, other: &ChildRef) -> bool {
        self.field == other.field && (self.index.is_none() || self.index == other.index)
    }
}

impl fmt::Display for ChildRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}.{}", self.field, index),
            None => write!(f, "{}", self.field),
        }
    }
}

/// A field value that may hold child nodes.
pub trait ChildSlot {
    fn each<'a, B, F>(&'a self, field: Field, f: &mut F) -> ControlFlow<B>
    where
        F: FnMut(ChildRef, &'a Node) -> ControlFlow<B>;
}

/// An element of an array-valued field.
pub trait ChildItem {
    fn node(&self) -> Option<&Node>;
}

impl ChildItem for Node {
    fn node(&self) -> Option<&Node> {
        Some(self)
    }
}

impl ChildItem for ExprOrSpread {
    fn node(&self) -> Option<&Node> {
        Some(&self.expression)
    }
}

impl<T: ChildItem> ChildItem for Option<T> {
    fn node(&self) -> Option<&Node> {
        self.as_ref().and_then(ChildItem::node)
    }
}

impl ChildSlot for Box<Node> {
    fn each<'a, B, F>(&'a self, field: Field, f: &mut F) -> ControlFlow<B>
    where
        F: FnMut(ChildRef, &'a Node) -> ControlFlow<B>,
    {
        f(ChildRef::field(field), self)
    }
}

impl<T: ChildSlot> ChildSlot for Option<T> {
    fn each<'a, B, F>(&'a self, field: Field, f: &mut F) -> ControlFlow<B>
    where
        F: FnMut(ChildRef, &'a Node) -> ControlFlow<B>,
    {
        match self {
            Some(slot) => slot.each(field, f),
            None => ControlFlow::Continue(()),
        }
    }
}

impl<T: ChildItem> ChildSlot for Vec<T> {
    fn each<'a, B, F>(&'a self, field: Field, f: &mut F) -> ControlFlow<B>
    where
        F: FnMut(ChildRef, &'a Node) -> ControlFlow<B>,
    {
        for (index, item) in self.iter().enumerate() {
            if let Some(node) = item.node() {
                f(ChildRef::at(field, index), node)?;
            }
        }
        ControlFlow::Continue(())
    }
}

// A class method's `function` is a bare function record without a `type`
// tag; its own fields are visited in place.
impl ChildSlot for Function {
    fn each<'a, B, F>(&'a self, _field: Field, f: &mut F) -> ControlFlow<B>
    where
        F: FnMut(ChildRef, &'a Node) -> ControlFlow<B>,
    {
        self.body.each(Field::Body, f)?;
        self.params.each(Field::Params, f)?;
        self.type_parameters.each(Field::TypeParameters, f)?;
        self.return_type.each(Field::ReturnType, f)?;
        self.decorators.each(Field::Decorators, f)
    }
}
