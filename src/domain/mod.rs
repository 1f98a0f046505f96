// Core analysis: syntax tree, traversal, evaluation and CSS synthesis.

pub mod ast;
pub mod ast_builder;
pub mod children;
pub mod color;
pub mod document;
pub mod evaluate;
pub mod imports;
pub mod offsets;
pub mod scope;
pub mod synthesize;
pub mod value;
pub mod virtual_document;
pub mod walk;
