// Infrastructure implementations for StyleLens.

pub mod completion;
pub mod concurrency;
pub mod document_cache;
pub mod normalizer;
pub mod parser;
pub mod settings;

pub use completion::KeywordCompletionService;
pub use document_cache::DocumentCache;
pub use normalizer::StylexValueNormalizer;
pub use parser::{parse_ast_json, parse_ast_value, ExternalParser};
pub use settings::Settings;
