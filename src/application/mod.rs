// Capabilities built on the analysis core.

pub mod colors;
pub mod completion;
pub mod hover;
pub mod service;
mod style_context;

pub use colors::document_colors;
pub use completion::{completions, CompletionList, CUSTOM_PROPERTY};
pub use hover::{hover, Hover};
pub use service::LanguageService;
