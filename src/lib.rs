// Main library entry point for StyleLens.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
