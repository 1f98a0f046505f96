// JSON-lines request server over TCP.

pub mod dto;
pub mod server;

pub use server::{process_command, serve, start_server};
