//! Chat-completions backend: wire types and the HTTP client.

mod client;
mod types;

pub use client::{LlmClient, LlmError, OpenAiClient};
pub use types::*;
