//! Client for the external text-completion service plus the text
//! post-processing applied to what it returns.
//!
//! The service speaks the OpenAI-style `/v1/completions` dialect: a JSON body
//! with `model`, `prompt` and sampling parameters in, `{"choices": [{"text"}]}`
//! out.

pub mod client;
pub mod config;
pub mod error;
pub mod text;

pub use client::CompletionClient;
pub use config::CompletionConfig;
pub use error::CompletionError;
