//! Chat completions client for GitHub Models and other OpenAI-compatible
//! inference endpoints.
//!
//! [`InferenceClient::infer`] is the entry point used by the labeler: it never
//! fails, and folds every transport or API problem into `None` after logging it.

pub mod client;
pub mod error;
pub mod types;

pub use client::{InferenceClient, DEFAULT_ENDPOINT};
pub use error::{InferenceError, InferenceResult};
pub use types::{ChatMessage, InferenceRequest, Role};
