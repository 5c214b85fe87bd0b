//! Dream interpretation chat
//!
//! An append-only transcript driven by single-flight request/response
//! round trips to a text-generation endpoint. Sessions live only as long
//! as the user stays on them; nothing here is persisted.

pub mod client;
pub mod session;

pub use client::{ChatCompletionsClient, CompletionClient, InferenceError, InterpreterConfig};
pub use session::{
    ChatMessage, InterpretError, InterpretationSession, Sender, FALLBACK_REPLY, WELCOME_MESSAGE,
};
