//! # Pepil Core
//!
//! Domain types, traits, and error definitions shared by every Pepil crate.
//! This crate has **zero framework dependencies**: it defines the conversation
//! model and the completion-provider seam that the other crates implement
//! against.
//!
//! The knowledge base compiler lives in `pepil-knowledge`; this crate only
//! knows about messages and the external model that consumes them.

pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result};
pub use message::{Conversation, ConversationId, Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
