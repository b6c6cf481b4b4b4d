//! Chat-completion providers for Pepil.
//!
//! All providers implement the `pepil_core::Provider` trait.
//! The router selects the configured provider.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_from_config};
