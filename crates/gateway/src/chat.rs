//! Chat orchestration: compiled knowledge base → system prompt → provider.

use std::sync::Arc;

use pepil_core::message::Message;
use pepil_core::provider::{Provider, ProviderRequest};
use pepil_core::Result;
use pepil_knowledge::{DatasetSource, KnowledgeCompiler, build_prompt};
use tracing::{debug, info};

/// Answers a conversation using the compiled knowledge base as grounding.
///
/// The knowledge base is compiled on the first reply and reused afterwards.
/// The provider's reply is returned as-is.
pub struct ChatService<S = Arc<pepil_knowledge::KnowledgeBase>> {
    provider: Arc<dyn Provider>,
    compiler: KnowledgeCompiler<S>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl<S: DatasetSource> ChatService<S> {
    pub fn new(provider: Arc<dyn Provider>, source: S, model: impl Into<String>) -> Self {
        Self {
            provider,
            compiler: KnowledgeCompiler::new(source),
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The full system prompt, compiling the knowledge base if needed.
    pub fn system_prompt(&self) -> Result<String> {
        let document = self.compiler.compile()?;
        Ok(build_prompt(document))
    }

    /// Generate the assistant's next reply for `history`.
    pub async fn reply(&self, history: &[Message]) -> Result<String> {
        let system_prompt = self.system_prompt()?;

        let mut request =
            ProviderRequest::with_system_prompt(&self.model, system_prompt, history)
                .temperature(self.temperature);
        if let Some(max_tokens) = self.max_tokens {
            request = request.max_tokens(max_tokens);
        }

        debug!(
            provider = %self.provider.name(),
            model = %self.model,
            messages = request.messages.len(),
            "Requesting completion"
        );

        let response = self.provider.complete(request).await?;

        if let Some(usage) = &response.usage {
            info!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion received"
            );
        }

        Ok(response.message.content)
    }
}
