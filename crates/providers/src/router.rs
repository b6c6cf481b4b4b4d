//! Provider router: selects the configured completion provider.

use crate::openai_compat::OpenAiCompatProvider;
use pepil_core::provider::Provider;
use std::collections::HashMap;
use std::sync::Arc;

/// Holds the registered providers and knows which one is the default.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    pub fn default_name(&self) -> &str {
        &self.default_provider
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// List all registered provider names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Run health checks on every provider, in name order.
    ///
    /// A provider whose check errors counts as unhealthy.
    pub async fn health_check_all(&self) -> Vec<(String, bool)> {
        let mut results = Vec::with_capacity(self.providers.len());
        for name in self.list() {
            let healthy = match self.providers.get(name) {
                Some(provider) => provider.health_check().await.unwrap_or(false),
                None => false,
            };
            results.push((name.to_string(), healthy));
        }
        results
    }
}

/// Build providers from configuration.
///
/// Every `[providers.<name>]` table becomes an OpenAI-compatible provider;
/// the default provider is always registered, even without a table.
pub fn build_from_config(config: &pepil_config::AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();

        let base_url = provider_config
            .api_url
            .clone()
            .unwrap_or_else(|| default_base_url(name));

        router.register(
            name.clone(),
            Arc::new(OpenAiCompatProvider::new(name, &base_url, &api_key)),
        );
    }

    if router.get(&config.default_provider).is_none() {
        let api_key = config.api_key.clone().unwrap_or_default();
        let base_url = default_base_url(&config.default_provider);
        router.register(
            config.default_provider.clone(),
            Arc::new(OpenAiCompatProvider::new(
                &config.default_provider,
                &base_url,
                &api_key,
            )),
        );
    }

    tracing::debug!(
        default = %config.default_provider,
        registered = router.providers.len(),
        "Provider router built"
    );

    router
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pepil_config::{AppConfig, ProviderConfig};
    use pepil_core::error::ProviderError;
    use pepil_core::provider::{ProviderRequest, ProviderResponse};

    struct StubProvider {
        name: &'static str,
        health: Result<bool, ProviderError>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured(self.name.into()))
        }

        async fn health_check(&self) -> Result<bool, ProviderError> {
            self.health.clone()
        }
    }

    #[test]
    fn router_register_and_lookup() {
        let mut router = ProviderRouter::new("openai");
        router.register("openai", Arc::new(OpenAiCompatProvider::openai("sk-test")));

        assert!(router.get("openai").is_some());
        assert!(router.get("nonexistent").is_none());
        assert!(router.default().is_some());
        assert_eq!(router.default_name(), "openai");
    }

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn build_from_default_config() {
        let config = AppConfig::default();
        let router = build_from_config(&config);
        let provider = router.default().unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(router.list(), ["openai"]);
    }

    #[test]
    fn configured_providers_are_registered() {
        let mut config = AppConfig::default();
        config.default_provider = "local".into();
        config.providers.insert(
            "local".into(),
            ProviderConfig {
                api_url: Some("http://localhost:8000/v1".into()),
                ..ProviderConfig::default()
            },
        );

        let router = build_from_config(&config);
        assert_eq!(router.list(), ["local"]);
        assert_eq!(router.default().unwrap().name(), "local");
    }

    #[tokio::test]
    async fn health_check_all_reports_each_provider_in_name_order() {
        let mut router = ProviderRouter::new("openai");
        router.register("openai", Arc::new(StubProvider { name: "openai", health: Ok(true) }));
        router.register("groq", Arc::new(StubProvider { name: "groq", health: Ok(false) }));
        router.register(
            "ollama",
            Arc::new(StubProvider {
                name: "ollama",
                health: Err(ProviderError::Network("connection refused".into())),
            }),
        );

        let results = router.health_check_all().await;
        assert_eq!(
            results,
            [
                ("groq".to_string(), false),
                ("ollama".to_string(), false),
                ("openai".to_string(), true),
            ]
        );
    }
}
