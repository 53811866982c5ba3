//! Injected content-generator capability
//!
//! Minds that want a natural-language narrative call an injected
//! `ContentGenerator`, never a hard-coded network client, so the
//! deterministic scoring core stays testable without network access.
//! The default is `NoopGenerator`; `HttpGenerator` talks to an
//! Anthropic-style messages API when a key is configured.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::json;

/// A capability for producing short narrative text from a prompt.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Human-readable name for logs and reports.
    fn name(&self) -> &'static str;

    /// Generate text for the prompt. An empty string means "nothing to
    /// add" and is not an error.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Deterministic default: contributes no narrative.
#[derive(Debug, Default)]
pub struct NoopGenerator;

#[async_trait]
impl ContentGenerator for NoopGenerator {
    fn name(&self) -> &'static str {
        "noop"
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(String::new())
    }
}

/// Configuration for the HTTP generator
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// API base URL
    pub api_url: String,

    /// API key (from environment)
    pub api_key: String,

    /// Model to use
    pub model: String,

    /// Cap on generated tokens per call
    pub max_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
            api_key: std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 512,
        }
    }
}

/// Generator backed by an Anthropic-style messages API.
pub struct HttpGenerator {
    client: reqwest::Client,
    config: GeneratorConfig,
}

impl HttpGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ContentGenerator for HttpGenerator {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        if self.config.api_key.is_empty() {
            bail!("no API key configured (set ANTHROPIC_API_KEY)");
        }

        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [{"role": "user", "content": prompt}],
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .context("generator request failed")?;

        if !response.status().is_success() {
            bail!("generator API returned {}", response.status());
        }

        let value: serde_json::Value = response
            .json()
            .await
            .context("generator response was not JSON")?;

        let text = value["content"][0]["text"]
            .as_str()
            .context("generator response missing content text")?
            .to_string();

        Ok(text)
    }
}
