use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::config::LLMConfig;
use crate::types::{AppResult, LLMMessage, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// The single remote model client used by the report and chat agents
pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider_name: String,
}

impl LLM {
    pub fn new(config: &LLMConfig) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let adapter: Box<dyn LLMAdapter> = match (config.provider, config.api_base.as_deref()) {
            (_, Some(api_base)) => Box::new(crate::llm::openai::OpenAIAdapter::new_with_api_base(
                &config.api_key,
                api_base,
                timeout,
            )?),
            (LLMProvider::Groq, None) => Box::new(crate::llm::groq::GroqAdapter::new(&config.api_key, timeout)?),
            (LLMProvider::OpenAI, None) => Box::new(crate::llm::openai::OpenAIAdapter::new(&config.api_key, timeout)?),
        };

        info!(provider = %config.provider, api_base = ?config.api_base, "LLM client ready");

        Ok(Self {
            adapter,
            provider_name: config.provider.to_string(),
        })
    }

    /// Wrap an existing adapter, e.g. a stub in tests
    pub fn with_adapter(adapter: Box<dyn LLMAdapter>, provider_name: impl Into<String>) -> Self {
        Self {
            adapter,
            provider_name: provider_name.into(),
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }

    /// Single-shot completion returning only the generated text
    pub async fn complete(
        &self,
        messages: Vec<LLMMessage>,
        model: &str,
        temperature: Option<f32>,
    ) -> AppResult<String> {
        let request = LLMRequest {
            model: model.to_string(),
            messages,
            max_tokens: None,
            temperature,
        };
        let response = self.create_chat_completion(&request).await?;
        info!(
            provider = %self.provider_name,
            model = %model,
            finish_reason = %response.finish_reason,
            total_tokens = response.usage.total_tokens,
            "Completion received"
        );
        Ok(response.content)
    }
}
