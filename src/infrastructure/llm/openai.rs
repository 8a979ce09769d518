use std::time::Duration;

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openai;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::LlmConfig;

/// Chat-completion adapter over the OpenAI provider. Reads `OPENAI_API_KEY`
/// from the environment.
pub struct OpenAiLlm {
    model: String,
    max_tokens: u64,
    timeout: Duration,
}

impl OpenAiLlm {
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    async fn prompt_agent(&self, system: Option<&str>, prompt: &str) -> Result<String, DomainError> {
        let client = openai::Client::from_env();
        let mut builder = client.agent(&self.model).max_tokens(self.max_tokens);
        if let Some(system) = system {
            builder = builder.preamble(system);
        }
        let agent = builder.build();

        tokio::time::timeout(self.timeout, agent.prompt(prompt))
            .await
            .map_err(|_| DomainError::timeout("LLM completion timed out"))?
            .map_err(|e| DomainError::external(e.to_string()))
    }
}

#[async_trait]
impl LlmService for OpenAiLlm {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompt_agent(None, prompt).await
    }

    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        self.prompt_agent(Some(system), prompt).await
    }
}
