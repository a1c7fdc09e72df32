//! Language-model gateway.
//!
//! The one bridge between the agents and a text-generation service:
//! stateless request/response, prompt truncation before submission, and a
//! hard failure boundary — any transport or provider error becomes an
//! empty result that callers treat as "no analysis available". Retries,
//! if ever desired, belong to the orchestrator, not here.

pub mod anthropic;
pub mod openai;
pub mod provider;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;
pub use provider::*;

use std::sync::Arc;

use crate::error::ConfigError;

/// Supported text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Anthropic,
    OpenAi,
}

impl LlmBackend {
    /// Parse a backend name as it appears in configuration.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "anthropic" => Some(Self::Anthropic),
            "openai" => Some(Self::OpenAi),
            _ => None,
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::Anthropic => "claude-sonnet-4-20250514",
            Self::OpenAi => "gpt-4o",
        }
    }

    fn api_key_var(self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
}

impl LlmConfig {
    /// Build from the environment: `DAYBRIEF_LLM_BACKEND` selects the
    /// backend (default anthropic), the backend's own key variable supplies
    /// credentials, and `DAYBRIEF_MODEL` overrides the default model.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_name =
            std::env::var("DAYBRIEF_LLM_BACKEND").unwrap_or_else(|_| "anthropic".to_string());
        let backend =
            LlmBackend::parse(&backend_name).ok_or_else(|| ConfigError::InvalidValue {
                key: "DAYBRIEF_LLM_BACKEND".to_string(),
                message: format!("unknown backend '{backend_name}'"),
            })?;

        let api_key = std::env::var(backend.api_key_var())
            .map_err(|_| ConfigError::MissingEnvVar(backend.api_key_var().to_string()))?;

        let model = std::env::var("DAYBRIEF_MODEL")
            .unwrap_or_else(|_| backend.default_model().to_string());

        Ok(Self {
            backend,
            api_key: secrecy::SecretString::from(api_key),
            model,
        })
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Arc<dyn LlmProvider> {
    match config.backend {
        LlmBackend::Anthropic => {
            tracing::info!(model = %config.model, "using Anthropic backend");
            Arc::new(AnthropicProvider::new(
                config.api_key.clone(),
                config.model.clone(),
            ))
        }
        LlmBackend::OpenAi => {
            tracing::info!(model = %config.model, "using OpenAI backend");
            Arc::new(OpenAiProvider::new(
                config.api_key.clone(),
                config.model.clone(),
            ))
        }
    }
}

/// The gateway every agent talks through.
pub struct Gateway {
    provider: Arc<dyn LlmProvider>,
    prompt_char_limit: usize,
}

impl Gateway {
    pub fn new(provider: Arc<dyn LlmProvider>, prompt_char_limit: usize) -> Self {
        Self {
            provider,
            prompt_char_limit,
        }
    }

    /// Run one completion.
    ///
    /// The prompt is truncated to the configured character limit before
    /// submission. Errors never escape: they are logged and collapse to an
    /// empty string, which callers must treat as "no analysis available".
    pub async fn complete(&self, prompt: &str, system_instructions: &str) -> String {
        let prompt = truncate_chars(prompt, self.prompt_char_limit);

        let mut messages = Vec::with_capacity(2);
        if !system_instructions.is_empty() {
            messages.push(ChatMessage::system(system_instructions));
        }
        messages.push(ChatMessage::user(prompt));

        match self.provider.complete(CompletionRequest::new(messages)).await {
            Ok(response) => response.content,
            Err(e) => {
                tracing::error!(
                    model = self.provider.model_name(),
                    error = %e,
                    "gateway request failed"
                );
                String::new()
            }
        }
    }
}

/// Char-boundary-safe truncation.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::GatewayError;

    /// Mock provider recording the prompts it receives.
    struct RecordingLlm {
        prompts: Mutex<Vec<String>>,
        response: Result<String, ()>,
    }

    impl RecordingLlm {
        fn ok(response: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                response: Ok(response.to_string()),
            }
        }

        fn failing() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                response: Err(()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for RecordingLlm {
        fn model_name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, GatewayError> {
            let user_prompt = request
                .messages
                .iter()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .unwrap_or_default();
            self.prompts.lock().unwrap().push(user_prompt);

            match &self.response {
                Ok(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    input_tokens: 1,
                    output_tokens: 1,
                }),
                Err(()) => Err(GatewayError::RequestFailed {
                    provider: "mock".to_string(),
                    reason: "simulated outage".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn error_collapses_to_empty_string() {
        let gateway = Gateway::new(Arc::new(RecordingLlm::failing()), 2000);
        let result = gateway.complete("prompt", "instructions").await;
        assert_eq!(result, "");
    }

    #[tokio::test]
    async fn prompt_truncated_before_submission() {
        let llm = Arc::new(RecordingLlm::ok("done"));
        let gateway = Gateway::new(llm.clone(), 100);
        let long_prompt = "x".repeat(500);

        let result = gateway.complete(&long_prompt, "sys").await;
        assert_eq!(result, "done");

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts[0].chars().count(), 100);
    }

    #[tokio::test]
    async fn empty_system_instructions_omitted() {
        let llm = Arc::new(RecordingLlm::ok("ok"));
        let gateway = Gateway::new(llm.clone(), 2000);
        gateway.complete("hello", "").await;
        // Only the user prompt was recorded; no panic on missing system.
        assert_eq!(llm.prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "héllo wörld";
        let truncated = truncate_chars(s, 4);
        assert_eq!(truncated, "héll");
    }

    #[test]
    fn truncate_noop_when_short() {
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn backend_parse_is_case_insensitive() {
        assert_eq!(LlmBackend::parse("Anthropic"), Some(LlmBackend::Anthropic));
        assert_eq!(LlmBackend::parse("OPENAI"), Some(LlmBackend::OpenAi));
        assert_eq!(LlmBackend::parse("llama"), None);
    }
}
