//! Model provider seam: [`CompletionModel`] and the OpenRouter-compatible
//! chat-completions client.
//!
//! Calls are blocking; async callers run them on a worker thread.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use prelegal_core::ChatTurn;

use crate::config::ModelConfig;
use crate::error::AssistantError;

/// Everything the provider needs for one structured completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// System prompt first, then the conversation history.
    pub messages: Vec<ChatTurn>,
    pub schema_name: String,
    /// JSON Schema the reply content must satisfy.
    pub schema: Value,
}

/// A language model that answers with raw JSON text matching `request.schema`.
pub trait CompletionModel: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AssistantError>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// OpenRouterClient
// ---------------------------------------------------------------------------

/// `POST /chat/completions` client for OpenRouter (or any compatible router).
pub struct OpenRouterClient {
    agent: ureq::Agent,
    config: ModelConfig,
}

impl OpenRouterClient {
    pub fn new(config: ModelConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self { agent, config }
    }

    /// Request body for `request`.
    pub fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": request.messages,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema_name,
                    "strict": true,
                    "schema": request.schema,
                },
            },
        });
        if let Some(effort) = &self.config.reasoning_effort {
            body["reasoning"] = json!({ "effort": effort });
        }
        if !self.config.provider_order.is_empty() {
            body["provider"] = json!({ "order": self.config.provider_order });
        }
        body
    }
}

impl CompletionModel for OpenRouterClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AssistantError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingApiKey)?;
        let url = self.config.completions_url();
        tracing::debug!(
            model = %self.config.model,
            messages = request.messages.len(),
            "calling model"
        );

        let response = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {api_key}"))
            .send_json(self.request_body(request));

        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(AssistantError::Provider { status, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(AssistantError::Transport(transport.to_string()));
            }
        };

        let parsed: CompletionResponse = response
            .into_json()
            .map_err(|e| AssistantError::MalformedResponse(format!("invalid JSON body: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AssistantError::MalformedResponse("no message content in choices".into())
            })
    }
}
