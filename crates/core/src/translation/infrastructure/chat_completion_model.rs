use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::shared::config::TranslationConfig;
use crate::shared::error::ServiceError;
use crate::translation::domain::language_model::LanguageModel;

/// Language model behind an OpenAI-compatible `/chat/completions` endpoint
/// (DeepSeek, OpenAI).
pub struct ChatCompletionModel {
    client: Client,
    name: String,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ChatCompletionModel {
    pub fn new(config: &TranslationConfig) -> Result<Self, ServiceError> {
        let name = config.provider.to_string();
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::from_reqwest(&name, e))?;

        if config.api_key.is_none() {
            log::warn!("No API key configured for {name}; requests will be unauthenticated");
        }

        Ok(Self {
            client,
            name,
            endpoint: config.endpoint().to_string(),
            model: config.model().to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn malformed(&self, reason: impl Into<String>) -> ServiceError {
        ServiceError::MalformedResponse {
            service: self.name.clone(),
            reason: reason.into(),
        }
    }

    /// Decodes a successful response body into the first choice's content.
    fn parse_response(&self, body: &str) -> Result<String, ServiceError> {
        let response: ChatResponse =
            serde_json::from_str(body).map_err(|e| self.malformed(e.to_string()))?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| self.malformed("no message content in choices"))
    }

    /// Maps a non-2xx response to the provider's error message if it sent
    /// one, otherwise to the bare status.
    fn parse_error(&self, status: u16, body: &str) -> ServiceError {
        match serde_json::from_str::<ApiErrorBody>(body) {
            Ok(err) => ServiceError::Api {
                service: self.name.clone(),
                message: format!("HTTP {status}: {}", err.error.message),
            },
            Err(_) => ServiceError::Status {
                service: self.name.clone(),
                status,
            },
        }
    }
}

impl LanguageModel for ChatCompletionModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        log::debug!("Sending {} byte prompt to {}", prompt.len(), self.endpoint);
        let response = builder
            .send()
            .map_err(|e| ServiceError::from_reqwest(&self.name, e))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ServiceError::from_reqwest(&self.name, e))?;

        if !status.is_success() {
            return Err(self.parse_error(status.as_u16(), &body));
        }
        self.parse_response(&body)
    }
}
