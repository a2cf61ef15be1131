//! Клиент OpenAI Chat Completions для определения говорящих

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use crate::config::NarratorConfig;
use crate::error::{NarratorError, Result};
use crate::speaker::{ChatMessage, InferenceService};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Клиент для работы с OpenAI Chat API
pub struct OpenAiChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(config: &NarratorConfig) -> Result<Self> {
        Ok(Self {
            client: config.http_client()?,
            endpoint: config.endpoint("chat/completions"),
            api_key: config.openai_api_key.clone(),
            model: config.chat_model.clone(),
        })
    }
}

#[async_trait]
impl InferenceService for OpenAiChatClient {
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<Option<String>> {
        debug!("Sending chat request with {} messages to {}", messages.len(), self.endpoint);

        let request = ChatRequest {
            model: &self.model,
            messages,
            max_tokens,
        };

        let response = self.client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = match response.text().await {
                Ok(text) => text,
                Err(e) => format!("Failed to read error response: {}", e),
            };
            error!("OpenAI chat API error (status {}): {}", status, error_text);
            return Err(NarratorError::Inference(format!("status {}: {}", status, error_text)));
        }

        let completion: ChatCompletion = response.json().await?;
        Ok(completion.choices.into_iter().next().and_then(|c| c.message.content))
    }
}
