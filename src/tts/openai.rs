//! Модуль для интеграции с OpenAI Speech API

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error};
use reqwest::Client;
use crate::config::{NarratorConfig, TtsModel, TtsVoice};
use crate::error::{NarratorError, Result};
use crate::tts::SpeechSynthesizer;

/// Клиент для работы с OpenAI TTS API
pub struct OpenAiSpeechClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: TtsModel,
    speed: f32,
}

impl OpenAiSpeechClient {
    pub fn new(config: &NarratorConfig) -> Result<Self> {
        Ok(Self {
            client: config.http_client()?,
            endpoint: config.endpoint("audio/speech"),
            api_key: config.openai_api_key.clone(),
            model: config.tts_model,
            speed: config.tts_speed,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiSpeechClient {
    async fn synthesize(&self, voice: TtsVoice, text: &str) -> Result<Bytes> {
        debug!("Sending TTS request: model {}, voice {}, {} chars", self.model.as_str(), voice, text.len());

        let response = self.client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model.as_str(),
                "voice": voice.as_str(),
                "input": text,
                "response_format": "mp3",
                "speed": self.speed,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = match response.text().await {
                Ok(text) => text,
                Err(e) => format!("Failed to read error response: {}", e),
            };
            error!("OpenAI TTS API error (status {}): {}", status, error_text);
            return Err(NarratorError::TtsGeneration(format!("status {}: {}", status, error_text)));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(NarratorError::TtsGeneration("Received empty audio response".to_string()));
        }
        Ok(bytes)
    }
}
