//! Модуль для работы с TTS
//!
//! Синтез речи по фрагментам с возобновлением по уже готовым файлам.

pub mod generator;
pub mod openai;

use async_trait::async_trait;
use bytes::Bytes;
use crate::config::TtsVoice;
use crate::error::Result;

pub use generator::{chunk_file_path, generate_audio_files};
pub use openai::OpenAiSpeechClient;

/// Внешний сервис синтеза речи
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Синтезировать `text` голосом `voice`, вернуть байты аудиофайла
    async fn synthesize(&self, voice: TtsVoice, text: &str) -> Result<Bytes>;
}
