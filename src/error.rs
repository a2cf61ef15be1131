//! Модуль обработки ошибок библиотеки tts-narrator
//!
//! Этот модуль содержит типы ошибок, которые могут возникнуть при озвучивании текста.

use thiserror::Error;

/// Ошибки библиотеки tts-narrator
#[derive(Debug, Error)]
pub enum NarratorError {
    /// Ошибка HTTP запроса
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ошибка запроса к языковой модели
    #[error("Inference error: {0}")]
    Inference(String),

    /// Ошибка генерации TTS
    #[error("TTS generation error: {0}")]
    TtsGeneration(String),

    /// Ошибка обработки аудио
    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    /// Ошибка конфигурации
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ошибка источника текста (список постов, скрапер)
    #[error("Source error: {0}")]
    Source(String),

    /// Файл не найден
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Другая ошибка
    #[error("Other error: {0}")]
    Other(String),
}

impl From<&str> for NarratorError {
    fn from(s: &str) -> Self {
        NarratorError::Other(s.to_string())
    }
}

impl From<String> for NarratorError {
    fn from(s: String) -> Self {
        NarratorError::Other(s)
    }
}

/// Тип Result для библиотеки tts-narrator
pub type Result<T> = std::result::Result<T, NarratorError>;
