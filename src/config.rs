//! Модуль конфигурации библиотеки tts-narrator
//!
//! Настройки моделей OpenAI, пулов голосов, режимов озвучивания и рабочих директорий.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::{NarratorError, Result};

/// Системная инструкция для угадывания говорящих
pub const DEFAULT_SYSTEM_PROMPT: &str = "Help me guess speakers for different quotes in a paragraph. \
Guess the gender of the speaker if you can. If unknown, say UNKNOWN. \
Give output for each quote in the format: speaker,gender";

/// Модель TTS для использования с OpenAI API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TtsModel {
    /// Стандартная модель
    Standard,
    /// Модель высокого качества
    #[default]
    HighDefinition,
}

impl TtsModel {
    /// Получить строковое представление модели
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "tts-1",
            Self::HighDefinition => "tts-1-hd",
        }
    }
}

/// Голос для использования с OpenAI API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TtsVoice {
    Alloy,
    Echo,
    Fable,
    Onyx,
    #[default]
    Nova,
    Shimmer,
}

impl TtsVoice {
    /// Получить строковое представление голоса
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Shimmer => "shimmer",
        }
    }
}

impl fmt::Display for TtsVoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TtsVoice {
    type Err = NarratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "alloy" => Ok(Self::Alloy),
            "echo" => Ok(Self::Echo),
            "fable" => Ok(Self::Fable),
            "onyx" => Ok(Self::Onyx),
            "nova" => Ok(Self::Nova),
            "shimmer" => Ok(Self::Shimmer),
            other => Err(NarratorError::Configuration(format!("Unknown TTS voice: {}", other))),
        }
    }
}

/// Способ разбора ответа модели вида `speaker,gender`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ReplyParsing {
    /// Разделение по первой запятой
    #[default]
    Delimited,
    /// Первый символ ответа - говорящий, второй - пол.
    /// Совместимо с выводом старых прогонов.
    FirstCharacters,
}

/// Режим озвучивания
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NarrationMode {
    /// Реплики разбираются по говорящим, у каждого свой голос
    #[default]
    MultiVoice,
    /// Весь текст читается одним голосом крупными блоками
    SingleVoice,
}

/// Конфигурация библиотеки
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// API ключ для OpenAI
    pub openai_api_key: String,
    /// Базовый URL API (без завершающего `/`)
    pub api_base_url: String,
    /// Модель для угадывания говорящих
    pub chat_model: String,
    /// Ограничение длины ответа модели
    pub max_reply_tokens: u32,
    /// Системная инструкция для истории диалога
    pub system_prompt: String,
    /// Разбор ответа модели
    pub reply_parsing: ReplyParsing,
    /// Модель TTS
    pub tts_model: TtsModel,
    /// Скорость речи
    pub tts_speed: f32,
    /// Режим озвучивания
    pub narration_mode: NarrationMode,
    /// Голос для режима одного голоса
    pub single_voice: TtsVoice,
    /// Максимальная длина блока в режиме одного голоса
    pub max_chunk_chars: usize,
    /// Пул мужских голосов
    pub male_voices: Vec<TtsVoice>,
    /// Пул женских голосов
    pub female_voices: Vec<TtsVoice>,
    /// Директория для аудиофрагментов
    pub chunks_dir: PathBuf,
    /// Директория для итоговых файлов
    pub output_dir: PathBuf,
    /// Удалять фрагменты после успешной склейки
    pub cleanup_chunks: bool,
    /// Таймаут HTTP запросов в секундах
    pub request_timeout_secs: Option<u64>,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            max_reply_tokens: 60,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            reply_parsing: ReplyParsing::default(),
            tts_model: TtsModel::default(),
            tts_speed: 1.0,
            narration_mode: NarrationMode::default(),
            single_voice: TtsVoice::Nova,
            max_chunk_chars: 4096,
            male_voices: vec![TtsVoice::Echo, TtsVoice::Onyx, TtsVoice::Fable],
            female_voices: vec![TtsVoice::Shimmer, TtsVoice::Nova, TtsVoice::Alloy],
            chunks_dir: PathBuf::from("temp_audio_files"),
            output_dir: PathBuf::from("combined_audio_files"),
            cleanup_chunks: true,
            request_timeout_secs: None,
        }
    }
}

impl NarratorConfig {
    /// Загрузить конфигурацию из JSON файла. Отсутствующие поля берутся по умолчанию.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NarratorError::FileNotFound(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Конфигурация по умолчанию с переопределениями из окружения
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Переопределить поля значениями `OPENAI_API_KEY` и `OPENAI_BASE_URL`
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.openai_api_key = key;
            }
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
    }

    /// Проверить конфигурацию перед запуском
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            return Err(NarratorError::Configuration("OpenAI API key is required".to_string()));
        }
        if self.male_voices.is_empty() || self.female_voices.is_empty() {
            return Err(NarratorError::Configuration("Voice pools must not be empty".to_string()));
        }
        if self.max_chunk_chars == 0 {
            return Err(NarratorError::Configuration("max_chunk_chars must be positive".to_string()));
        }
        Ok(())
    }

    /// URL конечной точки API
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// HTTP клиент с учетом таймаута
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }
}
