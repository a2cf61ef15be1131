//! Модуль определения говорящих
//!
//! Для каждой реплики языковая модель угадывает имя и пол говорящего,
//! опираясь на абзац-контекст и всю предыдущую историю диалога.

pub mod conversation;
pub mod openai;
pub mod resolver;

use async_trait::async_trait;
use crate::error::Result;
use crate::text::segment::Gender;

pub use conversation::{ChatMessage, Conversation, Role};
pub use openai::OpenAiChatClient;
pub use resolver::{parse_reply, SpeakerResolver};

/// Внешний сервис вывода: история сообщений на вход, одно завершение на выход
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Возвращает `None`, если сервис ответил без текста
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<Option<String>>;
}

/// Результат определения говорящего
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub speaker: String,
    pub gender: Gender,
}

impl Resolution {
    pub fn new(speaker: impl Into<String>, gender: Gender) -> Self {
        Self { speaker: speaker.into(), gender }
    }
}

/// Источник атрибуции реплик для сегментатора
#[async_trait]
pub trait SpeakerAttribution: Send {
    async fn resolve(&mut self, context: &str, quote: &str) -> Result<Resolution>;
}
