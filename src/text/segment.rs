//! Типы сегментов текста
//!
//! Сегмент - атомарная единица озвучивания: директива, повествование или реплика.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Идентификатор говорящего для директив
pub const SYSTEM_SPEAKER: &str = "system";
/// Идентификатор говорящего для повествования
pub const NARRATOR_SPEAKER: &str = "narrator";
/// Идентификатор говорящего, которого не удалось определить
pub const UNKNOWN_SPEAKER: &str = "UNKNOWN";

/// Тип сегмента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Абзац в квадратных скобках
    System,
    /// Текст вне кавычек
    Narrator,
    /// Текст в двойных кавычках
    Quote,
}

/// Пол говорящего
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Разобрать пол из ответа модели.
    ///
    /// Пустой или нераспознанный токен дает `Male`, явное `unknown` - `Unknown`.
    pub fn from_token(token: &str) -> Self {
        match token.trim().trim_matches(|c: char| c == '.' || c == '"').to_lowercase().as_str() {
            "male" | "m" | "man" | "boy" => Self::Male,
            "female" | "f" | "woman" | "girl" => Self::Female,
            "unknown" => Self::Unknown,
            _ => Self::Male,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Сегмент текста для озвучивания
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
    pub speaker: String,
    pub gender: Gender,
}

impl Segment {
    /// Директива из абзаца в квадратных скобках
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::System,
            text: text.into(),
            speaker: SYSTEM_SPEAKER.to_string(),
            gender: Gender::Male,
        }
    }

    /// Повествование
    pub fn narrator(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Narrator,
            text: text.into(),
            speaker: NARRATOR_SPEAKER.to_string(),
            gender: Gender::Male,
        }
    }

    /// Реплика с определенным говорящим
    pub fn quote(text: impl Into<String>, speaker: impl Into<String>, gender: Gender) -> Self {
        Self {
            kind: SegmentKind::Quote,
            text: text.into(),
            speaker: speaker.into(),
            gender,
        }
    }
}
