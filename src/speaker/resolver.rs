//! Определение говорящего для отдельной реплики

use async_trait::async_trait;
use log::{debug, warn};
use crate::config::{NarratorConfig, ReplyParsing};
use crate::error::Result;
use crate::speaker::{Conversation, InferenceService, Resolution, SpeakerAttribution};
use crate::text::segment::{Gender, UNKNOWN_SPEAKER};

/// Определитель говорящих с накопительной историей диалога.
///
/// Один экземпляр обслуживает ровно один прогон конвейера. Запросы идут
/// строго последовательно: порядок истории задает причинную связь между догадками.
pub struct SpeakerResolver {
    service: Box<dyn InferenceService>,
    history: Conversation,
    max_tokens: u32,
    parsing: ReplyParsing,
}

impl SpeakerResolver {
    /// Создать определитель с настройками из конфигурации
    pub fn new(service: Box<dyn InferenceService>, config: &NarratorConfig) -> Self {
        Self::with_settings(service, &config.system_prompt, config.max_reply_tokens, config.reply_parsing)
    }

    pub fn with_settings(
        service: Box<dyn InferenceService>,
        system_prompt: &str,
        max_tokens: u32,
        parsing: ReplyParsing,
    ) -> Self {
        Self {
            service,
            history: Conversation::new(system_prompt),
            max_tokens,
            parsing,
        }
    }

    /// История диалога текущего прогона
    pub fn history(&self) -> &Conversation {
        &self.history
    }

    /// Определить говорящего и пол для реплики `quote` в абзаце `context`.
    ///
    /// Ошибка сервиса не перехватывается: прогон для этого текста прерывается.
    pub async fn resolve(&mut self, context: &str, quote: &str) -> Result<Resolution> {
        self.history.push_user(user_prompt(context, quote));

        let reply = self.service.complete(self.history.messages(), self.max_tokens).await?;
        debug!("Speaker reply for quote of length {}: {:?}", quote.len(), reply);

        // Ответ попадает в историю даже если он непригоден
        self.history.push_assistant(reply.clone().unwrap_or_default());

        Ok(parse_reply(reply.as_deref(), self.parsing))
    }
}

#[async_trait]
impl SpeakerAttribution for SpeakerResolver {
    async fn resolve(&mut self, context: &str, quote: &str) -> Result<Resolution> {
        SpeakerResolver::resolve(self, context, quote).await
    }
}

fn user_prompt(context: &str, quote: &str) -> String {
    format!("Given the context: [{}], who is most likely to say: [{}]?", context, quote)
}

/// Разобрать ответ модели вида `speaker,gender`
pub fn parse_reply(reply: Option<&str>, parsing: ReplyParsing) -> Resolution {
    let reply = reply.map(str::trim).unwrap_or("");
    if reply.is_empty() {
        warn!("Empty speaker reply, falling back to {}", UNKNOWN_SPEAKER);
        return Resolution::new(UNKNOWN_SPEAKER, Gender::Male);
    }

    match parsing {
        ReplyParsing::Delimited => parse_delimited(reply),
        ReplyParsing::FirstCharacters => parse_first_characters(reply),
    }
}

fn parse_delimited(reply: &str) -> Resolution {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("");
    let mut parts = line.splitn(2, ',');

    let speaker = parts
        .next()
        .map(|s| s.trim().trim_matches(|c: char| c == '"' || c == '\'' || c == '.'))
        .unwrap_or("");
    let speaker = if speaker.is_empty() || speaker.eq_ignore_ascii_case(UNKNOWN_SPEAKER) {
        UNKNOWN_SPEAKER
    } else {
        speaker
    };

    let gender = parts.next().map(Gender::from_token).unwrap_or(Gender::Male);
    Resolution::new(speaker, gender)
}

fn parse_first_characters(reply: &str) -> Resolution {
    let mut chars = reply.chars();
    let speaker = chars.next().map(|c| c.to_string()).unwrap_or_else(|| UNKNOWN_SPEAKER.to_string());
    let gender = chars
        .next()
        .map(|c| Gender::from_token(&c.to_string()))
        .unwrap_or(Gender::Male);
    Resolution::new(speaker, gender)
}
