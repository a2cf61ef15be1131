//! Назначение голосов говорящим
//!
//! Голос выбирается по кругу из пула, соответствующего полу, при первой
//! встрече говорящего и дальше не меняется до конца прогона.

use std::collections::HashMap;
use log::debug;
use crate::config::{NarratorConfig, TtsVoice};
use crate::error::{NarratorError, Result};
use crate::text::segment::Gender;

/// Пулы голосов с круговыми счетчиками и закрепленными назначениями
#[derive(Debug, Clone)]
pub struct VoiceAssigner {
    male_voices: Vec<TtsVoice>,
    female_voices: Vec<TtsVoice>,
    male_index: usize,
    female_index: usize,
    voice_map: HashMap<String, TtsVoice>,
}

impl VoiceAssigner {
    pub fn new(male_voices: Vec<TtsVoice>, female_voices: Vec<TtsVoice>) -> Result<Self> {
        if male_voices.is_empty() || female_voices.is_empty() {
            return Err(NarratorError::Configuration("Voice pools must not be empty".to_string()));
        }
        Ok(Self {
            male_voices,
            female_voices,
            male_index: 0,
            female_index: 0,
            voice_map: HashMap::new(),
        })
    }

    pub fn from_config(config: &NarratorConfig) -> Result<Self> {
        Self::new(config.male_voices.clone(), config.female_voices.clone())
    }

    /// Голос для говорящего.
    ///
    /// Повторный вызов для того же имени возвращает прежний голос, пол игнорируется.
    /// `Male` берет из мужского пула, все остальное - из женского.
    pub fn pick(&mut self, speaker: &str, gender: Gender) -> TtsVoice {
        if let Some(voice) = self.voice_map.get(speaker) {
            return *voice;
        }

        let voice = if gender == Gender::Male {
            let voice = self.male_voices[self.male_index % self.male_voices.len()];
            self.male_index += 1;
            voice
        } else {
            let voice = self.female_voices[self.female_index % self.female_voices.len()];
            self.female_index += 1;
            voice
        };

        debug!("Assigned voice {} to speaker {} ({})", voice, speaker, gender);
        self.voice_map.insert(speaker.to_string(), voice);
        voice
    }

    /// Уже назначенный голос
    pub fn assigned(&self, speaker: &str) -> Option<TtsVoice> {
        self.voice_map.get(speaker).copied()
    }

    /// Количество говорящих с голосами
    pub fn len(&self) -> usize {
        self.voice_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voice_map.is_empty()
    }
}

impl Default for VoiceAssigner {
    fn default() -> Self {
        let config = NarratorConfig::default();
        Self {
            male_voices: config.male_voices,
            female_voices: config.female_voices,
            male_index: 0,
            female_index: 0,
            voice_map: HashMap::new(),
        }
    }
}
