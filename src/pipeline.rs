//! Сборка списка запросов синтеза речи
//!
//! Текст проходит сегментатор, каждому сегменту назначается голос,
//! результат - упорядоченный список пар (голос, текст).

use log::info;
use serde::Serialize;
use crate::config::TtsVoice;
use crate::error::Result;
use crate::speaker::SpeakerAttribution;
use crate::text::chunker::chunk_text;
use crate::text::segment::NARRATOR_SPEAKER;
use crate::text::segmenter::TextSegmenter;
use crate::voice::VoiceAssigner;

/// Запрос синтеза одного фрагмента
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisRequest {
    pub voice: TtsVoice,
    pub text: String,
    /// Говорящий, для логов
    pub speaker: String,
}

/// Конвейер одного прогона: сегментатор, определитель говорящих и общий назначатель голосов
pub struct ChunkPipeline<A> {
    segmenter: TextSegmenter,
    resolver: A,
    voices: VoiceAssigner,
}

impl<A: SpeakerAttribution> ChunkPipeline<A> {
    pub fn new(resolver: A, voices: VoiceAssigner) -> Self {
        Self {
            segmenter: TextSegmenter::new(),
            resolver,
            voices,
        }
    }

    /// Построить запросы синтеза в порядке чтения
    pub async fn build_requests(&mut self, text: &str) -> Result<Vec<SynthesisRequest>> {
        let segments = self.segmenter.segment(text, &mut self.resolver).await?;

        let requests: Vec<SynthesisRequest> = segments
            .into_iter()
            .map(|segment| SynthesisRequest {
                voice: self.voices.pick(&segment.speaker, segment.gender),
                text: segment.text,
                speaker: segment.speaker,
            })
            .collect();

        info!(
            "Built {} synthesis requests for {} speakers",
            requests.len(),
            self.voices.len()
        );
        Ok(requests)
    }

    pub fn resolver(&self) -> &A {
        &self.resolver
    }

    pub fn voices(&self) -> &VoiceAssigner {
        &self.voices
    }
}

/// Запросы для озвучивания всего текста одним голосом
pub fn single_voice_requests(text: &str, voice: TtsVoice, max_length: usize) -> Vec<SynthesisRequest> {
    chunk_text(text, max_length)
        .into_iter()
        .map(|chunk| SynthesisRequest {
            voice,
            text: chunk,
            speaker: NARRATOR_SPEAKER.to_string(),
        })
        .collect()
}
