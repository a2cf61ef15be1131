//! Основной файл библиотеки tts-narrator
//!
//! Библиотека озвучивает текст несколькими голосами: реплики в кавычках
//! приписываются говорящим с помощью языковой модели, каждому говорящему
//! назначается свой голос, фрагменты синтезируются и склеиваются в один файл.

pub mod config;
pub mod error;
pub mod media;
pub mod notification;
pub mod pipeline;
pub mod progress;
pub mod source;
pub mod speaker;
pub mod text;
pub mod tts;
pub mod utils;
pub mod voice;

use std::path::{Path, PathBuf};
use log::{debug, error, info, warn};

pub use crate::config::{NarrationMode, NarratorConfig, ReplyParsing, TtsModel, TtsVoice};
pub use crate::error::{NarratorError, Result};
pub use crate::pipeline::{ChunkPipeline, SynthesisRequest};
pub use crate::source::{PostTracker, WorkSource, WorkUnit};

use crate::media::audio::{combine_audio, remove_files};
use crate::pipeline::single_voice_requests;
use crate::progress::{ProcessStep, ProgressObserver, ProgressReporter, ProgressTracker};
use crate::speaker::{OpenAiChatClient, SpeakerAttribution, SpeakerResolver};
use crate::tts::{generate_audio_files, OpenAiSpeechClient, SpeechSynthesizer};
use crate::utils::ffmpeg::check_ffmpeg_installed;
use crate::voice::VoiceAssigner;

/// Итог одного прогона
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Narration {
    /// Итоговый файл сохранен
    Saved(PathBuf),
    /// В тексте нечего озвучивать. Пост из списка при этом отмечается прочитанным.
    Skipped(String),
    /// Непрочитанных постов не осталось
    Exhausted,
}

/// Основная структура для работы с библиотекой
pub struct Narrator {
    /// Конфигурация библиотеки
    config: NarratorConfig,
    /// Трекер прогресса
    progress_tracker: Option<ProgressTracker>,
}

impl Narrator {
    pub fn new(config: NarratorConfig) -> Self {
        Self {
            config,
            progress_tracker: None,
        }
    }

    pub fn with_progress_reporter(config: NarratorConfig, reporter: Box<dyn ProgressReporter>) -> Self {
        Self {
            config,
            progress_tracker: Some(ProgressTracker::with_reporter(reporter)),
        }
    }

    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }

    /// Установить репортер прогресса
    pub fn set_progress_reporter(&mut self, reporter: Box<dyn ProgressReporter>) {
        match &mut self.progress_tracker {
            Some(tracker) => tracker.set_reporter(reporter),
            None => self.progress_tracker = Some(ProgressTracker::with_reporter(reporter)),
        }
    }

    /// Добавить наблюдателя прогресса.
    ///
    /// Без репортера создается [`progress::DefaultProgressReporter`].
    pub fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> usize {
        if self.progress_tracker.is_none() {
            self.set_progress_reporter(Box::new(progress::DefaultProgressReporter::new()));
        }
        self.progress_tracker
            .as_mut()
            .and_then(|tracker| tracker.add_observer(observer))
            .unwrap_or(0)
    }

    fn step(&self, step: ProcessStep, details: &str) {
        if let Some(t) = &self.progress_tracker {
            t.set_step(step);
            t.update_step_progress(0.0, Some(details.to_string()));
        }
    }

    fn finish(&self) {
        if let Some(t) = &self.progress_tracker {
            t.complete();
        }
    }

    fn step_done(&self, details: &str) {
        if let Some(t) = &self.progress_tracker {
            t.update_step_progress(100.0, Some(details.to_string()));
        }
    }

    /// Озвучить источник с клиентами OpenAI
    pub async fn narrate(&self, source: WorkSource) -> Result<Narration> {
        self.config.validate()?;

        let resolver = SpeakerResolver::new(Box::new(OpenAiChatClient::new(&self.config)?), &self.config);
        let synthesizer = OpenAiSpeechClient::new(&self.config)?;

        self.narrate_with(&source, resolver, &synthesizer).await
    }

    /// Озвучить источник с заданными определителем говорящих и синтезатором
    pub async fn narrate_with<A: SpeakerAttribution>(
        &self,
        source: &WorkSource,
        resolver: A,
        synthesizer: &dyn SpeechSynthesizer,
    ) -> Result<Narration> {
        info!("Starting narration");

        // 1. Загрузка текста
        self.step(ProcessStep::SourceLoading, "Загрузка текста");
        let unit = match source.load()? {
            Some(unit) => unit,
            None => {
                info!("No more posts to read");
                self.finish();
                return Ok(Narration::Exhausted);
            }
        };
        self.step_done("Текст загружен");

        // 2. Разбор текста на фрагменты
        self.step(ProcessStep::Segmentation, "Разбор текста");
        let requests = self.build_requests_with(&unit.text, resolver).await?;
        if requests.is_empty() {
            warn!("Nothing to narrate in {}, skipping", unit.title);
            self.confirm_post(source, &unit)?;
            self.finish();
            return Ok(Narration::Skipped(unit.title));
        }
        self.step_done(&format!("Фрагментов: {}", requests.len()));

        // 3. Синтез речи
        self.step(ProcessStep::SpeechGeneration, "Генерация речи");
        let chunks_dir = self.config.chunks_dir.join(&unit.title);
        let files = generate_audio_files(&requests, synthesizer, &chunks_dir, self.progress_tracker.as_ref())
            .await
            .map_err(|e| {
                error!("Speech generation failed: {}", e);
                e
            })?;

        // 4. Склейка
        self.step(ProcessStep::AudioAssembly, "Склейка аудио");
        let output_path = self.assemble(&unit, &files, &chunks_dir)?;

        self.confirm_post(source, &unit)?;
        self.finish();
        info!("Narration saved to {}", output_path.display());
        Ok(Narration::Saved(output_path))
    }

    fn confirm_post(&self, source: &WorkSource, unit: &WorkUnit) -> Result<()> {
        if let (Some(pending), WorkSource::NextPost(tracker)) = (&unit.pending_post, source) {
            tracker.confirm(pending)?;
        }
        Ok(())
    }

    /// Построить запросы синтеза для текста в текущем режиме озвучивания
    pub async fn build_requests_with<A: SpeakerAttribution>(
        &self,
        text: &str,
        resolver: A,
    ) -> Result<Vec<SynthesisRequest>> {
        match self.config.narration_mode {
            NarrationMode::MultiVoice => {
                let mut pipeline = ChunkPipeline::new(resolver, VoiceAssigner::from_config(&self.config)?);
                pipeline.build_requests(text).await
            }
            NarrationMode::SingleVoice => Ok(single_voice_requests(
                text,
                self.config.single_voice,
                self.config.max_chunk_chars,
            )),
        }
    }

    fn assemble(&self, unit: &WorkUnit, files: &[PathBuf], chunks_dir: &Path) -> Result<PathBuf> {
        if !check_ffmpeg_installed() {
            return Err(NarratorError::AudioProcessing("FFmpeg is not installed or not in PATH".to_string()));
        }

        let output_path = self.config.output_dir.join(format!("{}.mp3", unit.title));
        combine_audio(files, &output_path)?;

        if self.config.cleanup_chunks {
            remove_files(files);
            if let Err(e) = std::fs::remove_dir(chunks_dir) {
                debug!("Chunks directory {} not removed: {}", chunks_dir.display(), e);
            }
        }
        self.step_done("Склейка завершена");

        Ok(output_path)
    }
}

/// Озвучить файл книги
pub async fn narrate_book<P: AsRef<Path>>(path: P, config: NarratorConfig) -> Result<Narration> {
    Narrator::new(config)
        .narrate(WorkSource::Book(path.as_ref().to_path_buf()))
        .await
}

/// Озвучить следующий неозвученный пост из списка
pub async fn narrate_next_post<P, B>(posts_file: P, books_dir: B, config: NarratorConfig) -> Result<Narration>
where
    P: AsRef<Path>,
    B: AsRef<Path>,
{
    let tracker = PostTracker::new(posts_file.as_ref(), books_dir.as_ref());
    Narrator::new(config).narrate(WorkSource::NextPost(tracker)).await
}
