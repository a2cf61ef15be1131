//! Последовательная генерация аудиофрагментов
//!
//! Фрагмент `i` сохраняется в `chunk_{i}.mp3`. Если файл уже есть, запрос
//! к API не отправляется, поэтому прерванный прогон можно перезапустить.

use std::path::{Path, PathBuf};
use log::info;
use crate::error::Result;
use crate::pipeline::SynthesisRequest;
use crate::progress::ProgressTracker;
use crate::tts::SpeechSynthesizer;

/// Путь к файлу фрагмента
pub fn chunk_file_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("chunk_{}.mp3", index))
}

async fn is_generated(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.is_file() && metadata.len() > 0,
        Err(_) => false,
    }
}

/// Сгенерировать аудио для всех запросов по порядку, вернуть пути к файлам
pub async fn generate_audio_files(
    requests: &[SynthesisRequest],
    synthesizer: &dyn SpeechSynthesizer,
    dir: &Path,
    tracker: Option<&ProgressTracker>,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;

    let total = requests.len();
    let mut files = Vec::with_capacity(total);

    for (index, request) in requests.iter().enumerate() {
        let path = chunk_file_path(dir, index);

        if is_generated(&path).await {
            info!("Reusing existing audio for chunk {}: {}", index, path.display());
        } else {
            info!(
                "Generating audio for chunk {} with speaker {} and voice {}",
                index, request.speaker, request.voice
            );
            let audio = synthesizer.synthesize(request.voice, &request.text).await?;

            // Недописанный файл не должен выглядеть готовым при повторном запуске
            let partial = path.with_extension("mp3.part");
            tokio::fs::write(&partial, &audio).await?;
            tokio::fs::rename(&partial, &path).await?;
        }

        files.push(path);

        if let Some(t) = tracker {
            let progress = (index + 1) as f32 / total as f32 * 100.0;
            t.update_step_progress(progress, Some(format!("Фрагмент {}/{}", index + 1, total)));
        }
    }

    Ok(files)
}
