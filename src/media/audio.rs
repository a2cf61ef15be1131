//! Модуль для работы с аудио
//!
//! Склейка фрагментов в один файл без перекодирования.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use log::{info, warn};
use crate::error::{NarratorError, Result};
use crate::utils::ffmpeg::run_ffmpeg_command;

/// Содержимое списка для concat demuxer
pub fn concat_list(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|file| format!("file '{}'\n", file.to_string_lossy().replace('\'', "'\\''")))
        .collect()
}

/// Склеить аудиофайлы в порядке следования в `output_path` (stream copy)
pub fn combine_audio(files: &[PathBuf], output_path: &Path) -> Result<PathBuf> {
    if files.is_empty() {
        return Err(NarratorError::AudioProcessing("No audio files to combine".to_string()));
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Относительные пути в списке считались бы от директории списка
    let absolute: Vec<PathBuf> = files
        .iter()
        .map(std::fs::canonicalize)
        .collect::<std::io::Result<_>>()?;

    let temp_dir = tempfile::tempdir()?;
    let list_path = temp_dir.path().join("concat_list.txt");
    let mut list_file = std::fs::File::create(&list_path)?;
    list_file.write_all(concat_list(&absolute).as_bytes())?;
    drop(list_file);

    info!("Combining {} audio files into {}", files.len(), output_path.display());
    run_ffmpeg_command([
        OsStr::new("-y"),
        OsStr::new("-f"),
        OsStr::new("concat"),
        OsStr::new("-safe"),
        OsStr::new("0"),
        OsStr::new("-i"),
        list_path.as_os_str(),
        OsStr::new("-c"),
        OsStr::new("copy"),
        output_path.as_os_str(),
    ])?;

    Ok(output_path.to_path_buf())
}

/// Удалить фрагменты после успешной склейки
pub fn remove_files(files: &[PathBuf]) {
    for file in files {
        if let Err(e) = std::fs::remove_file(file) {
            warn!("Failed to remove {}: {}", file.display(), e);
        }
    }
}
