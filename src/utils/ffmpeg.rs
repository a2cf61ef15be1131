//! Модуль для работы с FFmpeg

use std::ffi::OsStr;
use std::process::Command;
use crate::error::{NarratorError, Result};

/// Проверка наличия FFmpeg в PATH
pub fn check_ffmpeg_installed() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Запуск команды FFmpeg; при ошибке в сообщение попадает хвост stderr
pub fn run_ffmpeg_command<I, S>(args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new("ffmpeg").args(args).output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
        let tail: Vec<&str> = tail.into_iter().rev().collect();
        return Err(NarratorError::AudioProcessing(format!(
            "FFmpeg command failed with status {}: {}",
            output.status,
            tail.join(" | ")
        )));
    }

    Ok(())
}
