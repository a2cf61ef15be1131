//! Наблюдатели прогресса
//!
//! Конкретные реализации `ProgressObserver` для CLI, логов, файлов и тестов.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use crate::progress::{ProgressInfo, ProgressObserver};

fn format_progress(progress: &ProgressInfo) -> String {
    match progress.details.as_deref() {
        Some(details) if !details.is_empty() => format!(
            "{} - {:.1}% (всего {:.1}%): {}",
            progress.step, progress.step_progress, progress.total_progress, details
        ),
        _ => format!(
            "{} - {:.1}% (всего {:.1}%)",
            progress.step, progress.step_progress, progress.total_progress
        ),
    }
}

/// Пишет прогресс в лог на уровне info
#[derive(Debug, Default)]
pub struct LogProgressObserver;

impl ProgressObserver for LogProgressObserver {
    fn on_progress_update(&self, progress: ProgressInfo) {
        log::info!("{}", format_progress(&progress));
    }
}

/// Хранит историю обновлений в памяти
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressObserver {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
}

impl MemoryProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<ProgressInfo> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl ProgressObserver for MemoryProgressObserver {
    fn on_progress_update(&self, progress: ProgressInfo) {
        if let Ok(mut history) = self.history.lock() {
            history.push(progress);
        }
    }
}

/// Дописывает строки прогресса с отметкой времени в файл
pub struct FileProgressObserver {
    file_path: PathBuf,
}

impl FileProgressObserver {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self { file_path: file_path.into() }
    }
}

impl ProgressObserver for FileProgressObserver {
    fn on_progress_update(&self, progress: ProgressInfo) {
        let line = format!(
            "[{}] {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            format_progress(&progress)
        );

        let written = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = written {
            log::warn!("Failed to write progress to {}: {}", self.file_path.display(), e);
        }
    }
}

/// Вызывает функцию при каждом обновлении
pub struct CallbackProgressObserver<F>
where
    F: Fn(ProgressInfo) + Send + Sync + 'static,
{
    callback: F,
}

impl<F> CallbackProgressObserver<F>
where
    F: Fn(ProgressInfo) + Send + Sync + 'static,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressObserver for CallbackProgressObserver<F>
where
    F: Fn(ProgressInfo) + Send + Sync + 'static,
{
    fn on_progress_update(&self, progress: ProgressInfo) {
        (self.callback)(progress);
    }
}

/// Прогресс-бар в stderr, перерисовывается при изменении хотя бы на 1%
pub struct ProgressBarObserver {
    width: usize,
    last_progress: Mutex<f32>,
}

impl ProgressBarObserver {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            last_progress: Mutex::new(-1.0),
        }
    }
}

impl Default for ProgressBarObserver {
    fn default() -> Self {
        Self::new(40)
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_progress_update(&self, progress: ProgressInfo) {
        let Ok(mut last_progress) = self.last_progress.lock() else {
            return;
        };
        let finished = progress.total_progress >= 100.0;
        if (*last_progress - progress.total_progress).abs() < 1.0 && !finished {
            return;
        }
        *last_progress = progress.total_progress;

        let filled = ((progress.total_progress / 100.0) * self.width as f32) as usize;
        let filled = filled.min(self.width);
        let mut stderr = std::io::stderr();
        let _ = write!(
            stderr,
            "\r[{}{}] {:5.1}% {}",
            "#".repeat(filled),
            "-".repeat(self.width - filled),
            progress.total_progress,
            progress.step
        );
        if finished {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();
    }
}

/// Рассылает обновления нескольким наблюдателям
#[derive(Default)]
pub struct CompositeProgressObserver {
    observers: Vec<Box<dyn ProgressObserver>>,
}

impl CompositeProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) {
        self.observers.push(observer);
    }
}

impl ProgressObserver for CompositeProgressObserver {
    fn on_progress_update(&self, progress: ProgressInfo) {
        for observer in &self.observers {
            observer.on_progress_update(progress.clone());
        }
    }
}
