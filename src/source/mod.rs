//! Источники текста для озвучивания
//!
//! Локальный файл книги или следующий неозвученный пост из списка.

pub mod posts;
pub mod scraper;

use std::path::{Path, PathBuf};
use log::info;
use crate::error::{NarratorError, Result};

pub use posts::{filter_and_save_posts, title_from_path, PendingPost, Post, PostTracker};
pub use scraper::PostScraper;

/// Откуда брать текст
#[derive(Debug, Clone)]
pub enum WorkSource {
    /// Локальный текстовый файл
    Book(PathBuf),
    /// Следующий неозвученный пост
    NextPost(PostTracker),
}

/// Единица работы: один текст, один итоговый файл
#[derive(Debug, Clone)]
pub struct WorkUnit {
    pub title: String,
    pub text: String,
    /// Пост, который надо подтвердить после успешной склейки
    pub pending_post: Option<PendingPost>,
}

impl WorkSource {
    /// Загрузить текст. `None` - постов для озвучивания не осталось.
    pub fn load(&self) -> Result<Option<WorkUnit>> {
        match self {
            Self::Book(path) => {
                let text = read_book(path)?;
                let title = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "book".to_string());
                Ok(Some(WorkUnit { title, text, pending_post: None }))
            }
            Self::NextPost(tracker) => Ok(tracker.next_unread()?.map(|pending| WorkUnit {
                title: title_from_path(&pending.path),
                text: pending.text.clone(),
                pending_post: Some(pending),
            })),
        }
    }
}

/// Прочитать книгу целиком
pub fn read_book(path: &Path) -> Result<String> {
    info!("Reading book from {}", path.display());
    std::fs::read_to_string(path)
        .map_err(|e| NarratorError::FileNotFound(format!("Failed to read {}: {}", path.display(), e)))
}
