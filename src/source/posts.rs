//! Посты и учет уже озвученных
//!
//! Озвученный пост отмечается файлом `{id}_{title}.txt` в директории книг.
//! Следующим берется первый пост из списка, для которого такого файла нет.

use std::path::{Path, PathBuf};
use log::info;
use serde::{Deserialize, Deserializer, Serialize};
use crate::error::{NarratorError, Result};
use crate::text::html::clean_html;

/// Пост с сайта-источника
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Остальные поля сохраняются как есть
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Post {
    /// Числовой идентификатор для сортировки
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.trim().parse().ok()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid post id: {}", other))),
    }
}

/// Отсортировать посты по возрастанию числового id, нечисловые в конце
pub fn sort_posts(posts: &mut Vec<Post>) {
    posts.reverse();
    posts.sort_by_key(|post| {
        let id = post.numeric_id();
        (id.is_none(), id)
    });
}

/// Оставить посты, в заголовке которых есть `filter_text`, и сохранить в JSON
pub fn filter_and_save_posts<P: AsRef<Path>>(posts: &[Post], filter_text: &str, path: P) -> Result<Vec<Post>> {
    let filtered: Vec<Post> = posts
        .iter()
        .filter(|post| post.title.contains(filter_text))
        .cloned()
        .collect();

    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string_pretty(&filtered)?)?;
    info!("Saved {} of {} posts to {}", filtered.len(), posts.len(), path.display());

    Ok(filtered)
}

/// Название для итогового файла: имя файла без id-префикса
pub fn title_from_path(path: &Path) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    match stem.split_once('_') {
        Some((_, rest)) if !rest.is_empty() => rest.to_string(),
        _ => stem,
    }
}

/// Пост, ожидающий озвучивания
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPost {
    /// Файл-отметка, который появится после подтверждения
    pub path: PathBuf,
    /// Очищенный текст поста
    pub text: String,
}

/// Учет озвученных постов
#[derive(Debug, Clone)]
pub struct PostTracker {
    posts_file: PathBuf,
    books_dir: PathBuf,
}

impl PostTracker {
    pub fn new(posts_file: impl Into<PathBuf>, books_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_file: posts_file.into(),
            books_dir: books_dir.into(),
        }
    }

    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let content = std::fs::read_to_string(&self.posts_file).map_err(|e| {
            NarratorError::Source(format!("Failed to read posts file {}: {}", self.posts_file.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Путь к файлу-отметке поста
    pub fn sentinel_path(&self, post: &Post) -> PathBuf {
        self.books_dir.join(format!("{}_{}.txt", post.id, post.title.replace('/', "_")))
    }

    /// Первый еще не озвученный пост
    pub fn next_unread(&self) -> Result<Option<PendingPost>> {
        std::fs::create_dir_all(&self.books_dir)?;

        for post in self.load_posts()? {
            let path = self.sentinel_path(&post);
            if !path.exists() {
                info!("Next post to read: {}", path.display());
                return Ok(Some(PendingPost {
                    path,
                    text: clean_html(&post.content),
                }));
            }
        }

        Ok(None)
    }

    /// Отметить пост озвученным
    pub fn confirm(&self, pending: &PendingPost) -> Result<()> {
        std::fs::write(&pending.path, &pending.text)?;
        info!("Marked post as read: {}", pending.path.display());
        Ok(())
    }
}
