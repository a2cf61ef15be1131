//! Разбиение текста на сегменты
//!
//! Текст делится на абзацы по пустой строке. Абзац в квадратных скобках
//! становится директивой, в остальных абзацах текст в двойных кавычках
//! становится репликами, все остальное - повествованием.

use log::{debug, info};
use crate::error::Result;
use crate::speaker::SpeakerAttribution;
use crate::text::segment::Segment;

/// Кусок абзаца до определения говорящих
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    Narration(&'a str),
    Quote(&'a str),
}

/// Сегментатор текста
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSegmenter;

impl TextSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Разбить текст на упорядоченные сегменты.
    ///
    /// Для каждой реплики вызывается `resolver` с полным абзацем в качестве контекста.
    /// Порядок сегментов совпадает с порядком чтения.
    pub async fn segment<A>(&self, text: &str, resolver: &mut A) -> Result<Vec<Segment>>
    where
        A: SpeakerAttribution + ?Sized,
    {
        let text = text.replace("\r\n", "\n");
        let paragraphs = split_paragraphs(&text);
        info!("Split text into {} paragraphs", paragraphs.len());

        let mut segments = Vec::new();
        for paragraph in paragraphs {
            if let Some(directive) = directive_text(paragraph) {
                debug!("Found system message of length {}", directive.len());
                if !directive.trim().is_empty() {
                    segments.push(Segment::system(directive));
                }
                continue;
            }

            let pieces = split_quotes(paragraph);
            let quotes = pieces.iter().filter(|p| matches!(p, Piece::Quote(_))).count();
            info!("Found {} quotes in paragraph of length {}", quotes, paragraph.len());

            for piece in pieces {
                match piece {
                    Piece::Narration(text) => segments.push(Segment::narrator(text)),
                    Piece::Quote(quote) => {
                        let resolution = resolver.resolve(paragraph, quote).await?;
                        segments.push(Segment::quote(quote, resolution.speaker, resolution.gender));
                    }
                }
            }
        }

        Ok(segments)
    }
}

/// Абзацы текста, разделенные пустой строкой. Пустые абзацы отбрасываются.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n").filter(|p| !p.trim().is_empty()).collect()
}

/// Текст директивы, если абзац обернут в квадратные скобки
pub fn directive_text(paragraph: &str) -> Option<&str> {
    let trimmed = paragraph.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
        Some(&trimmed[1..trimmed.len() - 1])
    } else {
        None
    }
}

/// Разрезать абзац на повествование и реплики.
///
/// Курсор идет слева направо, каждая пара `"` образует реплику; кавычки
/// в сегменты не попадают. Незакрытая кавычка остается в повествовании.
/// Пустые и пробельные куски пропускаются.
pub fn split_quotes(paragraph: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut cursor = 0;

    while let Some(open_offset) = paragraph[cursor..].find('"') {
        let open = cursor + open_offset;
        let Some(close_offset) = paragraph[open + 1..].find('"') else {
            break;
        };
        let close = open + 1 + close_offset;

        let before = &paragraph[cursor..open];
        if !before.trim().is_empty() {
            pieces.push(Piece::Narration(before));
        }

        let quote = &paragraph[open + 1..close];
        if !quote.trim().is_empty() {
            pieces.push(Piece::Quote(quote));
        }

        cursor = close + 1;
    }

    let rest = &paragraph[cursor..];
    if !rest.trim().is_empty() {
        pieces.push(Piece::Narration(rest));
    }

    pieces
}
