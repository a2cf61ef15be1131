//! Модуль обработки текста
//!
//! Сегментация на директивы, повествование и реплики, разбиение на блоки
//! для одного голоса и очистка HTML.

pub mod chunker;
pub mod html;
pub mod segment;
pub mod segmenter;

pub use chunker::chunk_text;
pub use html::clean_html;
pub use segment::{Gender, Segment, SegmentKind};
pub use segmenter::TextSegmenter;
