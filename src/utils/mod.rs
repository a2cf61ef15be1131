//! Вспомогательные утилиты

pub mod ffmpeg;
