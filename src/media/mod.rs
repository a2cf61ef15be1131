//! Модуль для работы с медиафайлами

pub mod audio;
