//! Разбиение текста на крупные блоки для озвучивания одним голосом

/// Собрать абзацы в блоки длиной не более `max_length` символов.
///
/// Квадратные скобки директив удаляются, каждый абзац завершается пустой строкой.
/// Абзац длиннее лимита становится отдельным блоком.
pub fn chunk_text(input_text: &str, max_length: usize) -> Vec<String> {
    let cleaned_text = input_text.replace("\r\n", "\n").replace(['[', ']'], "");
    let mut chunks = Vec::new();
    let mut current_chunk = String::new();
    let mut current_len = 0;

    for paragraph in cleaned_text.split("\n\n") {
        let paragraph = format!("{}\n\n", paragraph);
        let paragraph_len = paragraph.chars().count();

        if current_len + paragraph_len <= max_length {
            current_chunk.push_str(&paragraph);
            current_len += paragraph_len;
        } else {
            if !current_chunk.trim().is_empty() {
                chunks.push(std::mem::take(&mut current_chunk));
            }
            current_chunk = paragraph;
            current_len = paragraph_len;
        }
    }

    if !current_chunk.trim().is_empty() {
        chunks.push(current_chunk);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packs_paragraphs_up_to_limit() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        // Каждый абзац с разделителем занимает 6 символов
        let chunks = chunk_text(text, 12);
        assert_eq!(chunks, vec!["aaaa\n\nbbbb\n\n".to_string(), "cccc\n\n".to_string()]);
    }

    #[test]
    fn test_brackets_removed() {
        let chunks = chunk_text("[Note]\n\nText", 100);
        assert_eq!(chunks, vec!["Note\n\nText\n\n".to_string()]);
    }

    #[test]
    fn test_oversized_paragraph_is_own_chunk() {
        let long = "x".repeat(20);
        let text = format!("short\n\n{}\n\nend", long);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1], format!("{}\n\n", long));
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        assert!(chunk_text("", 4096).is_empty());
        assert!(chunk_text("\n\n\n\n", 4096).is_empty());
    }

    #[test]
    fn test_limit_counts_characters() {
        let chunks = chunk_text("привет\n\nмир", 14);
        assert_eq!(chunks.len(), 1);
    }
}
