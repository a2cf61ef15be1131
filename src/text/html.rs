//! Очистка HTML разметки постов до простого текста

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BR_TAG: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
    static ref BLOCK_END: Regex = Regex::new(r"(?i)</(p|div|ul|ol|li|h[1-6])\s*>").unwrap();
    static ref ANY_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Превратить HTML поста в текст с абзацами, разделенными пустой строкой
pub fn clean_html(html_content: &str) -> String {
    let text = BR_TAG.replace_all(html_content, "\n\n");
    let text = BLOCK_END.replace_all(&text, "$0\n\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = decode_entities(&text);

    text.trim().to_string()
}

fn decode_entities(text: &str) -> String {
    // Неразрывные пробелы синтезатору не нужны
    html_escape::decode_html_entities(text).replace('\u{a0}', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_become_blank_line_separated() {
        let html = "<p>First line.</p><p>\"Hi,\" she said.</p>";
        assert_eq!(clean_html(html), "First line.\n\n\"Hi,\" she said.");
    }

    #[test]
    fn test_br_and_inline_tags() {
        let html = "One<br>Two<br/><strong>Three</strong>";
        assert_eq!(clean_html(html), "One\n\nTwo\n\nThree");
    }

    #[test]
    fn test_entities_decoded() {
        let html = "<p>&quot;Tom &amp; Jerry&quot; &#8212; &lt;b&gt;&#x41;</p>";
        assert_eq!(clean_html(html), "\"Tom & Jerry\" \u{2014} <b>A");
    }

    #[test]
    fn test_named_entities_decoded() {
        let html = "<p>It&rsquo;s late&hellip; &mdash; she said&nbsp;softly</p>";
        assert_eq!(clean_html(html), "It\u{2019}s late\u{2026} \u{2014} she said softly");
    }

    #[test]
    fn test_escaped_entity_decoded_once() {
        assert_eq!(clean_html("&amp;lt;tag&amp;gt;"), "&lt;tag&gt;");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(clean_html("  just text  "), "just text");
    }
}
