/// Decode bytes as UTF-8, dropping invalid sequences, and lowercase.
pub(super) fn extract_txt(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_simple_text() {
        let content = b"Hello, world!\nThis is a test file.";
        assert_eq!(extract_txt(content), "hello, world!\nthis is a test file.");
    }

    #[test]
    fn extract_utf8_text() {
        let content = "Ünïcödé Text".as_bytes();
        assert_eq!(extract_txt(content), "ünïcödé text");
    }

    #[test]
    fn invalid_sequences_are_dropped() {
        let content = b"abc\xff\xfedef";
        assert_eq!(extract_txt(content), "abcdef");
    }

    #[test]
    fn literal_replacement_character_is_kept() {
        assert_eq!(extract_txt("a\u{FFFD}b".as_bytes()), "a\u{FFFD}b");
    }

    #[test]
    fn whitespace_is_preserved() {
        // Only the PDF path collapses whitespace.
        assert_eq!(extract_txt(b"  A\n\nB  "), "  a\n\nb  ");
    }
}
