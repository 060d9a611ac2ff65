/// Best-effort byte-level PDF decode. There is no structural parsing here:
/// each byte maps to the Latin-1 code point of the same value, so literal
/// text runs survive alongside binary noise from streams and fonts.
pub(super) fn extract_pdf(bytes: &[u8]) -> String {
    let decoded: String = bytes
        .iter()
        .map(|&b| if b == 0 { ' ' } else { char::from(b) })
        .collect();

    decoded
        .split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Unicode whitespace plus the ASCII information separators (0x1C-0x1F),
/// which show up in stream noise and count as word breaks here too.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}
