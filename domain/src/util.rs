//! Shared utility functions.

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
/// character.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line preview of a possibly long text: whitespace runs collapse to
/// one space and the result is cut at `max_bytes` with a trailing `…`.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() <= max_bytes {
        return flat;
    }
    format!("{}…", truncate_str(&flat, max_bytes).trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("Tenant shall pay", 6), "Tenant");
    }

    #[test]
    fn truncate_no_op_when_short() {
        assert_eq!(truncate_str("rent", 10), "rent");
    }

    #[test]
    fn truncate_devanagari_boundary() {
        // each Devanagari code point here is 3 bytes
        let s = "किराया";
        assert_eq!(truncate_str(s, 4), "क");
        assert_eq!(truncate_str(s, 6), "कि");
    }

    #[test]
    fn preview_collapses_whitespace() {
        assert_eq!(preview("RENTAL\n\n  AGREEMENT", 50), "RENTAL AGREEMENT");
    }

    #[test]
    fn preview_cuts_long_text() {
        assert_eq!(preview("The Tenant shall pay", 10), "The Tenant…");
    }
}
