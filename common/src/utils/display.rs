//! Terminal-safe rendering of server-provided text.

/// Escapes every non-ASCII character so the text renders on any terminal.
///
/// ASCII passes through unchanged; anything else becomes `\u{...}`.
pub fn encode_for_display(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    text.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_string()
            } else {
                c.escape_unicode().to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_unchanged() {
        assert_eq!(encode_for_display("Sales Dashboard"), "Sales Dashboard");
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        assert_eq!(encode_for_display("Café"), "Caf\\u{e9}");
    }
}
