use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// C0 controls except tab, newline and carriage return
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F]").unwrap();
    static ref WIDE_GAPS: Regex = Regex::new(r"[ \t]{3,}").unwrap();
}

/// Clean extracted document text before it is redacted or prompted.
///
/// Control characters become spaces so the words on either side stay
/// separate, runs of three or more spaces/tabs shrink to two, line endings
/// are normalised to `\n` and the result is trimmed.
pub fn sanitize_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let spaced = CONTROL_CHARS.replace_all(&normalized, " ");
    WIDE_GAPS.replace_all(&spaced, "  ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redact;

    #[test]
    fn test_normalizes_line_endings() {
        assert_eq!(sanitize_text("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_control_characters_become_spaces() {
        assert_eq!(sanitize_text("loan\u{0}amount\tA$1m"), "loan amount\tA$1m");
    }

    #[test]
    fn test_collapses_wide_gaps_and_trims() {
        assert_eq!(sanitize_text("  term \t\t 12 months   \n"), "term  12 months");
        assert_eq!(sanitize_text("a  b"), "a  b");
    }

    #[test]
    fn test_name_split_by_control_chars_is_still_masked() {
        let cleaned = sanitize_text("Guarantor: Jane\x0cCitizen\x00Smith   end  ");
        assert_eq!(cleaned, "Guarantor: Jane Citizen Smith  end");
        assert_eq!(redact(&cleaned), "Guarantor: [REDACTED_NAME]  end");
    }

    #[test]
    fn test_keeps_unicode_text() {
        assert_eq!(sanitize_text("Zürich, €2.5m"), "Zürich, €2.5m");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize_text(""), "");
    }
}
