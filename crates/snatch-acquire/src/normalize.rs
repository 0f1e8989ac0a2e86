use unicode_normalization::UnicodeNormalization;

/// Normalize scraped text to NFC and collapse all whitespace runs.
///
/// HTML text nodes carry indentation and line breaks from the markup;
/// a scraped field should read as one clean line.
pub fn normalize_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    nfc.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize and return `None` for fields that end up empty.
pub fn non_empty(input: &str) -> Option<String> {
    let text = normalize_text(input);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_nfc() {
        let decomposed = "Shinji Ika\u{0304}ri";
        assert_eq!(normalize_text(decomposed), "Shinji Ikāri");
    }

    #[test]
    fn test_collapse_whitespace() {
        let input = "\n    People's lives\n      don't end   when they die.  ";
        assert_eq!(normalize_text(input), "People's lives don't end when they die.");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  \n\t "), None);
        assert_eq!(non_empty(" Itachi "), Some("Itachi".into()));
    }
}
