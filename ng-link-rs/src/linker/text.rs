//! Text utilities for bundle sources.
//!
//! Provides helper functions applied to bundle text before it reaches the
//! parser, including BOM stripping and specifier classification.

/// Strips the UTF-8 BOM (byte order mark) from the beginning of text if present.
///
/// The BOM is U+FEFF (0xEF 0xBB 0xBF in UTF-8) and is sometimes present at the
/// start of files.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{FEFF}').unwrap_or(text)
}

/// Whether a module specifier is relative (`./x`, `../x`, `.` or `..`).
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bom_with_bom() {
        let with_bom = "\u{FEFF}hello";
        assert_eq!(strip_bom(with_bom), "hello");
    }

    #[test]
    fn test_strip_bom_without_bom() {
        let without_bom = "hello";
        assert_eq!(strip_bom(without_bom), "hello");
    }

    #[test]
    fn test_is_relative_specifier() {
        assert!(is_relative_specifier("./util"));
        assert!(is_relative_specifier("../shared/util.mjs"));
        assert!(!is_relative_specifier("@angular/core"));
        assert!(!is_relative_specifier("rxjs/operators"));
        assert!(!is_relative_specifier("/abs/path.mjs"));
    }
}
