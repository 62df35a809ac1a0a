//! Query normalization and language detection.
//!
//! Detection scans for Indic Unicode script ranges and common
//! transliterated words. Two or more scripts in one query, or
//! transliterated Indian-language words mixed with Latin text, classify
//! the query as "mixed" (code-mixing is common in practice).

/// Normalize a query for cache keys and search: trim, then lowercase.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Resolve the effective language for a request.
///
/// `"auto"` runs detection on the query; `"mixed"` is honored as-is; any
/// other value is taken as the caller's explicit choice.
pub fn resolve_language(requested: &str, query: &str) -> String {
    match requested {
        "auto" => detect_language(query).to_string(),
        other => other.to_string(),
    }
}

struct ScriptRange {
    code: &'static str,
    start: char,
    end: char,
}

// One range per script; Devanagari covers Hindi and Marathi, Bengali
// covers Assamese. First match decides the single-script code.
const SCRIPTS: &[ScriptRange] = &[
    ScriptRange { code: "hi", start: '\u{0900}', end: '\u{097F}' },
    ScriptRange { code: "te", start: '\u{0C00}', end: '\u{0C7F}' },
    ScriptRange { code: "ta", start: '\u{0B80}', end: '\u{0BFF}' },
    ScriptRange { code: "bn", start: '\u{0980}', end: '\u{09FF}' },
    ScriptRange { code: "gu", start: '\u{0A80}', end: '\u{0AFF}' },
    ScriptRange { code: "kn", start: '\u{0C80}', end: '\u{0CFF}' },
    ScriptRange { code: "ml", start: '\u{0D00}', end: '\u{0D7F}' },
    ScriptRange { code: "or", start: '\u{0B00}', end: '\u{0B7F}' },
    ScriptRange { code: "pa", start: '\u{0A00}', end: '\u{0A7F}' },
];

const TELUGU_TRANSLIT: &[&str] = &["ela", "cheyam", "undhi", "ledhu", "avuthundi", "cheppu", "ivvandi"];
const HINDI_TRANSLIT: &[&str] = &["kaise", "kya", "kyun", "hai", "ho", "kar", "karne", "ke", "ki"];
const TAMIL_TRANSLIT: &[&str] = &["elaam", "irukku", "pannu", "pannalam", "venum", "illai"];

/// Detect the language of input text.
///
/// Returns a language code, "mixed" for multi-script or transliterated
/// code-mixed input, or "en" as the default.
pub fn detect_language(text: &str) -> &'static str {
    let mut found: Vec<&'static str> = Vec::new();

    for script in SCRIPTS {
        if text.chars().any(|c| c >= script.start && c <= script.end) {
            found.push(script.code);
        }
    }

    let has_latin = text.chars().any(|c| c.is_ascii_alphabetic());
    let script_count = found.len() + usize::from(has_latin);

    if script_count >= 2 {
        return "mixed";
    }

    // Transliterated Indian-language words written in Latin script
    if has_latin && has_transliterated_words(text) {
        return "mixed";
    }

    found.first().copied().unwrap_or("en")
}

/// Check for whole-word transliteration matches.
fn has_transliterated_words(text: &str) -> bool {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .collect();

    [TELUGU_TRANSLIT, HINDI_TRANSLIT, TAMIL_TRANSLIT]
        .iter()
        .any(|list| words.iter().any(|w| list.contains(w)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  How to grow RICE?  "), "how to grow rice?");
        assert_eq!(normalize_query("how to grow rice?"), "how to grow rice?");
    }

    #[test]
    fn test_detect_single_scripts() {
        assert_eq!(detect_language("धान कब बोएं"), "hi");
        assert_eq!(detect_language("వరి ఎలా పండించాలి"), "te");
        assert_eq!(detect_language("நெல் சாகுபடி"), "ta");
        assert_eq!(detect_language("How to grow rice?"), "en");
    }

    #[test]
    fn test_detect_mixed_scripts() {
        assert_eq!(detect_language("rice में पानी कितना?"), "mixed");
        assert_eq!(detect_language("వరి and wheat"), "mixed");
    }

    #[test]
    fn test_detect_transliterated_mix() {
        assert_eq!(detect_language("pests ela control cheyam"), "mixed");
        assert_eq!(detect_language("fertilizer kaise dalein"), "mixed");
    }

    #[test]
    fn test_transliteration_needs_whole_words() {
        // "elaborate" contains "ela" but is plain English
        assert_eq!(detect_language("please elaborate on wheat"), "en");
    }

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language("en", "whatever"), "en");
        assert_eq!(resolve_language("mixed", "whatever"), "mixed");
        assert_eq!(resolve_language("auto", "धान कब बोएं"), "hi");
        assert_eq!(resolve_language("auto", "How to grow rice?"), "en");
    }
}
