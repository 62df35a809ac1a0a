//! Answer synthesis.
//!
//! Produces the final answer text for a query given its category and any
//! snippets found. Deterministic: identical inputs yield identical output,
//! with no model dependency.

use agrihelp_store::KnowledgeSnippet;

use agrihelp_core::AppResult;

use crate::category::Category;
use crate::templates;

/// Maximum number of snippets rendered into one answer.
pub const MAX_SNIPPETS_IN_ANSWER: usize = 3;

/// Characters of snippet body included per entry.
pub const SNIPPET_EXCERPT_CHARS: usize = 200;

/// Compose an answer from retrieved snippets, or fall back to the static
/// category template when none were found.
pub fn synthesize(
    category: Category,
    query: &str,
    snippets: &[KnowledgeSnippet],
) -> AppResult<String> {
    if snippets.is_empty() {
        return templates::fallback_answer(category, query);
    }

    let mut answer = String::from(templates::intro(category));
    answer.push_str("\n\n");

    for (i, snippet) in snippets.iter().take(MAX_SNIPPETS_IN_ANSWER).enumerate() {
        // char-wise truncation: snippet bodies carry Indic scripts
        let excerpt: String = snippet.content.chars().take(SNIPPET_EXCERPT_CHARS).collect();
        answer.push_str(&format!("{}. {}: {}...\n", i + 1, snippet.title, excerpt));
    }

    Ok(answer.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snippet(title: &str, content: &str) -> KnowledgeSnippet {
        KnowledgeSnippet {
            id: 1,
            category: "crops".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            keywords: Vec::new(),
            language: "en".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fallback_when_no_snippets() {
        let answer = synthesize(Category::Pests, "leaf curl", &[]).unwrap();
        assert!(answer.contains("pest"));
        assert!(!answer.contains("1."));
    }

    #[test]
    fn test_snippets_rendered_with_ordinals() {
        let snippets = vec![
            snippet("Paddy basics", "Transplant in June."),
            snippet("Water management", "Keep 5 cm standing water."),
        ];

        let answer = synthesize(Category::Crops, "rice", &snippets).unwrap();
        assert!(answer.starts_with(templates::intro(Category::Crops)));
        assert!(answer.contains("1. Paddy basics: Transplant in June...."));
        assert!(answer.contains("2. Water management: Keep 5 cm standing water...."));
    }

    #[test]
    fn test_at_most_three_snippets() {
        let snippets: Vec<_> = (0..5)
            .map(|i| snippet(&format!("Note {}", i), "body"))
            .collect();

        let answer = synthesize(Category::Crops, "rice", &snippets).unwrap();
        assert!(answer.contains("3. Note 2"));
        assert!(!answer.contains("4. Note 3"));
    }

    #[test]
    fn test_long_body_truncated_at_200_chars() {
        let long_body = "x".repeat(500);
        let snippets = vec![snippet("Long note", &long_body)];

        let answer = synthesize(Category::Crops, "rice", &snippets).unwrap();
        let rendered = format!("1. Long note: {}...", "x".repeat(200));
        assert!(answer.contains(&rendered));
        assert!(!answer.contains(&"x".repeat(201)));
    }

    #[test]
    fn test_truncation_is_char_safe_for_indic_text() {
        let body = "धान ".repeat(120); // 480 chars, multi-byte
        let snippets = vec![snippet("धान नोट", &body)];

        let answer = synthesize(Category::Crops, "धान", &snippets).unwrap();
        assert!(answer.contains("धान नोट"));
    }

    #[test]
    fn test_deterministic() {
        let snippets = vec![snippet("A", "alpha"), snippet("B", "beta")];
        let first = synthesize(Category::Weather, "rain", &snippets).unwrap();
        let second = synthesize(Category::Weather, "rain", &snippets).unwrap();
        assert_eq!(first, second);
    }
}
