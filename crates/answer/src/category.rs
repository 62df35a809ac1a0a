//! Topic category detection.
//!
//! Maps a free-text query to exactly one category by scanning an ordered
//! list of keyword groups over the lowercased query. The first matching
//! group wins; group order is the contract, so a query naming both a crop
//! and a pest resolves to `crops`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of topic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Crops,
    Pests,
    Fertilizers,
    Schemes,
    Weather,
    General,
}

impl Category {
    /// All categories, in detection precedence order (`General` last).
    pub const ALL: [Category; 6] = [
        Category::Crops,
        Category::Pests,
        Category::Fertilizers,
        Category::Schemes,
        Category::Weather,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Crops => "crops",
            Category::Pests => "pests",
            Category::Fertilizers => "fertilizers",
            Category::Schemes => "schemes",
            Category::Weather => "weather",
            Category::General => "general",
        }
    }

    /// Parse a stored category string; unknown values come back as `None`.
    pub fn parse(value: &str) -> Option<Category> {
        match value {
            "crops" => Some(Category::Crops),
            "pests" => Some(Category::Pests),
            "fertilizers" => Some(Category::Fertilizers),
            "schemes" => Some(Category::Schemes),
            "weather" => Some(Category::Weather),
            "general" => Some(Category::General),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword groups in precedence order: crops, pests, fertilizers, schemes,
/// weather. Matching is a substring scan over the lowercased query, so the
/// lists include Hindi and Telugu script terms alongside English ones.
const KEYWORD_GROUPS: &[(Category, &[&str])] = &[
    (
        Category::Crops,
        &[
            "crop", "rice", "paddy", "wheat", "maize", "cotton", "sugarcane", "millet", "pulse",
            "vegetable", "sowing", "harvest", "seed", "transplant", "variety", "फसल", "धान",
            "गेहूं", "बुवाई", "వరి", "పంట", "విత్తనం",
        ],
    ),
    (
        Category::Pests,
        &[
            "pest", "insect", "worm", "disease", "fungus", "blight", "aphid", "borer",
            "caterpillar", "infestation", "infection", "weed", "कीट", "रोग", "పురుగు", "తెగులు",
        ],
    ),
    (
        Category::Fertilizers,
        &[
            "fertilizer", "fertiliser", "urea", "npk", "dap", "potash", "compost", "manure",
            "nutrient", "खाद", "उर्वरक", "ఎరువు",
        ],
    ),
    (
        Category::Schemes,
        &[
            "scheme", "subsidy", "loan", "insurance", "pm-kisan", "pm kisan", "kisan credit",
            "kcc", "yojana", "योजना", "सब्सिडी", "పథకం", "రుణం",
        ],
    ),
    (
        Category::Weather,
        &[
            "weather", "rainfall", "monsoon", "forecast", "temperature", "humidity", "drought",
            "climate", "frost", "hailstorm", "मौसम", "बारिश", "वर्षा", "వాతావరణం", "వర్షం",
        ],
    ),
];

/// Detect the topic category for a query.
///
/// Pure function of the query's lowercase form; always returns a value,
/// with `General` as the no-match fallback.
pub fn detect(query: &str) -> Category {
    let q = query.to_lowercase();

    for (category, keywords) in KEYWORD_GROUPS {
        if keywords.iter().any(|k| q.contains(k)) {
            return *category;
        }
    }

    Category::General
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_category() {
        assert_eq!(detect("When should I sow wheat?"), Category::Crops);
        assert_eq!(detect("aphid attack on mustard"), Category::Pests);
        assert_eq!(detect("how much urea per acre"), Category::Fertilizers);
        assert_eq!(detect("pm-kisan installment status"), Category::Schemes);
        assert_eq!(detect("will the monsoon arrive early"), Category::Weather);
        assert_eq!(detect("hello there"), Category::General);
    }

    #[test]
    fn test_precedence_crops_before_pests() {
        // Names both a crop and a pest; crops is checked first.
        assert_eq!(detect("paddy worm infection"), Category::Crops);
        assert_eq!(detect("rice crop has worm infection"), Category::Crops);
    }

    #[test]
    fn test_precedence_pests_before_fertilizers() {
        assert_eq!(detect("fungus after manure application"), Category::Pests);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detect("URGENT: WHEAT PROBLEM"), Category::Crops);
        assert_eq!(detect("Urea Price"), Category::Fertilizers);
    }

    #[test]
    fn test_deterministic() {
        for _ in 0..3 {
            assert_eq!(detect("drought relief measures"), Category::Weather);
        }
    }

    #[test]
    fn test_indic_script_keywords() {
        assert_eq!(detect("धान में पानी कब दें"), Category::Crops);
        assert_eq!(detect("ఎరువు ఎంత వేయాలి"), Category::Fertilizers);
    }

    #[test]
    fn test_parse_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("unknown"), None);
    }
}
