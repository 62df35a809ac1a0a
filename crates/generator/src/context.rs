//! Prompt context assembly: Indian season calendar, location context, and
//! per-language response instructions.

use chrono::{Datelike, Local};

use crate::client::GenerateRequest;

/// Indian season for a calendar month: Kharif (monsoon), Rabi (winter),
/// Zaid (summer).
pub fn season_for_month(month: u32) -> &'static str {
    match month {
        6..=10 => "Kharif (monsoon)",
        11 | 12 | 1..=3 => "Rabi (winter)",
        _ => "Zaid (summer)",
    }
}

/// Indian season right now.
pub fn current_season() -> &'static str {
    season_for_month(Local::now().month())
}

/// Build the context string injected into the system prompt.
pub fn build_context(
    region: Option<&str>,
    season: Option<&str>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> String {
    let mut parts = Vec::new();

    if let Some(region) = region {
        parts.push(format!("Region: {}", region));
    }

    let season = season.unwrap_or_else(|| current_season());
    parts.push(format!("Current season in India: {}", season));

    if let (Some(lat), Some(lon)) = (lat, lon) {
        parts.push(format!("Approximate location: {:.2}, {:.2}", lat, lon));
    }

    parts.join(". ")
}

/// Response-language instruction for the system prompt.
fn language_instruction(language: &str) -> &'static str {
    match language {
        "hi" => "Respond in Hindi (हिंदी).",
        "te" => "Respond in Telugu (తెలుగు).",
        "ta" => "Respond in Tamil (தமிழ்).",
        "bn" => "Respond in Bengali (বাংলা).",
        "mr" => "Respond in Marathi (मराठी).",
        "gu" => "Respond in Gujarati (ગુજરાતી).",
        "kn" => "Respond in Kannada (ಕನ್ನಡ).",
        "ml" => "Respond in Malayalam (മലയാളം).",
        "or" => "Respond in Odia (ଓଡ଼ିଆ).",
        "pa" => "Respond in Punjabi (ਪੰਜਾਬੀ).",
        "as" => "Respond in Assamese (অসমীয়া).",
        "ur" => "Respond in Urdu (اردو).",
        _ => "Respond in English.",
    }
}

/// Assemble the full system prompt for a generation request.
///
/// Code-mixed queries get an explicit instruction to answer in the same
/// language mix instead of a single-language instruction.
pub fn system_prompt(request: &GenerateRequest) -> String {
    let context = build_context(
        request.region.as_deref(),
        request.season.as_deref(),
        request.lat,
        request.lon,
    );

    if request.language == "mixed" {
        format!(
            "You are AgriHelp, an agricultural assistant for Indian farmers. \
             The user is asking in MIXED LANGUAGE (e.g., Telugu/Hindi + English code-mixing). \
             IMPORTANT: Respond in the SAME language mix as the user's question and keep \
             the same code-mixing style. \
             Context: {} \
             Give concise, practical agricultural advice.",
            context
        )
    } else {
        format!(
            "You are AgriHelp, an agricultural assistant for Indian farmers. {} \
             Context: {} \
             Give concise, practical agricultural advice.",
            language_instruction(&request.language),
            context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_calendar() {
        assert_eq!(season_for_month(7), "Kharif (monsoon)");
        assert_eq!(season_for_month(12), "Rabi (winter)");
        assert_eq!(season_for_month(2), "Rabi (winter)");
        assert_eq!(season_for_month(4), "Zaid (summer)");
    }

    #[test]
    fn test_build_context_with_all_fields() {
        let context = build_context(Some("Punjab"), Some("rabi"), Some(30.9), Some(75.85));
        assert!(context.contains("Region: Punjab"));
        assert!(context.contains("Current season in India: rabi"));
        assert!(context.contains("Approximate location: 30.90, 75.85"));
    }

    #[test]
    fn test_build_context_defaults_season() {
        let context = build_context(None, None, None, None);
        assert!(context.contains("Current season in India:"));
    }

    #[test]
    fn test_system_prompt_language_instruction() {
        let request = GenerateRequest::new("धान कब बोएं", "hi");
        let prompt = system_prompt(&request);
        assert!(prompt.contains("Respond in Hindi"));
    }

    #[test]
    fn test_system_prompt_mixed() {
        let request = GenerateRequest::new("pests ela control cheyam", "mixed");
        let prompt = system_prompt(&request);
        assert!(prompt.contains("SAME language mix"));
    }
}
