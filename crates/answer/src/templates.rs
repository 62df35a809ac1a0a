//! Static answer templates.
//!
//! Each category carries an introductory phrase (used when knowledge
//! snippets are available) and a hand-authored fallback answer (used when
//! the knowledge lookup comes back empty). Fallbacks are Handlebars
//! templates so the catch-all can echo the farmer's question.

use handlebars::Handlebars;
use std::collections::HashMap;

use agrihelp_core::{AppError, AppResult};

use crate::category::Category;

/// Introductory phrase preceding the snippet list.
pub fn intro(category: Category) -> &'static str {
    match category {
        Category::Crops => "Here is guidance from our crop cultivation notes:",
        Category::Pests => "Here is guidance from our pest management notes:",
        Category::Fertilizers => "Here is guidance from our fertilizer notes:",
        Category::Schemes => "Here is what our records say about government schemes:",
        Category::Weather => "Here is guidance from our weather advisories:",
        Category::General => "Here is some general guidance from our notes:",
    }
}

const CROPS_FALLBACK: &str = "For most field crops, success starts with certified seed of a variety recommended for your district and sowing inside the local window. Prepare a fine, weed-free seedbed and follow the spacing printed on the seed packet.\n\nIrrigate at the critical stages rather than on a fixed calendar: establishment, flowering and grain filling matter most. Your nearest Krishi Vigyan Kendra can share the crop calendar for your block.";

const PESTS_FALLBACK: &str = "Walk your field twice a week and look under leaves and at stem bases; catching an outbreak early is half the cure. Start with integrated measures: remove crop residues, use pheromone or light traps, and spray neem-based products first.\n\nReach for chemical pesticides only when damage crosses the economic threshold, and always rotate active ingredients so resistance does not build up.";

const FERTILIZERS_FALLBACK: &str = "Fertilize on the basis of a soil test, not a fixed recipe; most blocks offer testing at nominal cost. As a rule of thumb for cereals, give half the nitrogen at sowing and the rest in two splits at tillering and flowering, with phosphorus and potash applied as basal.\n\nWork in compost or farmyard manure every season. Organic matter cuts your urea bill and keeps the soil workable.";

const SCHEMES_FALLBACK: &str = "Several central schemes support farmers directly: PM-KISAN pays income support to land-holding families, Pradhan Mantri Fasal Bima Yojana insures crops at a small premium, and the Kisan Credit Card gives short-term loans at subsidized interest.\n\nEnrollment runs through your bank branch or the village agriculture officer; keep land records, Aadhaar and a linked bank account ready.";

const WEATHER_FALLBACK: &str = "Plan field operations around the district forecast rather than the sky overhead. Sow rainfed kharif crops only after enough cumulative rainfall has wet the profile, and keep drainage channels clear before heavy spells.\n\nFor localized advisories, the IMD Agromet service issues district bulletins twice a week; your Krishi Vigyan Kendra can register your number for them.";

const GENERAL_FALLBACK: &str = "Thanks for your question about \"{{query}}\". We do not have a specific note on this topic yet.\n\nFor region-specific guidance, visit your nearest Krishi Vigyan Kendra or call the Kisan Call Centre at 1800-180-1551; both services are free and available in your language.";

/// Render the fallback answer for a category.
///
/// Always non-empty and category-specific; the catch-all echoes the query.
pub fn fallback_answer(category: Category, query: &str) -> AppResult<String> {
    let template = match category {
        Category::Crops => CROPS_FALLBACK,
        Category::Pests => PESTS_FALLBACK,
        Category::Fertilizers => FERTILIZERS_FALLBACK,
        Category::Schemes => SCHEMES_FALLBACK,
        Category::Weather => WEATHER_FALLBACK,
        Category::General => GENERAL_FALLBACK,
    };

    let mut variables = HashMap::new();
    variables.insert("query".to_string(), query.to_string());
    variables.insert("category".to_string(), category.as_str().to_string());

    render_template(template, &variables)
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output; no HTML escaping
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("answer", template)
        .map_err(|e| AppError::Template(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("answer", &variables)
        .map_err(|e| AppError::Template(format!("Failed to render template: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_for_every_category() {
        let mut seen = std::collections::HashSet::new();
        for category in Category::ALL {
            let answer = fallback_answer(category, "test question").unwrap();
            assert!(!answer.trim().is_empty(), "empty fallback for {}", category);
            assert!(seen.insert(answer), "duplicate fallback for {}", category);
        }
    }

    #[test]
    fn test_general_fallback_echoes_query() {
        let answer = fallback_answer(Category::General, "rotating goat pasture").unwrap();
        assert!(answer.contains("rotating goat pasture"));
    }

    #[test]
    fn test_no_html_escaping() {
        let answer = fallback_answer(Category::General, "5 < 7 & so on").unwrap();
        assert!(answer.contains("5 < 7 & so on"));
    }

    #[test]
    fn test_intro_mentions_no_template_syntax() {
        for category in Category::ALL {
            assert!(!intro(category).contains("{{"));
        }
    }
}
