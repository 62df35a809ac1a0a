//! Built-in knowledge snippet seed set.
//!
//! The knowledge table is read-only from the pipeline's perspective and is
//! provisioned out-of-band; this module is the out-of-band part. Applied by
//! the `seed` CLI command.

use agrihelp_core::AppResult;

use crate::store::Store;
use crate::types::NewSnippet;

fn snippet(
    category: &str,
    title: &str,
    content: &str,
    keywords: &[&str],
    language: &str,
) -> NewSnippet {
    NewSnippet {
        category: category.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        language: language.to_string(),
    }
}

/// The built-in snippet corpus. Every category has English coverage; key
/// categories also carry Hindi and Telugu rows.
pub fn builtin_snippets() -> Vec<NewSnippet> {
    vec![
        // crops
        snippet(
            "crops",
            "Paddy cultivation basics",
            "Rice grows best in well-drained clay loam with pH 5.0-6.5. Transplant 20-25 day old seedlings in June-July with 20x15 cm spacing. Maintain 5-7 cm standing water from tillering to grain filling and drain the field 10 days before harvest.",
            &["rice", "paddy", "transplanting"],
            "en",
        ),
        snippet(
            "crops",
            "Wheat sowing window",
            "Sow wheat in November-December in loamy soil of pH 6.0-7.5 using 100-125 kg seed per hectare. Irrigate at crown root initiation, tillering, flowering and grain filling. Harvest when grain moisture drops to 20-25 percent.",
            &["wheat", "sowing", "rabi"],
            "en",
        ),
        snippet(
            "crops",
            "Intercropping pulses",
            "Intercropping pigeon pea or green gram with cereals improves soil nitrogen and spreads market risk. Keep a 2:1 row ratio and choose short-duration pulse varieties so both crops mature without shading each other out.",
            &["pulses", "intercropping"],
            "en",
        ),
        snippet(
            "crops",
            "धान की रोपाई",
            "धान के लिए जून-जुलाई में 20-25 दिन की पौध की रोपाई करें। खेत में 5-7 सेमी पानी बनाए रखें और कटाई से 10 दिन पहले पानी निकाल दें।",
            &["धान", "रोपाई"],
            "hi",
        ),
        snippet(
            "crops",
            "వరి సాగు",
            "వరికి జూన్-జూలైలో 20-25 రోజుల నారు నాటాలి. పొలంలో 5-7 సెం.మీ నీరు ఉంచి, కోతకు 10 రోజుల ముందు నీటిని తీసివేయాలి.",
            &["వరి", "నారు"],
            "te",
        ),
        // pests
        snippet(
            "pests",
            "Integrated pest management",
            "Scout fields twice a week and identify pests before spraying. Start with neem-based formulations, pheromone traps and light traps; reserve chemical pesticides for economic threshold breaches. Rotate crops and remove residues to break pest cycles.",
            &["ipm", "neem", "scouting"],
            "en",
        ),
        snippet(
            "pests",
            "Stem borer in paddy",
            "Yellow stem borer causes dead hearts in vegetative stage and white ears at maturity. Clip seedling tips before transplanting, install pheromone traps at 8 per hectare and release Trichogramma egg parasitoids weekly during peak moth activity.",
            &["stem borer", "paddy", "dead heart"],
            "en",
        ),
        snippet(
            "pests",
            "कीट प्रबंधन",
            "सप्ताह में दो बार खेत की निगरानी करें। पहले नीम आधारित दवा और फेरोमोन ट्रैप अपनाएं, रासायनिक छिड़काव अंतिम विकल्प रखें।",
            &["कीट", "नीम"],
            "hi",
        ),
        // fertilizers
        snippet(
            "fertilizers",
            "Soil-test based NPK",
            "Apply fertilizer on soil-test recommendation instead of blanket doses. A common cereal split is 50 percent nitrogen at sowing, 25 percent at tillering and 25 percent at flowering, with full phosphorus and potassium as basal application.",
            &["npk", "soil test", "urea"],
            "en",
        ),
        snippet(
            "fertilizers",
            "Organic matter first",
            "Add 5-10 tonnes of farmyard manure or compost per hectare before the main season. Organic matter improves water holding and nutrient release, and reduces the urea requirement by roughly a quarter on most soils.",
            &["compost", "manure", "organic"],
            "en",
        ),
        snippet(
            "fertilizers",
            "ఎరువుల మోతాదు",
            "భూసార పరీక్ష ఆధారంగా ఎరువులు వాడాలి. నత్రజనిని మూడు విడతలుగా వేయాలి: విత్తే సమయంలో సగం, పిలక దశలో పావు, పూత దశలో పావు.",
            &["ఎరువు", "నత్రజని"],
            "te",
        ),
        // schemes
        snippet(
            "schemes",
            "PM-KISAN income support",
            "PM-KISAN transfers Rs 6,000 per year to land-holding farmer families in three equal installments. Enroll through the village agriculture officer or the PM-KISAN portal with land records, Aadhaar and a linked bank account.",
            &["pm-kisan", "subsidy", "installment"],
            "en",
        ),
        snippet(
            "schemes",
            "Crop insurance under PMFBY",
            "Pradhan Mantri Fasal Bima Yojana covers yield loss from drought, flood, pests and hailstorm. Premium is capped at 2 percent for kharif and 1.5 percent for rabi crops; report localized damage within 72 hours to the insurer or bank branch.",
            &["insurance", "pmfby", "premium"],
            "en",
        ),
        snippet(
            "schemes",
            "Kisan Credit Card",
            "The Kisan Credit Card gives short-term crop loans up to Rs 3 lakh at subsidized interest, with prompt-repayment incentive bringing the effective rate to 4 percent. Apply at any scheduled bank with land documents and identity proof.",
            &["kcc", "loan", "credit"],
            "en",
        ),
        // weather
        snippet(
            "weather",
            "Monsoon sowing decisions",
            "Wait for 60-75 mm of cumulative rainfall before dry-seeding kharif crops. If monsoon onset is delayed beyond two weeks, switch to short-duration varieties or contingency crops like pearl millet recommended for your district.",
            &["monsoon", "rainfall", "kharif"],
            "en",
        ),
        snippet(
            "weather",
            "Frost protection",
            "On frost-forecast nights, irrigate fields lightly in the evening and create smoke barriers upwind at dawn. Young orchards benefit from trunk wrapping and soil mulch that slows heat loss from the ground.",
            &["frost", "rabi", "irrigation"],
            "en",
        ),
        // general
        snippet(
            "general",
            "Know your Krishi Vigyan Kendra",
            "Every district has a Krishi Vigyan Kendra that runs soil testing, demonstrations and advisory services free or at nominal cost. Register your mobile number there to receive season-specific advisories in your language.",
            &["kvk", "advisory"],
            "en",
        ),
        snippet(
            "general",
            "Farm record keeping",
            "Maintain a simple notebook of input costs, operations and yields per plot. Three seasons of records are usually enough to spot which crop, variety and input mix actually pays on your soil.",
            &["records", "planning"],
            "en",
        ),
    ]
}

/// Seed the knowledge table with the built-in corpus.
///
/// Skips seeding when snippets already exist unless `force` is set; returns
/// the number of snippets written.
pub async fn apply(store: &dyn Store, force: bool) -> AppResult<u64> {
    let existing = store.knowledge_count().await?;
    if existing > 0 && !force {
        tracing::info!(
            "Knowledge table already has {} snippets; skipping seed",
            existing
        );
        return Ok(0);
    }

    let snippets = builtin_snippets();
    let mut written = 0u64;

    for snippet in &snippets {
        store.knowledge_insert(snippet).await?;
        written += 1;
    }

    tracing::info!("Seeded {} knowledge snippets", written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::SqliteStore;

    #[test]
    fn test_every_category_has_english_coverage() {
        let snippets = builtin_snippets();
        for category in ["crops", "pests", "fertilizers", "schemes", "weather", "general"] {
            assert!(
                snippets
                    .iter()
                    .any(|s| s.category == category && s.language == "en"),
                "missing English seed for category {}",
                category
            );
        }
    }

    #[tokio::test]
    async fn test_apply_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();

        let first = apply(&store, false).await.unwrap();
        assert_eq!(first, builtin_snippets().len() as u64);

        let second = apply(&store, false).await.unwrap();
        assert_eq!(second, 0);
        assert_eq!(store.knowledge_count().await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_force_reseeds() {
        let store = SqliteStore::open_in_memory().unwrap();
        apply(&store, false).await.unwrap();

        let reseeded = apply(&store, true).await.unwrap();
        assert_eq!(reseeded, builtin_snippets().len() as u64);
    }
}
