//! Prompt construction for the budget and suggestion calls
//!
//! The model does all the estimation; these builders spell out exactly what
//! we want back (categories, housing semantics, currency, language, frugal
//! bottom prices, the JSON shape) so the ingestion side has a fighting
//! chance of parsing the answer.

use crate::budget::HousingMode;
use crate::corrections::{render_prompt_addendum, UserCorrection};
use crate::locale::{CurrencyOption, LanguageOption};
use crate::suggest::{GeoPoint, SearchFilters};

/// Documented response shape the model is asked to produce for a budget.
const BUDGET_JSON_SHAPE: &str = r#"{
  "city": "resolved city name",
  "currency": "ISO code",
  "currencySymbol": "symbol",
  "totalMonthly": 0,
  "summary": "2-3 sentence overview of living cheaply in this city",
  "items": [
    {
      "category": "category id",
      "amount": 0,
      "description": "what this covers and where to get it cheapest",
      "explanation": "how the number was derived",
      "subItems": [{"name": "line item", "amount": 0}]
    }
  ],
  "savingTips": [{"category": "category id", "tip": "hyper-local advice", "icon": "emoji"}],
  "coordinates": {"lat": 0.0, "lng": 0.0},
  "sourceSnippets": {"source title": "one-line snippet of what that source showed"}
}"#;

/// Build the directive for a grounded budget estimate.
pub fn build_budget_prompt(
    city: &str,
    categories: &[String],
    currency: &CurrencyOption,
    language: &LanguageOption,
    housing: HousingMode,
    corrections: &[UserCorrection],
) -> String {
    let housing_clause = match housing {
        HousingMode::Shared => {
            "For housing, price a single room in a shared flat or house, not a whole unit."
        }
        HousingMode::Whole => {
            "For housing, price renting an entire modest house or apartment, not a room."
        }
    };

    let mut prompt = format!(
        "You are a frugal-living researcher. Estimate the MINIMUM realistic monthly \
         cost of living in {city} for the following budget categories only: {categories}.\n\
         {housing_clause}\n\
         Price everything in {currency_code} ({currency_label}) and write every piece of \
         text in {language_name}.\n\
         Do not use city-wide averages: use the bottom of the real market, the prices a \
         determined local bargain-hunter actually pays (cheapest markets, local \
         neighborhoods, student deals).\n\
         totalMonthly must equal the sum of the item amounts.\n\
         Include 3-4 hyper-local saving tips specific to {city}.\n\
         Include the city's coordinates.\n",
        city = city,
        categories = categories.join(", "),
        housing_clause = housing_clause,
        currency_code = currency.code,
        currency_label = currency.label,
        language_name = language.name,
    );

    prompt.push_str(&render_prompt_addendum(corrections));

    prompt.push_str(
        "\nRespond with a single JSON object of exactly this shape, and nothing else:\n",
    );
    prompt.push_str(BUDGET_JSON_SHAPE);
    prompt
}

/// Build the instruction for city-name suggestions.
pub fn build_suggestion_prompt(
    input: &str,
    filters: &SearchFilters,
    language: &LanguageOption,
    location: Option<GeoPoint>,
) -> String {
    let mut prompt = format!(
        "Suggest up to 5 real city names matching the partial input \"{}\".",
        input
    );
    if let Some(country) = filters.country.as_deref().filter(|c| !c.is_empty()) {
        prompt.push_str(&format!(" Only cities in {}.", country));
    }
    if let Some(region) = filters.region.as_deref().filter(|r| !r.is_empty()) {
        prompt.push_str(&format!(" Only cities in the {} region.", region));
    }
    if let Some(descriptor) = filters.population.descriptor() {
        prompt.push_str(&format!(" Prefer {}.", descriptor));
    }
    if let Some(point) = location {
        prompt.push_str(&format!(
            " Prefer cities near latitude {:.4}, longitude {:.4}.",
            point.lat, point.lng
        ));
    }
    prompt.push_str(&format!(
        " Write the names in {}. Return a strict JSON array of strings, nothing else.",
        language.name
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{currency_for, language_for};
    use crate::suggest::PopulationBucket;

    #[test]
    fn test_budget_prompt_names_the_essentials() {
        let categories = vec!["housing".to_string(), "groceries".to_string()];
        let prompt = build_budget_prompt(
            "Lisbon",
            &categories,
            currency_for("EUR"),
            language_for("pt"),
            HousingMode::Shared,
            &[],
        );
        assert!(prompt.contains("Lisbon"));
        assert!(prompt.contains("housing, groceries"));
        assert!(prompt.contains("EUR"));
        assert!(prompt.contains("Português"));
        assert!(prompt.contains("shared flat"));
        assert!(prompt.contains("totalMonthly"));
        assert!(prompt.contains("sourceSnippets"));
        // No corrections means no correction section
        assert!(!prompt.contains("previously reported"));
    }

    #[test]
    fn test_budget_prompt_housing_modes_differ() {
        let categories = vec!["housing".to_string()];
        let shared = build_budget_prompt(
            "Porto", &categories, currency_for("EUR"), language_for("en"),
            HousingMode::Shared, &[],
        );
        let whole = build_budget_prompt(
            "Porto", &categories, currency_for("EUR"), language_for("en"),
            HousingMode::Whole, &[],
        );
        assert!(shared.contains("shared flat"));
        assert!(whole.contains("entire modest house"));
    }

    #[test]
    fn test_budget_prompt_embeds_corrections() {
        let corrections = vec![UserCorrection::new(
            Some("Lisbon".to_string()),
            "groceries",
            "en",
            "supermarket prices outdated",
        )];
        let prompt = build_budget_prompt(
            "Lisbon",
            &["groceries".to_string()],
            currency_for("EUR"),
            language_for("en"),
            HousingMode::Shared,
            &corrections,
        );
        assert!(prompt.contains("supermarket prices outdated"));
        assert!(prompt.contains("Prioritize accuracy"));
    }

    #[test]
    fn test_suggestion_prompt_includes_filters_and_location() {
        let filters = SearchFilters {
            country: Some("Portugal".to_string()),
            region: Some("Alentejo".to_string()),
            population: PopulationBucket::Small,
        };
        let prompt = build_suggestion_prompt(
            "evo",
            &filters,
            language_for("en"),
            Some(GeoPoint { lat: 38.5667, lng: -7.9 }),
        );
        assert!(prompt.contains("\"evo\""));
        assert!(prompt.contains("Portugal"));
        assert!(prompt.contains("Alentejo"));
        assert!(prompt.contains("smaller towns"));
        assert!(prompt.contains("38.5667"));
        assert!(prompt.contains("JSON array of strings"));
    }

    #[test]
    fn test_suggestion_prompt_skips_empty_filters() {
        let prompt = build_suggestion_prompt(
            "lis",
            &SearchFilters::default(),
            language_for("en"),
            None,
        );
        assert!(!prompt.contains("Only cities"));
        assert!(!prompt.contains("Prefer"));
    }
}
