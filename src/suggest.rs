//! City-name suggestion client
//!
//! Best-effort autocompletion: given partial input, optional filters, and an
//! optional location hint, ask the model for up to 5 candidate city names in
//! the active display language. This path never fails; any error is logged
//! and degrades to an empty list so it can never block the main search.

use crate::gemini::GeminiClient;
use crate::locale::language_for;
use crate::prompt::build_suggestion_prompt;

/// Suggestions returned per query.
pub const MAX_SUGGESTIONS: usize = 5;

/// Coarse city-size filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopulationBucket {
    #[default]
    Any,
    Small,
    Medium,
    Large,
}

impl PopulationBucket {
    /// Natural-language descriptor for the prompt; `None` when unfiltered.
    pub fn descriptor(&self) -> Option<&'static str> {
        match self {
            PopulationBucket::Any => None,
            PopulationBucket::Small => Some("smaller towns under 100k people"),
            PopulationBucket::Medium => Some("mid-sized cities of 100k to 1M people"),
            PopulationBucket::Large => Some("large cities over 1M people"),
        }
    }
}

impl std::str::FromStr for PopulationBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "any" => Ok(PopulationBucket::Any),
            "small" => Ok(PopulationBucket::Small),
            "medium" => Ok(PopulationBucket::Medium),
            "large" => Ok(PopulationBucket::Large),
            other => Err(format!("unknown population bucket: {}", other)),
        }
    }
}

/// Transient user filters for the suggestion query.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub country: Option<String>,
    pub region: Option<String>,
    pub population: PopulationBucket,
}

impl SearchFilters {
    /// True when no filter field narrows the query.
    pub fn is_empty(&self) -> bool {
        self.country.as_deref().map_or(true, str::is_empty)
            && self.region.as_deref().map_or(true, str::is_empty)
            && self.population == PopulationBucket::Any
    }
}

/// A geolocation hint for proximity-biased suggestions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

pub struct SuggestionClient {
    gemini: GeminiClient,
}

impl SuggestionClient {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// Up to [`MAX_SUGGESTIONS`] candidate city names. Never fails: an empty
    /// query with no filters short-circuits, and any service error degrades
    /// to an empty list.
    pub async fn suggest(
        &self,
        input: &str,
        filters: &SearchFilters,
        language_code: &str,
        location: Option<GeoPoint>,
    ) -> Vec<String> {
        if input.trim().is_empty() && filters.is_empty() {
            return Vec::new();
        }

        let language = language_for(language_code);
        let prompt = build_suggestion_prompt(input, filters, language, location);

        match self.gemini.generate_string_array(&prompt).await {
            Ok(mut names) => {
                names.truncate(MAX_SUGGESTIONS);
                names
            }
            Err(err) => {
                log::warn!("suggestion fetch failed, returning no suggestions: {}", err);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_detection() {
        assert!(SearchFilters::default().is_empty());
        assert!(SearchFilters {
            country: Some(String::new()),
            region: None,
            population: PopulationBucket::Any,
        }
        .is_empty());
        assert!(!SearchFilters {
            country: None,
            region: None,
            population: PopulationBucket::Large,
        }
        .is_empty());
    }

    #[test]
    fn test_population_bucket_parsing() {
        assert_eq!("".parse::<PopulationBucket>().unwrap(), PopulationBucket::Any);
        assert_eq!("small".parse::<PopulationBucket>().unwrap(), PopulationBucket::Small);
        assert!("huge".parse::<PopulationBucket>().is_err());
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits_without_a_key() {
        // No API call is made, so a dummy key never gets used.
        let client = SuggestionClient::new(GeminiClient::new(String::new()));
        let names = client
            .suggest("   ", &SearchFilters::default(), "en", None)
            .await;
        assert!(names.is_empty());
    }
}
