//! Budget fetch client
//!
//! The core pipeline: assemble context (currency/language resolution and
//! prior user corrections), build the grounded prompt, call the model,
//! extract the JSON payload out of the free-text reply, merge in the
//! citation side-channel, and overlay locally authoritative currency
//! metadata. Every failure leaves as a classified [`ServiceError`]; nothing
//! is retried here.

use crate::corrections::CorrectionStore;
use crate::error::{ErrorKind, ServiceError};
use crate::extract::extract_json;
use crate::gemini::{GeminiClient, WebSource};
use crate::locale::{currency_for, language_for, CurrencyOption};
use crate::prompt::build_budget_prompt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sources kept after the grounding merge.
pub const MAX_SOURCES: usize = 5;

const DEFAULT_SOURCE_TITLE: &str = "Market Data";
const DEFAULT_SOURCE_URI: &str = "#";
const DEFAULT_SNIPPET: &str = "Verified against live market data.";

/// Pricing assumption for the housing category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HousingMode {
    /// A room in a shared flat or house
    #[default]
    Shared,
    /// An entire modest house or apartment
    Whole,
}

/// One line of the itemized budget, as produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<CostSubItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostSubItem {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingTip {
    #[serde(default)]
    pub category: String,
    pub tip: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A grounding citation after the merge, ready to render.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceRef {
    pub title: String,
    pub uri: String,
    pub snippet: String,
}

/// What the model's embedded JSON is expected to look like. Everything the
/// client later overrides or defaults is optional here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BudgetPayload {
    #[serde(default)]
    city: String,
    #[serde(default)]
    total_monthly: f64,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    items: Vec<CostItem>,
    #[serde(default)]
    saving_tips: Vec<SavingTip>,
    #[serde(default)]
    coordinates: Coordinates,
    #[serde(default)]
    source_snippets: HashMap<String, String>,
}

/// The fully assembled estimate handed to the presentation layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResult {
    pub city: String,
    pub currency: String,
    pub currency_symbol: String,
    pub total_monthly: f64,
    pub items: Vec<CostItem>,
    pub sources: Vec<SourceRef>,
    pub summary: String,
    pub saving_tips: Vec<SavingTip>,
    pub coordinates: Coordinates,
}

/// Everything the caller picks before a fetch.
#[derive(Debug, Clone)]
pub struct BudgetRequest {
    pub city: String,
    pub categories: Vec<String>,
    pub currency_code: String,
    pub language_code: String,
    pub housing: HousingMode,
}

pub struct BudgetClient {
    gemini: GeminiClient,
    corrections: CorrectionStore,
}

impl BudgetClient {
    pub fn new(gemini: GeminiClient, corrections: CorrectionStore) -> Self {
        Self { gemini, corrections }
    }

    /// Fetch a budget estimate for a city. Fails with a classified error;
    /// never retries.
    pub async fn fetch_budget(&self, request: &BudgetRequest) -> Result<BudgetResult, ServiceError> {
        // Reference-table resolution never fails; unknown codes fall back.
        let currency = currency_for(&request.currency_code);
        let language = language_for(&request.language_code);

        let corrections = self.corrections.relevant(&request.city, language.code);
        let prompt = build_budget_prompt(
            &request.city,
            &request.categories,
            currency,
            language,
            request.housing,
            &corrections,
        );

        let reply = self.gemini.generate_grounded(&prompt).await?;
        ingest_response(&reply.text, &reply.citations, currency)
    }
}

/// Turn a raw model reply plus its citations into a typed result.
///
/// Pure ingestion step, split out from the network call so the extraction,
/// merge, and overlay behavior is testable with canned responses.
pub fn ingest_response(
    text: &str,
    citations: &[WebSource],
    currency: &CurrencyOption,
) -> Result<BudgetResult, ServiceError> {
    let value = extract_json(text)?;
    let payload: BudgetPayload = serde_json::from_value(value).map_err(|err| {
        ServiceError::with_cause(
            ErrorKind::Parsing,
            "The response JSON did not match the expected shape",
            err,
        )
    })?;

    let sources = merge_sources(citations, &payload.source_snippets);

    // The locally resolved currency wins over whatever the model echoed.
    Ok(BudgetResult {
        city: payload.city,
        currency: currency.code.to_string(),
        currency_symbol: currency.symbol.to_string(),
        total_monthly: payload.total_monthly,
        items: payload.items,
        sources,
        summary: payload.summary,
        saving_tips: payload.saving_tips,
        coordinates: payload.coordinates,
    })
}

/// Map grounding citations to renderable sources, capped at [`MAX_SOURCES`].
/// Snippets come from the payload's source-snippet map, keyed by title.
fn merge_sources(citations: &[WebSource], snippets: &HashMap<String, String>) -> Vec<SourceRef> {
    citations
        .iter()
        .take(MAX_SOURCES)
        .map(|web| {
            let title = web.title.clone().unwrap_or_else(|| DEFAULT_SOURCE_TITLE.to_string());
            let snippet = snippets
                .get(&title)
                .cloned()
                .unwrap_or_else(|| DEFAULT_SNIPPET.to_string());
            SourceRef {
                uri: web.uri.clone().unwrap_or_else(|| DEFAULT_SOURCE_URI.to_string()),
                title,
                snippet,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::currency_for;

    fn lisbon_json() -> &'static str {
        r#"{
            "city": "Lisbon",
            "currency": "USD",
            "currencySymbol": "$",
            "totalMonthly": 950,
            "summary": "Lisbon can be lived in cheaply outside the center.",
            "items": [
                {"category": "housing", "amount": 550, "description": "Room in a shared flat in Amadora"},
                {"category": "groceries", "amount": 400, "description": "Continente and local markets",
                 "explanation": "Weekly basket priced at discount chains",
                 "subItems": [{"name": "staples", "amount": 250}, {"name": "fresh produce", "amount": 150}]}
            ],
            "coordinates": {"lat": 38.7223, "lng": -9.1393},
            "sourceSnippets": {"Idealista": "Rooms in shared flats from 450/month"}
        }"#
    }

    fn citations() -> Vec<WebSource> {
        vec![
            WebSource { title: Some("Idealista".to_string()), uri: Some("https://idealista.pt".to_string()) },
            WebSource { title: None, uri: None },
        ]
    }

    #[test]
    fn test_lisbon_fenced_end_to_end() {
        let text = format!("Here you go:\n```json\n{}\n```", lisbon_json());
        let result = ingest_response(&text, &citations(), currency_for("EUR")).unwrap();

        // The model echoed USD; the locally resolved currency wins.
        assert_eq!(result.currency, "EUR");
        assert_eq!(result.currency_symbol, "€");
        assert_eq!(result.city, "Lisbon");
        assert_eq!(result.total_monthly, 950.0);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[1].sub_items.len(), 2);
        assert_eq!(result.sources.len(), 2);
        // savingTips omitted by the model defaults to empty
        assert!(result.saving_tips.is_empty());
    }

    #[test]
    fn test_source_merge_defaults_and_snippet_lookup() {
        let text = format!("prose before {} prose after", lisbon_json());
        let result = ingest_response(&text, &citations(), currency_for("EUR")).unwrap();

        assert_eq!(result.sources[0].title, "Idealista");
        assert_eq!(result.sources[0].uri, "https://idealista.pt");
        assert_eq!(result.sources[0].snippet, "Rooms in shared flats from 450/month");

        // A citation with no title or uri gets the defaults
        assert_eq!(result.sources[1].title, "Market Data");
        assert_eq!(result.sources[1].uri, "#");
        assert_eq!(result.sources[1].snippet, DEFAULT_SNIPPET);
    }

    #[test]
    fn test_sources_capped_at_five() {
        let many: Vec<WebSource> = (0..8)
            .map(|i| WebSource {
                title: Some(format!("Source {}", i)),
                uri: Some(format!("https://example.com/{}", i)),
            })
            .collect();
        let result = ingest_response(lisbon_json(), &many, currency_for("EUR")).unwrap();
        assert_eq!(result.sources.len(), MAX_SOURCES);
        assert_eq!(result.sources[4].title, "Source 4");
    }

    #[test]
    fn test_no_json_at_all_is_empty_kind() {
        let err = ingest_response("I cannot find pricing data.", &[], currency_for("EUR")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Empty);
    }

    #[test]
    fn test_invalid_json_is_parsing_kind_with_cause() {
        let err = ingest_response("data: {broken", &[], currency_for("EUR")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parsing);
        assert!(err.cause.is_some());
    }

    #[test]
    fn test_shape_mismatch_is_parsing_kind() {
        // Valid JSON, wrong shape: items must be an array
        let err = ingest_response(r#"{"items": 12}"#, &[], currency_for("EUR")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parsing);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let result = ingest_response(r#"{"city": "Porto"}"#, &[], currency_for("USD")).unwrap();
        assert_eq!(result.city, "Porto");
        assert_eq!(result.total_monthly, 0.0);
        assert!(result.items.is_empty());
        assert!(result.sources.is_empty());
        assert_eq!(result.coordinates, Coordinates::default());
    }
}
