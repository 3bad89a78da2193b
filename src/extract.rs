//! JSON extraction from free-text model responses
//!
//! The grounded budget call returns prose that wraps JSON somewhere inside
//! it: sometimes in a ```json fence, sometimes mid-paragraph, sometimes the
//! whole body is the object. Extraction tries an ordered list of candidate
//! spans and parses the first one that succeeds. A candidate that exists but
//! will not parse is a `Parsing` failure; no candidate at all is `Empty`.
//! Pure function, no I/O.

use crate::error::{ErrorKind, ServiceError};

#[derive(Debug)]
pub enum ExtractError {
    /// A JSON-looking span was found but did not parse
    Parsing(serde_json::Error),
    /// Nothing in the text looked like JSON
    Empty,
}

impl From<ExtractError> for ServiceError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Parsing(cause) => ServiceError::with_cause(
                ErrorKind::Parsing,
                "The response could not be parsed as JSON",
                cause,
            ),
            ExtractError::Empty => {
                ServiceError::new(ErrorKind::Empty, "The response contained no JSON payload")
            }
        }
    }
}

/// The content of a ```json fenced block, if the text carries one.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```json")?;
    let body = &text[start + "```json".len()..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

/// The span from the first `{` to the last `}`, if both exist in order.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start <= end {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Extract the JSON object embedded in a model response.
pub fn extract_json(text: &str) -> Result<serde_json::Value, ExtractError> {
    let mut candidates: Vec<&str> = Vec::new();
    if let Some(fenced) = fenced_block(text) {
        candidates.push(fenced);
    }
    if let Some(span) = brace_span(text) {
        candidates.push(span);
    }
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        candidates.push(trimmed);
    }

    // No brace anywhere means there is nothing to even attempt.
    if !text.contains('{') {
        return Err(ExtractError::Empty);
    }

    let mut last_err = None;
    for candidate in candidates {
        match serde_json::from_str(candidate) {
            Ok(value) => return Ok(value),
            Err(err) => last_err = Some(err),
        }
    }
    match last_err {
        Some(err) => Err(ExtractError::Parsing(err)),
        None => Err(ExtractError::Empty),
    }
}
