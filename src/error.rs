//! Classified service errors
//!
//! Every failure on the budget path surfaces as a [`ServiceError`] with one
//! of a small, flat set of kinds. The UI keys its error panels (and retry
//! guidance) off the kind alone. Classification of opaque transport/API
//! failures is by substring markers in the message, in a fixed priority
//! order; `parsing` and `empty` are assigned at the point of detection and
//! are never reclassified.

use thiserror::Error;

/// What went wrong, as far as the user needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rate/usage limit on the external service
    Quota,
    /// The service refused on content-safety grounds
    Safety,
    /// Local connectivity is absent
    Network,
    /// The configured API key or model resource is invalid or missing
    NotFound,
    /// The response could not be interpreted as the expected structure
    Parsing,
    /// The response contained no interpretable payload at all
    Empty,
    /// Anything else
    Generic,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Quota => "quota",
            ErrorKind::Safety => "safety",
            ErrorKind::Network => "network",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Parsing => "parsing",
            ErrorKind::Empty => "empty",
            ErrorKind::Generic => "generic",
        }
    }

    /// User-facing guidance for the error panel.
    pub fn guidance(&self) -> &'static str {
        match self {
            ErrorKind::Quota => "The API quota has been reached. Wait a while or switch to a different API key.",
            ErrorKind::Safety => "The request was blocked by the service's safety filters. Rephrase and retry.",
            ErrorKind::Network => "No connection. Check your network and retry.",
            ErrorKind::NotFound => "The configured API key looks invalid. Run `volare setup` to reconfigure it.",
            ErrorKind::Parsing | ErrorKind::Empty => {
                "The service returned an unreadable response. Retry the search."
            }
            ErrorKind::Generic => "Something went wrong. Retry the search.",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The sole structured failure type surfaced from the budget path.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), cause: None }
    }

    pub fn with_cause(
        kind: ErrorKind,
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self { kind, message: message.into(), cause: Some(Box::new(cause)) }
    }

    /// Classify an opaque failure message into a kind.
    ///
    /// Priority order (first match wins): quota markers, safety, the
    /// invalid-credential phrase, offline connectivity, generic. The order
    /// matters: a message carrying both "quota" and "safety" is a quota
    /// error.
    pub fn classify(message: impl Into<String>, offline: bool) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        let kind = if message.contains("429") || lower.contains("quota") {
            ErrorKind::Quota
        } else if lower.contains("safety") {
            ErrorKind::Safety
        } else if message.contains("Requested entity was not found") {
            ErrorKind::NotFound
        } else if offline {
            ErrorKind::Network
        } else {
            ErrorKind::Generic
        };
        Self::new(kind, message)
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        // Connect and timeout failures are the transport's "offline" signal.
        let offline = err.is_connect() || err.is_timeout();
        if offline {
            return Self::with_cause(ErrorKind::Network, "No connection to the service", err);
        }
        let mut classified = Self::classify(err.to_string(), false);
        classified.cause = Some(Box::new(err));
        classified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_markers() {
        assert_eq!(ServiceError::classify("API error 429: slow down", false).kind, ErrorKind::Quota);
        assert_eq!(ServiceError::classify("QUOTA exceeded for project", false).kind, ErrorKind::Quota);
    }

    #[test]
    fn test_quota_beats_safety() {
        // First rule wins when multiple markers are present
        let err = ServiceError::classify("quota exhausted after safety review", false);
        assert_eq!(err.kind, ErrorKind::Quota);
    }

    #[test]
    fn test_safety_marker() {
        let err = ServiceError::classify("Blocked by SAFETY settings", false);
        assert_eq!(err.kind, ErrorKind::Safety);
    }

    #[test]
    fn test_not_found_is_exact_phrase() {
        let err = ServiceError::classify("Requested entity was not found.", false);
        assert_eq!(err.kind, ErrorKind::NotFound);
        // The phrase is case-sensitive, matching the service's literal text
        let err = ServiceError::classify("requested entity was not found.", false);
        assert_eq!(err.kind, ErrorKind::Generic);
    }

    #[test]
    fn test_offline_classifies_network() {
        let err = ServiceError::classify("connection reset by peer", true);
        assert_eq!(err.kind, ErrorKind::Network);
        let err = ServiceError::classify("dns lookup failed", true);
        assert_eq!(err.kind, ErrorKind::Network);
    }

    #[test]
    fn test_generic_fallback_keeps_message() {
        let err = ServiceError::classify("boom", false);
        assert_eq!(err.kind, ErrorKind::Generic);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn test_display_includes_kind() {
        let err = ServiceError::new(ErrorKind::Empty, "no payload");
        assert_eq!(err.to_string(), "empty: no payload");
    }
}
