//! User price-correction store
//!
//! When a user flags a budget line as wrong, the report is appended to a
//! local JSON file and fed back into future prompts as soft guidance. The
//! list is capped at the 50 most recent entries; older ones are evicted.
//! Records are never edited after creation.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Most recent entries kept; older ones are silently dropped.
pub const MAX_CORRECTIONS: usize = 50;

/// A user report that one budget line looked inaccurate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserCorrection {
    /// City the report applies to; `None` means it applies globally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub category: String,
    pub language_code: String,
    pub reason: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_translation: Option<String>,
    pub timestamp_millis: i64,
}

impl UserCorrection {
    pub fn new(city: Option<String>, category: &str, language_code: &str, reason: &str) -> Self {
        Self {
            city,
            category: category.to_string(),
            language_code: language_code.to_string(),
            reason: reason.to_string(),
            comment: String::new(),
            suggested_translation: None,
            timestamp_millis: Utc::now().timestamp_millis(),
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_string();
        self
    }

    pub fn with_suggested_translation(mut self, translation: &str) -> Self {
        self.suggested_translation = Some(translation.to_string());
        self
    }
}

/// File-backed, append-only correction list.
pub struct CorrectionStore {
    path: PathBuf,
}

impl CorrectionStore {
    /// Store under the user config directory (`volare/corrections.json`).
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("volare");
        Ok(Self::at_path(dir.join("corrections.json")))
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All stored corrections, oldest first. Missing or unreadable files
    /// load as empty; a corrupt file is logged and treated as empty.
    pub fn load(&self) -> Vec<UserCorrection> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&content) {
            Ok(list) => list,
            Err(err) => {
                log::warn!("correction store at {} is corrupt ({}), starting empty", self.path.display(), err);
                Vec::new()
            }
        }
    }

    /// Append a correction, evicting the oldest entries past the cap.
    pub fn record(&self, correction: UserCorrection) -> Result<()> {
        let mut list = self.load();
        list.push(correction);
        if list.len() > MAX_CORRECTIONS {
            let excess = list.len() - MAX_CORRECTIONS;
            list.drain(..excess);
        }
        self.save(&list)
    }

    fn save(&self, list: &[UserCorrection]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let content = serde_json::to_string_pretty(list)?;
        write_atomic(&self.path, &content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Corrections relevant to a city and language: case-insensitive city
    /// match OR global (cityless) entries, and an exact language match.
    pub fn relevant(&self, city: &str, language_code: &str) -> Vec<UserCorrection> {
        self.load()
            .into_iter()
            .filter(|c| c.language_code == language_code)
            .filter(|c| match &c.city {
                Some(entry_city) => entry_city.eq_ignore_ascii_case(city),
                None => true,
            })
            .collect()
    }
}

/// Render corrections as a prompt addendum: one bullet per report, then a
/// directive asking the model to prioritize those points. Empty input
/// renders as the empty string.
pub fn render_prompt_addendum(corrections: &[UserCorrection]) -> String {
    if corrections.is_empty() {
        return String::new();
    }
    let mut out = String::from(
        "\nUsers have previously reported inaccuracies in this data:\n",
    );
    for c in corrections {
        let scope = c.city.as_deref().unwrap_or("all cities");
        out.push_str(&format!("- {} / {}: {}", scope, c.category, c.reason));
        if let Some(translation) = &c.suggested_translation {
            out.push_str(&format!(" (suggested wording: \"{}\")", translation));
        }
        if !c.comment.is_empty() {
            out.push_str(&format!(" (note: {})", c.comment));
        }
        out.push('\n');
    }
    out.push_str(
        "Prioritize accuracy on these specific points in your estimate.\n",
    );
    out
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content)?;
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}
