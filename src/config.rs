//! Configuration and user preferences
//!
//! Stored in ~/.config/volare/config.json: the Gemini API key (environment
//! variable takes precedence), the preferred display language, and the
//! favorited city list.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    /// Preferred display-language code, used as the default for searches
    pub language: Option<String>,
    /// Favorited city names, in the order they were added
    #[serde(default)]
    pub favorite_cities: Vec<String>,
}

impl Config {
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("volare"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from disk, or return default
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(content) = fs::read_to_string(&path) {
                match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(err) => {
                        preserve_corrupt_config(&path, &content);
                        eprintln!(
                            "  Warning: Config file was corrupted ({}). A backup was saved and defaults were loaded.",
                            err
                        );
                    }
                }
            }
        }
        Self::default()
    }

    /// Save config to disk
    pub fn save(&self) -> Result<(), String> {
        let dir = Self::config_dir()
            .ok_or_else(|| "Could not determine config directory".to_string())?;
        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        let path = dir.join("config.json");
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))
    }

    /// Get the Gemini API key (environment variable wins over the file)
    pub fn get_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return Some(key);
            }
        }
        self.gemini_api_key.clone()
    }

    /// Set and save the API key
    pub fn set_api_key(&mut self, key: &str) -> Result<(), String> {
        self.gemini_api_key = Some(key.trim().to_string());
        self.save()
    }

    pub fn has_api_key(&self) -> bool {
        self.get_api_key().is_some()
    }

    /// The display-language code to use when the user did not pass one.
    pub fn preferred_language(&self) -> &str {
        self.language.as_deref().unwrap_or("en")
    }

    /// Add a city to the favorites; duplicates (case-insensitive) are ignored.
    pub fn add_favorite(&mut self, city: &str) -> Result<(), String> {
        let exists = self
            .favorite_cities
            .iter()
            .any(|c| c.eq_ignore_ascii_case(city));
        if !exists {
            self.favorite_cities.push(city.to_string());
        }
        self.save()
    }

    /// Remove a city from the favorites, case-insensitively.
    pub fn remove_favorite(&mut self, city: &str) -> Result<(), String> {
        self.favorite_cities.retain(|c| !c.eq_ignore_ascii_case(city));
        self.save()
    }
}

/// Interactive prompt to set up the API key
pub fn setup_api_key_interactive() -> Result<(), String> {
    use std::io::{self, Write};

    println!();
    println!("  Volare uses the Gemini API for budget estimates.");
    println!();
    println!("  1. Get a free API key at: https://aistudio.google.com/apikey");
    println!("  2. Paste it below (or export {} instead)", API_KEY_ENV);
    println!();
    print!("  API Key: ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut key = String::new();
    io::stdin().read_line(&mut key).map_err(|e| e.to_string())?;
    let key = key.trim().to_string();

    if key.is_empty() {
        return Err("No API key provided".to_string());
    }

    let mut config = Config::load();
    config.set_api_key(&key)?;

    println!();
    println!("  + API key saved.");
    Ok(())
}

fn preserve_corrupt_config(path: &std::path::Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}
