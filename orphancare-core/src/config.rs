//! Configuration management
//!
//! Settings live in `<data_dir>/settings.json`:
//! ```json
//! {
//!   "apiBaseUrl": "https://<project>.supabase.co/functions/v1",
//!   "anonKey": "...",
//!   "timeoutSecs": 30,
//!   "demoFallback": true
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Production API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://gbcvxntommivvndxqemz.supabase.co/functions/v1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "ORPHANCARE_DIR";
pub const API_URL_ENV: &str = "ORPHANCARE_API_URL";
pub const ANON_KEY_ENV: &str = "ORPHANCARE_ANON_KEY";
pub const DEMO_FALLBACK_ENV: &str = "ORPHANCARE_DEMO_FALLBACK";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anon_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    demo_fallback: Option<bool>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// OrphanCare client configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub anon_key: Option<String>,
    pub timeout_secs: u64,
    /// Substitute demo statistics when the live call fails
    pub demo_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            anon_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            demo_fallback: true,
        }
    }
}

/// Resolve the data directory: `ORPHANCARE_DIR`, else `~/.orphancare`
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".orphancare"))
        .unwrap_or_else(|| PathBuf::from(".orphancare"))
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

/// Check that `raw` is an absolute http(s) URL and normalise it
pub fn validate_base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim()).with_context(|| format!("Invalid API URL '{}'", raw))?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => anyhow::bail!("Unsupported URL scheme '{}' (expected http or https)", scheme),
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

impl Config {
    /// Load config from the data directory
    ///
    /// Environment variables win over the file:
    /// `ORPHANCARE_API_URL`, `ORPHANCARE_ANON_KEY`, `ORPHANCARE_DEMO_FALLBACK`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = Self::read_settings(data_dir)?;
        let defaults = Self::default();

        let api_base_url = match std::env::var(API_URL_ENV).ok().or(raw.api_base_url) {
            Some(url) => validate_base_url(&url)?,
            None => defaults.api_base_url,
        };

        let anon_key = std::env::var(ANON_KEY_ENV)
            .ok()
            .or(raw.anon_key)
            .filter(|k| !k.trim().is_empty());

        let demo_fallback = parse_flag(std::env::var(DEMO_FALLBACK_ENV).ok().as_deref())
            .or(raw.demo_fallback)
            .unwrap_or(defaults.demo_fallback);

        Ok(Self {
            api_base_url,
            anon_key,
            timeout_secs: raw.timeout_secs.filter(|s| *s > 0).unwrap_or(defaults.timeout_secs),
            demo_fallback,
        })
    }

    /// Save config to the data directory, preserving keys we don't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(data_dir)?;
        let mut settings = Self::read_settings(data_dir)?;

        settings.api_base_url = Some(self.api_base_url.clone());
        settings.anon_key = self.anon_key.clone();
        settings.timeout_secs = Some(self.timeout_secs);
        settings.demo_fallback = Some(self.demo_fallback);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }

    fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
        let settings_path = data_dir.join("settings.json");
        if !settings_path.exists() {
            return Ok(SettingsFile::default());
        }
        let content = std::fs::read_to_string(&settings_path)?;
        Ok(serde_json::from_str(&content).unwrap_or_default())
    }

    pub fn set_api_base_url(&mut self, url: &str) -> Result<()> {
        self.api_base_url = validate_base_url(url)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
