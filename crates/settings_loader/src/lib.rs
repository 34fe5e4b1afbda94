//! # Settings Loader
//!
//! Centralized settings loading for the signal-front components. Settings come
//! from a JSON file (`signal_front.json` by default) and are then overridden by
//! environment variables, after an optional `.env` file has been applied.
//!
//! ## Environment overrides
//!
//! - `SIGNAL_FRONT_ORIGIN`
//! - `SIGNAL_FRONT_POLL_SECS`
//! - `SIGNAL_FRONT_TIMEOUT_SECS`
//! - `SIGNAL_FRONT_UTC_OFFSET_MINUTES`
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/signal_front.json")?;
//!
//! // File if present, defaults otherwise, env on top
//! let path = Some(PathBuf::from("signal_front.json"));
//! let settings = settings_loader::resolve_settings(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::FrontendSettings;

pub const DEFAULT_SETTINGS_FILE: &str = "signal_front.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<FrontendSettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: FrontendSettings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (signal_front.json in the current directory)
pub fn load_default_settings() -> Result<FrontendSettings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Tries the provided path, then the default location. Returns None only if no
/// settings file is found anywhere. A file that exists but fails to parse is an error.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Option<FrontendSettings>> {
    if let Some(settings_path) = path {
        if settings_file_exists(settings_path) {
            return load_settings(settings_path).map(Some);
        }
        tracing::debug!("settings file {} not found, trying default", settings_path.display());
    }

    if settings_file_exists(DEFAULT_SETTINGS_FILE) {
        return load_default_settings().map(Some);
    }

    Ok(None)
}

/// File (or defaults), then `.env`, then process environment.
pub fn resolve_settings(path: Option<&PathBuf>) -> Result<FrontendSettings> {
    let mut settings = load_settings_with_fallback(path)?.unwrap_or_default();

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).context("Loading .env file");
        }
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

/// Applies `SIGNAL_FRONT_*` overrides read through `lookup`.
pub fn apply_env_overrides<F>(settings: &mut FrontendSettings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(origin) = lookup("SIGNAL_FRONT_ORIGIN") {
        settings.origin = origin.trim().to_string();
    }
    if let Some(raw) = lookup("SIGNAL_FRONT_POLL_SECS") {
        settings.poll_interval_secs = raw
            .trim()
            .parse()
            .with_context(|| format!("SIGNAL_FRONT_POLL_SECS is not a number: {raw}"))?;
    }
    if let Some(raw) = lookup("SIGNAL_FRONT_TIMEOUT_SECS") {
        settings.request_timeout_secs = raw
            .trim()
            .parse()
            .with_context(|| format!("SIGNAL_FRONT_TIMEOUT_SECS is not a number: {raw}"))?;
    }
    if let Some(raw) = lookup("SIGNAL_FRONT_UTC_OFFSET_MINUTES") {
        settings.utc_offset_minutes = raw
            .trim()
            .parse()
            .with_context(|| format!("SIGNAL_FRONT_UTC_OFFSET_MINUTES is not a number: {raw}"))?;
    }
    Ok(())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_load_settings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"origin": "https://signal.example", "poll_interval_secs": 5}}"#).unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.origin, "https://signal.example");
        assert_eq!(settings.poll_interval_secs, 5);
        assert_eq!(settings.landing_ledger_limit, 20);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_settings(file.path()).unwrap_err();
        assert!(err.to_string().contains("Parsing settings JSON"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SIGNAL_FRONT_ORIGIN", " http://127.0.0.1:9000 "),
            ("SIGNAL_FRONT_POLL_SECS", "12"),
            ("SIGNAL_FRONT_UTC_OFFSET_MINUTES", "-300"),
        ]
        .into_iter()
        .collect();

        let mut settings = FrontendSettings::default();
        apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string())).unwrap();

        assert_eq!(settings.origin, "http://127.0.0.1:9000");
        assert_eq!(settings.poll_interval_secs, 12);
        assert_eq!(settings.utc_offset_minutes, -300);
        assert_eq!(settings.request_timeout_secs, 10);
    }

    #[test]
    fn test_bad_env_number_is_rejected() {
        let mut settings = FrontendSettings::default();
        let result = apply_env_overrides(&mut settings, |key| {
            (key == "SIGNAL_FRONT_POLL_SECS").then(|| "soon".to_string())
        });
        assert!(result.is_err());
        assert_eq!(settings.poll_interval_secs, 30);
    }
}
