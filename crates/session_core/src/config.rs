use std::{collections::HashMap, fs};

use url::Url;

const SETTINGS_FILE: &str = "console.toml";
const DEFAULT_API_ENDPOINT: &str = "http://localhost:5080";
const DEFAULT_SESSION_DB_URL: &str = "sqlite://./data/session.db";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_endpoint: Url,
    pub session_db_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: Url::parse(DEFAULT_API_ENDPOINT).expect("default endpoint parses"),
            session_db_url: DEFAULT_SESSION_DB_URL.into(),
        }
    }
}

/// Startup configuration: defaults, overridden by `console.toml`,
/// overridden by environment variables. Malformed values keep the
/// previous value, so the result is always usable.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("API_ENDPOINT") {
        apply_endpoint(&mut settings, &v);
    }
    if let Ok(v) = std::env::var("APP__API_ENDPOINT") {
        apply_endpoint(&mut settings, &v);
    }

    if let Ok(v) = std::env::var("SESSION_DB_URL") {
        settings.session_db_url = v;
    }
    if let Ok(v) = std::env::var("APP__SESSION_DB_URL") {
        settings.session_db_url = v;
    }

    settings
}

fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("api_endpoint") {
        apply_endpoint(settings, v);
    }
    if let Some(v) = file_cfg.get("session_db_url") {
        settings.session_db_url = v.clone();
    }
}

fn apply_endpoint(settings: &mut Settings, value: &str) {
    if let Ok(parsed) = Url::parse(value) {
        settings.api_endpoint = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
