use std::env;
use std::time::Duration;

use crate::state::Tab;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8001/api/players";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_DEMO_PLAYERS: usize = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Api,
    Demo,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub source: CatalogSource,
    pub demo_players: usize,
    pub start_tab: Tab,
    pub search_debounce: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            source: CatalogSource::Api,
            demo_players: DEFAULT_DEMO_PLAYERS,
            start_tab: Tab::Search,
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl AppConfig {
    /// Reads `PROSENS_*` variables from the process environment.
    /// Call `dotenvy` first if `.env` files should participate.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("PROSENS_API_URL")
            .as_deref()
            .and_then(non_empty)
            .map(str::to_string)
            .unwrap_or(defaults.api_url);
        let source = match lookup("PROSENS_SOURCE")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "demo" | "fake" => CatalogSource::Demo,
            _ => CatalogSource::Api,
        };
        let demo_players = lookup("PROSENS_DEMO_PLAYERS")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.demo_players)
            .clamp(1, 5_000);
        let start_tab = lookup("PROSENS_START_TAB")
            .as_deref()
            .and_then(Tab::from_name)
            .unwrap_or(defaults.start_tab);
        let debounce_ms = lookup("PROSENS_SEARCH_DEBOUNCE_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS)
            .min(5_000);

        Self {
            api_url,
            source,
            demo_players,
            start_tab,
            search_debounce: Duration::from_millis(debounce_ms),
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
