use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;
use crate::state::Player;

#[derive(Debug, Clone)]
pub struct CatalogFetch {
    pub players: Vec<Player>,
    pub not_modified: bool,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    success: bool,
    #[serde(default)]
    data: Option<Vec<WirePlayer>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WirePlayer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    sens: Value,
    #[serde(default)]
    dpi: Value,
    #[serde(default)]
    edpi: Value,
}

pub fn fetch_catalog(url: &str) -> Result<CatalogFetch> {
    let client = http_client()?;
    let fetched = fetch_json_cached(client, url).context("catalog request failed")?;
    let players = parse_catalog_json(&fetched.body)?;
    Ok(CatalogFetch {
        players,
        not_modified: fetched.not_modified,
    })
}

/// Decodes `{ success, data?, error? }`. A `success: false` envelope is an
/// error carrying the server's message. Rows are checked one by one: a row
/// without a name, a positive sensitivity, or a positive whole DPI is
/// skipped, and an unusable `edpi` is recomputed from sens and DPI.
pub fn parse_catalog_json(raw: &str) -> Result<Vec<Player>> {
    let resp: CatalogResponse =
        serde_json::from_str(raw.trim()).context("invalid catalog json")?;
    if !resp.success {
        let message = resp
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "API request failed".to_string());
        return Err(anyhow!(message));
    }
    Ok(resp
        .data
        .unwrap_or_default()
        .into_iter()
        .filter_map(WirePlayer::into_player)
        .collect())
}

impl WirePlayer {
    fn into_player(self) -> Option<Player> {
        let name = self.name.filter(|n| !n.trim().is_empty())?;
        let sens = positive_number(&self.sens)?;
        let dpi = whole_dpi(&self.dpi)?;
        let edpi = positive_number(&self.edpi).unwrap_or(sens * f64::from(dpi));
        Some(Player {
            name,
            team: self.team.unwrap_or_default(),
            sens,
            dpi,
            edpi,
        })
    }
}

fn positive_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n > 0.0).then_some(n)
}

fn whole_dpi(value: &Value) -> Option<u32> {
    let n = positive_number(value)?;
    if n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}
