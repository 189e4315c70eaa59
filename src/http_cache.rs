use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};

// Validators are kept for the life of the process only; nothing touches disk.
static CACHE: Mutex<Option<HashMap<String, CacheEntry>>> = Mutex::new(None);

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub body: String,
    /// True when the server answered `304` and the body came from memory.
    pub not_modified: bool,
}

pub fn fetch_json_cached(client: &Client, url: &str) -> Result<FetchedBody> {
    let cached_entry = lookup(url);

    let mut req = client.get(url).header(ACCEPT, "application/json");
    if let Some(entry) = cached_entry.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let headers = resp.headers().clone();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(entry) = cached_entry {
            return Ok(FetchedBody {
                body: entry.body,
                not_modified: true,
            });
        }
        return Err(anyhow!("received 304 without cache body"));
    }

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, truncate(&body, 200)));
    }

    let etag = headers
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let last_modified = headers
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    store(
        url,
        CacheEntry {
            body: body.clone(),
            etag,
            last_modified,
        },
    );
    Ok(FetchedBody {
        body,
        not_modified: false,
    })
}

fn lookup(url: &str) -> Option<CacheEntry> {
    let guard = CACHE.lock().ok()?;
    guard.as_ref().and_then(|entries| entries.get(url).cloned())
}

fn store(url: &str, entry: CacheEntry) {
    let Ok(mut guard) = CACHE.lock() else {
        return;
    };
    guard
        .get_or_insert_with(HashMap::new)
        .insert(url.to_string(), entry);
}

fn truncate(raw: &str, max_chars: usize) -> String {
    let mut out: String = raw.chars().take(max_chars).collect();
    if raw.chars().count() > max_chars {
        out.push('…');
    }
    out
}
