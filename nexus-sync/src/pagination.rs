//! Pagination walker for link-header driven upstream listings
//!
//! Canvas communicates pagination through a `Link` response header holding
//! one or more `<url>; rel="name"` entries; the `rel="next"` entry drives
//! the walk. Pages are fetched strictly sequentially because each next-page
//! URL is only known from the previous response.

use crate::credentials::Credential;
use reqwest::header::{self, HeaderMap};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Safety cap on pages walked for a single listing. The upstream contract
/// has no bound of its own; past this many pages the walk fails with
/// `PageError::LimitExceeded` instead of looping forever.
pub const MAX_PAGES: usize = 500;

/// Pagination walker errors
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream rejected credential ({0}): {1}")]
    Auth(u16, String),

    #[error("Upstream request failed ({0}): {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Pagination exceeded {0} pages")]
    LimitExceeded(usize),
}

/// Parse a `Link` header into a rel → URL map
///
/// Segments that do not match the `<url>; rel="name"` convention are
/// skipped rather than failing the walk.
pub fn parse_link_header(header: &str) -> HashMap<String, String> {
    let mut links = HashMap::new();

    for part in header.split(',') {
        let mut sections = part.trim().split(';');

        let Some(url_section) = sections.next() else {
            continue;
        };
        let url = url_section.trim();
        let Some(url) = url.strip_prefix('<').and_then(|u| u.strip_suffix('>')) else {
            continue;
        };

        for param in sections {
            let param = param.trim();
            if let Some(rel) = param
                .strip_prefix("rel=\"")
                .and_then(|r| r.strip_suffix('"'))
            {
                links.insert(rel.to_string(), url.to_string());
            }
        }
    }

    links
}

/// Extract the `rel="next"` URL from response headers, if any
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(header::LINK)?.to_str().ok()?;
    parse_link_header(header).remove("next")
}

/// Fetch every page of a paginated listing into one flat ordered sequence
///
/// Issues an authenticated GET per page, appends each page's items in
/// upstream order, and follows `rel="next"` until the upstream omits it.
/// Issues exactly one request per page.
pub async fn fetch_all_pages(
    http: &reqwest::Client,
    start_url: String,
    credential: &Credential,
) -> Result<Vec<Value>, PageError> {
    let mut url = Some(start_url);
    let mut items = Vec::new();
    let mut pages = 0usize;

    while let Some(current) = url.take() {
        if pages >= MAX_PAGES {
            return Err(PageError::LimitExceeded(MAX_PAGES));
        }
        pages += 1;

        tracing::debug!(url = %current, page = pages, "Fetching page");

        let response = credential
            .apply(http.get(&current))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| PageError::Network(e.to_string()))?;

        let status = response.status();
        let next = next_link(response.headers());

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(PageError::Auth(status.as_u16(), body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PageError::Api(status.as_u16(), body));
        }

        let page: Value = response
            .json()
            .await
            .map_err(|e| PageError::Parse(e.to_string()))?;

        match page {
            Value::Array(list) => items.extend(list),
            other => {
                return Err(PageError::Parse(format!(
                    "expected a JSON array page, got {}",
                    json_type_name(&other)
                )))
            }
        }

        url = next;
    }

    Ok(items)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
