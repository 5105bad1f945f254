//! Request and response logging with redaction.
//!
//! # Design
//! Logging is an observer: nothing here returns an error or changes what the
//! executor sends or returns. Redaction is substring-bounded truncation so
//! base64 document payloads never reach the logs in full, and the application
//! key is only ever logged masked.

use std::borrow::Cow;

use tracing::Level;

use crate::body::BodyEncoding;
use crate::http::{ContentType, HttpMethod, HttpResponse, CONTENT_TYPE};
use crate::params::{url_with_params, ParamsMap, JSON_OBJECT};

const DOCUMENT_ROOT: &str = "{\"document\":";
const DOCUMENT_CONTENT_FIELD: &str = "\"documentContent\":";
const BASE64_INDICATOR: &str = ";base64,";
const ENCODED_CHARS_TO_SHOW: usize = 20;
const KEY_CHARS_TO_SHOW: usize = 3;

/// Cut a document upload payload shortly after its `documentContent` field.
pub fn redact_json(json: &str) -> Cow<'_, str> {
    if !json.starts_with(DOCUMENT_ROOT) {
        return Cow::Borrowed(json);
    }
    match json.find(DOCUMENT_CONTENT_FIELD) {
        Some(start) => {
            let end = start + DOCUMENT_CONTENT_FIELD.len() + ENCODED_CHARS_TO_SHOW;
            Cow::Owned(format!("{}...\"}}", prefix(json, end)))
        }
        None => Cow::Borrowed(json),
    }
}

/// Cut a response body shortly after its first `;base64,` data URI marker.
pub fn redact_base64(body: &str) -> Cow<'_, str> {
    match body.find(BASE64_INDICATOR) {
        Some(start) => {
            let end = start + BASE64_INDICATOR.len() + ENCODED_CHARS_TO_SHOW;
            Cow::Owned(format!("{}...\"", prefix(body, end)))
        }
        None => Cow::Borrowed(body),
    }
}

/// `abc...xyz` form of the key, or nothing for keys shorter than 3 chars.
pub fn mask_application_key(key: &str) -> Option<String> {
    let len = key.chars().count();
    if len < KEY_CHARS_TO_SHOW {
        return None;
    }
    let head: String = key.chars().take(KEY_CHARS_TO_SHOW).collect();
    let tail: String = key.chars().skip(len - KEY_CHARS_TO_SHOW).collect();
    Some(format!("{head}...{tail}"))
}

// Longest prefix of `s` no longer than `end` bytes that ends on a char boundary.
fn prefix(s: &str, end: usize) -> &str {
    let mut end = end.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

pub(crate) fn log_request(
    method: HttpMethod,
    content_type: ContentType,
    url: &str,
    params: Option<&ParamsMap>,
) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    let encoding = BodyEncoding::resolve(method, content_type);
    let content_type = encoding.content_type().unwrap_or(content_type);
    match encoding {
        BodyEncoding::Query => {
            let url = url_with_params(url, params);
            tracing::info!(%method, %url, %content_type, "API request");
        }
        BodyEncoding::Form => {
            let params = params.map(ParamsMap::to_url_string).unwrap_or_default();
            tracing::info!(%method, %url, %params, %content_type, "API request");
        }
        BodyEncoding::Json => {
            tracing::info!(%method, %url, %content_type, "API request");
            if let Some(json) = params.and_then(|p| p.get(JSON_OBJECT)) {
                tracing::info!(json = %redact_json(json), "API request JSON");
            }
        }
    }
}

pub(crate) fn log_application_key(key: &str) {
    if let Some(masked) = mask_application_key(key) {
        tracing::info!(application_key = %masked, "added application key");
    }
}

pub(crate) fn log_response(response: &HttpResponse) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    let status = response.status;
    let content_type = response.header(CONTENT_TYPE).unwrap_or("");
    if status == 200 || status == 201 {
        let body = redact_base64(&response.body);
        tracing::info!(status, %content_type, response = %body, "API response");
    } else {
        let body = &response.body;
        tracing::info!(status, %content_type, response = %body, "API error response");
    }
}
