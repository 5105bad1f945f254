//! Request body encoding.
//!
//! # Design
//! The (method, content type) pair is resolved once into a `BodyEncoding`.
//! Request building and request logging both branch on that value, so the two
//! never disagree about where params end up.

use crate::error::ApiError;
use crate::http::{ContentType, HttpMethod};
use crate::params::{ParamsMap, APPLICATION_KEY, JSON_OBJECT};

/// Where a request's params are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// Query string, no body (GET, DELETE).
    Query,
    /// URL-encoded form body (POST with a form content type).
    Form,
    /// JSON payload taken from `JSON_OBJECT` (POST with JSON, every PATCH).
    Json,
}

impl BodyEncoding {
    pub fn resolve(method: HttpMethod, content_type: ContentType) -> Self {
        match (method, content_type) {
            (HttpMethod::Get | HttpMethod::Delete, _) => BodyEncoding::Query,
            (HttpMethod::Post, ContentType::WwwForm) => BodyEncoding::Form,
            (HttpMethod::Post, ContentType::Json) | (HttpMethod::Patch, _) => BodyEncoding::Json,
        }
    }

    /// Content type announced on the wire, if the verb carries a body.
    pub fn content_type(self) -> Option<ContentType> {
        match self {
            BodyEncoding::Query => None,
            BodyEncoding::Form => Some(ContentType::WwwForm),
            BodyEncoding::Json => Some(ContentType::Json),
        }
    }
}

/// Form body from the non-null params, or no body when there are no params.
pub fn form_body(params: Option<&ParamsMap>) -> Option<String> {
    params
        .filter(|p| !p.is_empty())
        .map(ParamsMap::to_url_string)
}

/// JSON body from the `JSON_OBJECT` param, with the application key spliced in
/// as the leading field when one is present.
pub fn json_body(params: Option<&ParamsMap>) -> Result<String, ApiError> {
    let params = params.ok_or_else(|| {
        ApiError::InvalidInput("JSON requests require params with a JSON string".to_string())
    })?;
    let json = params
        .get(JSON_OBJECT)
        .ok_or_else(|| ApiError::InvalidInput("JSON string cannot be null".to_string()))?;

    match params.get(APPLICATION_KEY).filter(|key| !key.is_empty()) {
        Some(app_key) => Ok(splice_application_key(json, app_key)),
        None if json.is_empty() => Err(ApiError::InvalidInput(
            "JSON string cannot be empty".to_string(),
        )),
        None => Ok(json.to_string()),
    }
}

/// Insert `"appkey":"<value>"` as the first field of `json`.
///
/// This is a textual splice: the first character of `json` (assumed `{`) is
/// replaced by `{"appkey":"<value>",` and the rest is kept byte for byte. The
/// key value is not escaped.
pub fn splice_application_key(json: &str, app_key: &str) -> String {
    if json.is_empty() {
        return format!("{{\"{APPLICATION_KEY}\":\"{app_key}\"}}");
    }
    let mut chars = json.chars();
    chars.next();
    let rest = chars.as_str();

    let mut spliced = String::with_capacity(APPLICATION_KEY.len() + app_key.len() + rest.len() + 7);
    spliced.push_str("{\"");
    spliced.push_str(APPLICATION_KEY);
    spliced.push_str("\":\"");
    spliced.push_str(app_key);
    spliced.push_str("\",");
    spliced.push_str(rest);
    spliced
}
