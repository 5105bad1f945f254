//! Blocking executor for an authenticated REST API.
//!
//! # Overview
//! Turns `(url, params, method, content type)` into an HTTP request with Basic
//! authentication, sends it once, and turns the response into either the raw
//! success body or an `ApiError` carrying the status code and body.
//!
//! # Design
//! - `RequestExecutor` owns an immutable `ExecutorConfig` (credential and
//!   optional application key) and a `Transport`; there is no global state.
//! - Params are encoded into the query string (GET, DELETE), a form body
//!   (POST) or a JSON payload (POST with JSON, PATCH). The application key is
//!   spliced into JSON payloads as their first field.
//! - Requests and responses are logged through `tracing` with document and
//!   base64 payloads truncated and the application key masked.
//! - Nothing is retried.

pub mod auth;
pub mod body;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod executor;
pub mod http;
pub mod params;
pub mod search;
pub mod transport;
pub mod types;

pub use config::ExecutorConfig;
pub use error::ApiError;
pub use executor::RequestExecutor;
pub use http::{ContentType, HttpMethod, HttpRequest, HttpResponse};
pub use params::ParamsMap;
pub use search::SearchService;
pub use transport::{Transport, UreqTransport};
pub use types::{SearchResult, SearchResultType};
