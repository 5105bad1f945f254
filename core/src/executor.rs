//! Request execution: build, dispatch, interpret.
//!
//! # Design
//! `RequestExecutor` holds an `ExecutorConfig` and a `Transport`, nothing
//! else. Each call owns its `ParamsMap` and its `HttpRequest`, so concurrent
//! calls share only read-only configuration. `build_request` and
//! `parse_response` are public so a host can run the I/O itself, the same
//! split `execute` uses internally. Requests are sent exactly once.

use crate::auth::EncodedCredential;
use crate::body::{form_body, json_body, BodyEncoding};
use crate::config::ExecutorConfig;
use crate::diagnostics;
use crate::error::ApiError;
use crate::http::{
    ContentType, HttpMethod, HttpRequest, HttpResponse, AUTHORIZATION, CONTENT_TYPE,
};
use crate::params::{url_with_params, ParamsMap, APPLICATION_KEY};
use crate::transport::{Transport, UreqTransport};

pub struct RequestExecutor<T = UreqTransport> {
    config: ExecutorConfig,
    transport: T,
}

impl RequestExecutor<UreqTransport> {
    pub fn new(config: ExecutorConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }
}

impl<T: Transport> RequestExecutor<T> {
    pub fn with_transport(config: ExecutorConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Replace the Basic credential used for every later request.
    pub fn set_authorization(&mut self, username: &str, password: &str) {
        self.config.credential = Some(EncodedCredential::new(username, password));
    }

    /// Replace (or clear) the application key injected into every request.
    pub fn set_application_key(&mut self, key: Option<String>) {
        self.config.application_key = key.filter(|k| !k.is_empty());
    }

    /// Execute a request and return the success body.
    ///
    /// Statuses 200 and 201 are success; anything else becomes
    /// `ApiError::Api` carrying the status and the raw body.
    pub fn execute(
        &self,
        url: &str,
        params: Option<ParamsMap>,
        method: HttpMethod,
        content_type: ContentType,
    ) -> Result<String, ApiError> {
        diagnostics::log_request(method, content_type, url, params.as_ref());

        let request = self.build_request(url, params, method, content_type)?;
        let response = self.transport.send(&request).inspect_err(|err| {
            tracing::warn!(%method, url = %request.url, error = %err, "request failed");
        })?;
        self.parse_response(url, response)
    }

    pub fn execute_without_params(
        &self,
        url: &str,
        method: HttpMethod,
    ) -> Result<String, ApiError> {
        self.execute(url, None, method, ContentType::default())
    }

    pub fn execute_form(
        &self,
        url: &str,
        params: ParamsMap,
        method: HttpMethod,
    ) -> Result<String, ApiError> {
        self.execute(url, Some(params), method, ContentType::default())
    }

    /// Assemble the wire request: application key, query or body, headers.
    pub fn build_request(
        &self,
        url: &str,
        params: Option<ParamsMap>,
        method: HttpMethod,
        content_type: ContentType,
    ) -> Result<HttpRequest, ApiError> {
        let params = self.with_application_key(params);
        let encoding = BodyEncoding::resolve(method, content_type);

        let (url, body) = match encoding {
            BodyEncoding::Query => (url_with_params(url, params.as_ref()), None),
            BodyEncoding::Form => (url.to_string(), form_body(params.as_ref())),
            BodyEncoding::Json => {
                // POST without params sends no body; PATCH always needs one.
                let body = match (method, params.as_ref()) {
                    (HttpMethod::Post, p) if p.map_or(true, ParamsMap::is_empty) => None,
                    (_, p) => Some(json_body(p)?),
                };
                (url.to_string(), body)
            }
        };

        let mut headers = Vec::with_capacity(2);
        if let Some(content_type) = encoding.content_type() {
            headers.push((CONTENT_TYPE.to_string(), content_type.header_value().to_string()));
        }
        match &self.config.credential {
            Some(credential) => {
                headers.push((AUTHORIZATION.to_string(), credential.header_value()));
            }
            None => {
                tracing::warn!(%method, %url, "no credential configured, sending unauthenticated");
            }
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Interpret a response: 200/201 yield the body, anything else an
    /// `ApiError::Api`.
    pub fn parse_response(&self, url: &str, response: HttpResponse) -> Result<String, ApiError> {
        diagnostics::log_response(&response);

        match response.status {
            200 | 201 => Ok(response.body),
            code => {
                tracing::warn!(code, %url, "creating API error");
                Err(ApiError::Api {
                    code,
                    message: response.body,
                })
            }
        }
    }

    fn with_application_key(&self, params: Option<ParamsMap>) -> Option<ParamsMap> {
        let Some(key) = self.config.application_key.as_deref() else {
            return params;
        };
        let mut params = params.unwrap_or_default();
        params.add_param(APPLICATION_KEY, key);
        diagnostics::log_application_key(key);
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use tracing_test::traced_test;

    use super::*;
    use crate::params::JSON_OBJECT;

    /// Records every request and answers with a canned response.
    struct StubTransport {
        sent: RefCell<Vec<HttpRequest>>,
        response: Result<HttpResponse, ()>,
    }

    impl StubTransport {
        fn answering(status: u16, body: &str) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                response: Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string(),
                }),
            }
        }

        fn failing() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                response: Err(()),
            }
        }
    }

    impl Transport for StubTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.sent.borrow_mut().push(request.clone());
            self.response.clone().map_err(|()| {
                ApiError::transport(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ))
            })
        }
    }

    fn executor(transport: StubTransport) -> RequestExecutor<StubTransport> {
        let config = ExecutorConfig::new().with_authorization("alice", "secret");
        RequestExecutor::with_transport(config, transport)
    }

    fn json_params(json: &str) -> ParamsMap {
        let mut params = ParamsMap::new();
        params.add_param(JSON_OBJECT, json);
        params
    }

    #[test]
    fn get_without_params_has_auth_and_no_body() {
        let exec = executor(StubTransport::answering(200, "[]"));
        let req = exec
            .build_request(
                "https://api.example.com/clients",
                None,
                HttpMethod::Get,
                ContentType::WwwForm,
            )
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.example.com/clients");
        assert_eq!(req.header(AUTHORIZATION), Some("Basic YWxpY2U6c2VjcmV0"));
        assert_eq!(req.header(CONTENT_TYPE), None);
        assert!(req.body.is_none());
    }

    #[test]
    fn delete_puts_params_in_query() {
        let exec = executor(StubTransport::answering(200, ""));
        let params: ParamsMap = [("reason", "duplicate entry")].into_iter().collect();
        let req = exec
            .build_request(
                "https://api.example.com/clients/7",
                Some(params),
                HttpMethod::Delete,
                ContentType::Json,
            )
            .unwrap();
        assert_eq!(req.url, "https://api.example.com/clients/7?reason=duplicate+entry");
        assert!(req.body.is_none());
    }

    #[test]
    fn post_form_drops_null_params() {
        let exec = executor(StubTransport::answering(201, ""));
        let mut params = ParamsMap::new();
        params.add_param("query", "john");
        params.add_optional_param("limit", None);
        let req = exec
            .build_request(
                "https://api.example.com/search",
                Some(params),
                HttpMethod::Post,
                ContentType::WwwForm,
            )
            .unwrap();
        let body = req.body.as_deref().unwrap();
        assert!(body.contains("query=john"));
        assert!(!body.contains("limit"));
        assert_eq!(
            req.header(CONTENT_TYPE),
            Some("application/x-www-form-urlencoded; charset=UTF-8")
        );
    }

    #[test]
    fn patch_is_always_json() {
        let exec = executor(StubTransport::answering(200, ""));
        let req = exec
            .build_request(
                "https://api.example.com/clients/5",
                Some(json_params(r#"{"client":{"id":5}}"#)),
                HttpMethod::Patch,
                ContentType::WwwForm,
            )
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"client":{"id":5}}"#));
        assert_eq!(req.header(CONTENT_TYPE), Some("application/json; charset=UTF-8"));
    }

    #[test]
    fn patch_without_params_is_invalid_input() {
        let exec = executor(StubTransport::answering(200, ""));
        let err = exec
            .execute(
                "https://api.example.com/clients/5",
                None,
                HttpMethod::Patch,
                ContentType::Json,
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert!(exec.transport.sent.borrow().is_empty());
    }

    #[test]
    fn post_json_without_params_has_no_body() {
        let exec = executor(StubTransport::answering(200, ""));
        let req = exec
            .build_request(
                "https://api.example.com/clients",
                None,
                HttpMethod::Post,
                ContentType::Json,
            )
            .unwrap();
        assert!(req.body.is_none());
        assert_eq!(req.header(CONTENT_TYPE), Some("application/json; charset=UTF-8"));
    }

    #[test]
    fn application_key_goes_into_query_form_and_json() {
        let mut exec = executor(StubTransport::answering(200, ""));
        exec.set_application_key(Some("appkey-123".to_string()));

        let get = exec
            .build_request(
                "https://api.example.com/clients",
                None,
                HttpMethod::Get,
                ContentType::WwwForm,
            )
            .unwrap();
        assert_eq!(get.url, "https://api.example.com/clients?appkey=appkey-123");

        let form: ParamsMap = [("firstName", "Ann")].into_iter().collect();
        let post = exec
            .build_request(
                "https://api.example.com/clients",
                Some(form),
                HttpMethod::Post,
                ContentType::WwwForm,
            )
            .unwrap();
        assert_eq!(post.body.as_deref(), Some("firstName=Ann&appkey=appkey-123"));

        let patch = exec
            .build_request(
                "https://api.example.com/clients/5",
                Some(json_params(r#"{"client":{"id":5}}"#)),
                HttpMethod::Patch,
                ContentType::Json,
            )
            .unwrap();
        assert_eq!(
            patch.body.as_deref(),
            Some(r#"{"appkey":"appkey-123","client":{"id":5}}"#)
        );
    }

    #[test]
    fn missing_credential_sends_no_authorization() {
        let stub = StubTransport::answering(200, "");
        let exec = RequestExecutor::with_transport(ExecutorConfig::new(), stub);
        let req = exec
            .build_request(
                "https://api.example.com/clients",
                None,
                HttpMethod::Get,
                ContentType::WwwForm,
            )
            .unwrap();
        assert_eq!(req.header(AUTHORIZATION), None);
    }

    #[test]
    fn set_authorization_replaces_credential() {
        let mut exec = executor(StubTransport::answering(200, ""));
        exec.set_authorization("bob", "hunter2");
        let req = exec
            .build_request(
                "https://api.example.com/clients",
                None,
                HttpMethod::Get,
                ContentType::WwwForm,
            )
            .unwrap();
        assert_eq!(req.header(AUTHORIZATION), Some("Basic Ym9iOmh1bnRlcjI="));
    }

    #[test]
    fn success_statuses_return_body_unchanged() {
        for status in [200, 201] {
            let exec = executor(StubTransport::answering(status, r#"{"id":"1"}"#));
            let body = exec
                .execute_without_params("https://api.example.com/clients/1", HttpMethod::Get)
                .unwrap();
            assert_eq!(body, r#"{"id":"1"}"#);
        }
    }

    #[test]
    fn other_statuses_become_api_errors() {
        for status in [202, 204, 301, 400, 401, 404, 500, 503] {
            let exec = executor(StubTransport::answering(status, "failure body"));
            let err = exec
                .execute_without_params("https://api.example.com/clients/1", HttpMethod::Get)
                .unwrap_err();
            match err {
                ApiError::Api { code, message } => {
                    assert_eq!(code, status);
                    assert_eq!(message, "failure body");
                }
                other => panic!("status {status}: unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn failures_are_not_retried() {
        let exec = executor(StubTransport::answering(503, "unavailable"));
        let _ = exec.execute_form(
            "https://api.example.com/clients",
            ParamsMap::new(),
            HttpMethod::Post,
        );
        assert_eq!(exec.transport.sent.borrow().len(), 1);

        let exec = executor(StubTransport::failing());
        let err = exec
            .execute_without_params("https://api.example.com/clients", HttpMethod::Get)
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(exec.transport.sent.borrow().len(), 1);
    }

    #[test]
    #[traced_test]
    fn application_key_is_only_logged_masked() {
        let mut exec = executor(StubTransport::answering(201, "{}"));
        exec.set_application_key(Some("fullapplicationkey".to_string()));
        let params: ParamsMap = [("firstName", "Ann")].into_iter().collect();

        exec.execute_form("https://api.example.com/clients", params, HttpMethod::Post)
            .unwrap();

        let sent = exec.transport.sent.borrow();
        assert_eq!(sent[0].body.as_deref(), Some("firstName=Ann&appkey=fullapplicationkey"));
        assert!(logs_contain("firstName=Ann"));
        assert!(logs_contain("ful...key"));
        assert!(!logs_contain("fullapplicationkey"));
    }
}
