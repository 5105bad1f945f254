//! Executor configuration.
//!
//! # Design
//! Credential and application key are fixed when the executor is built.
//! Changing them later goes through `RequestExecutor::set_authorization` /
//! `set_application_key`, which take `&mut self`.

use crate::auth::EncodedCredential;

pub const USERNAME_ENV: &str = "APISDK_USERNAME";
pub const PASSWORD_ENV: &str = "APISDK_PASSWORD";
pub const APPLICATION_KEY_ENV: &str = "APISDK_APPLICATION_KEY";

#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    pub(crate) credential: Option<EncodedCredential>,
    pub(crate) application_key: Option<String>,
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_authorization(mut self, username: &str, password: &str) -> Self {
        self.credential = Some(EncodedCredential::new(username, password));
        self
    }

    pub fn with_application_key(mut self, key: impl Into<String>) -> Self {
        self.application_key = non_empty(key.into());
        self
    }

    /// Read `APISDK_USERNAME`, `APISDK_PASSWORD` and `APISDK_APPLICATION_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let credential = match (lookup(USERNAME_ENV), lookup(PASSWORD_ENV)) {
            (Some(user), Some(password)) => Some(EncodedCredential::new(&user, &password)),
            _ => None,
        };
        Self {
            credential,
            application_key: lookup(APPLICATION_KEY_ENV).and_then(non_empty),
        }
    }

    pub fn application_key(&self) -> Option<&str> {
        self.application_key.as_deref()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
