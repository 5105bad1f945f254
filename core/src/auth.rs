//! Basic authentication credential.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};

/// `base64(username:password)`, computed once and attached to every request.
pub struct EncodedCredential(SecretString);

impl EncodedCredential {
    pub fn new(username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        Self(SecretString::from(encoded))
    }

    /// Full `Authorization` header value.
    pub fn header_value(&self) -> String {
        format!("Basic {}", self.0.expose_secret())
    }
}

impl Clone for EncodedCredential {
    fn clone(&self) -> Self {
        Self(SecretString::from(self.0.expose_secret().to_owned()))
    }
}

impl fmt::Debug for EncodedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncodedCredential([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_username_and_password() {
        let credential = EncodedCredential::new("alice", "secret");
        assert_eq!(credential.header_value(), "Basic YWxpY2U6c2VjcmV0");
    }

    #[test]
    fn debug_does_not_leak() {
        let credential = EncodedCredential::new("alice", "secret");
        let printed = format!("{credential:?}");
        assert!(!printed.contains("YWxpY2U6c2VjcmV0"));
    }
}
