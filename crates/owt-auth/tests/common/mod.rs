//! Shared helpers for owt-auth integration tests

#![allow(dead_code)]

use std::fmt;
use std::io::Write;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use owt_auth::{
    DelimitedList, OwtError, OwtResult, ReverseResolver, SigningKey, TokenIssuer, TokenValidator,
};
use tempfile::NamedTempFile;

pub const TEST_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----\n\
MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEowtTestKeyMaterial0001\n\
-----END PUBLIC KEY-----\n";

pub const OTHER_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----\n\
MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEowtTestKeyMaterial0002\n\
-----END PUBLIC KEY-----\n";

/// Write key material to a temporary file, as the service reads it
pub fn key_file(pem: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp key file");
    file.write_all(pem.as_bytes()).expect("write temp key file");
    file
}

pub fn load_key(pem: &str) -> Arc<SigningKey> {
    let file = key_file(pem);
    Arc::new(SigningKey::load(file.path()).expect("load key"))
}

/// Issuer/validator pair sharing one key, 60 minute TTL
pub fn engine(pem: &str) -> (TokenIssuer, TokenValidator) {
    let key = load_key(pem);
    let issuer = TokenIssuer::new(Arc::clone(&key)).with_ttl(Duration::from_secs(60 * 60));
    let validator = TokenValidator::new(
        key,
        DelimitedList::parse("svcA | svcB"),
        DelimitedList::parse("appB"),
    );
    (issuer, validator)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Resolver that never answers within any reasonable timeout
#[derive(Debug, Clone, Copy)]
pub struct SlowResolver(pub Duration);

#[async_trait]
impl ReverseResolver for SlowResolver {
    async fn reverse_lookup(&self, _addr: IpAddr) -> OwtResult<String> {
        tokio::time::sleep(self.0).await;
        Ok("late.corp.example.com".to_string())
    }
}

/// Resolver that always fails
#[derive(Clone, Copy)]
pub struct FailingResolver;

impl fmt::Debug for FailingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FailingResolver")
    }
}

#[async_trait]
impl ReverseResolver for FailingResolver {
    async fn reverse_lookup(&self, addr: IpAddr) -> OwtResult<String> {
        Err(OwtError::lookup_degraded(format!("NXDOMAIN for {addr}")))
    }
}
