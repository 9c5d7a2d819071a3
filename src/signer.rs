use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use sha1::{Digest, Sha1};

pub const API_KEY_PARAM: &str = "api_key";
pub const METHOD_PARAM: &str = "method";
pub const TIMESTAMP_PARAM: &str = "timestamp";
pub const NONCE_PARAM: &str = "nonce";
pub const SIGNATURE_PARAM: &str = "sig";

/// Characters left unescaped when canonicalizing parameters for signing.
const SIGNING_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-').remove(b'/');

const NONCE_MIN: i64 = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single signed API call. Built fresh for every request.
#[derive(Clone)]
pub struct RequestEnvelope {
    pub method_name: String,
    pub http_verb: HttpVerb,
    /// Every signed parameter, including `api_key`, `method`, `timestamp` and `nonce`.
    pub params: BTreeMap<String, String>,
    pub timestamp: i64,
    pub nonce: i64,
    pub signature: String,
}

impl RequestEnvelope {
    /// Sign `params` with a fresh timestamp and nonce.
    pub fn new(
        http_verb: HttpVerb,
        method_name: &str,
        params: BTreeMap<String, String>,
        api_key: &str,
        secret: &str,
    ) -> Self {
        let timestamp = chrono::Utc::now().timestamp();
        Self::with_replay_fields(http_verb, method_name, params, api_key, secret, timestamp, generate_nonce())
    }

    /// Sign `params` with the given timestamp and nonce.
    pub fn with_replay_fields(
        http_verb: HttpVerb,
        method_name: &str,
        mut params: BTreeMap<String, String>,
        api_key: &str,
        secret: &str,
        timestamp: i64,
        nonce: i64,
    ) -> Self {
        params.insert(API_KEY_PARAM.to_string(), api_key.to_string());
        params.insert(METHOD_PARAM.to_string(), method_name.to_string());
        params.insert(TIMESTAMP_PARAM.to_string(), timestamp.to_string());
        params.insert(NONCE_PARAM.to_string(), nonce.to_string());

        let signature = sign(&params, secret, http_verb, method_name, timestamp, nonce);
        RequestEnvelope { method_name: method_name.to_string(), http_verb, params, timestamp, nonce, signature }
    }

    /// Parameters as sent on the wire: the signed set plus `sig`.
    pub fn wire_params(&self) -> Vec<(&str, &str)> {
        self.params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(std::iter::once((SIGNATURE_PARAM, self.signature.as_str())))
            .collect()
    }
}

impl fmt::Debug for RequestEnvelope {
    // Parameters can hold passwords and user tokens.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestEnvelope")
            .field("method_name", &self.method_name)
            .field("http_verb", &self.http_verb)
            .field("params", &self.params.keys().collect::<Vec<_>>())
            .field("timestamp", &self.timestamp)
            .field("nonce", &self.nonce)
            .field("signature", &self.signature)
            .finish()
    }
}

/// Lowercase hex SHA-1 of `secret|verb|method|timestamp|nonce|canonical_params`.
pub fn sign(
    params: &BTreeMap<String, String>,
    secret: &str,
    http_verb: HttpVerb,
    method_name: &str,
    timestamp: i64,
    nonce: i64,
) -> String {
    let payload = format!(
        "{}|{}|{}|{}|{}|{}",
        secret,
        http_verb,
        method_name,
        timestamp,
        nonce,
        canonical_params(params)
    );
    hex::encode(Sha1::digest(payload.as_bytes()))
}

/// `key=value` pairs in byte-wise key order, percent-encoded then lowercased, joined with `&`.
pub fn canonical_params(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(s: &str) -> String {
    utf8_percent_encode(s, SIGNING_SAFE).to_string().to_lowercase()
}

fn generate_nonce() -> i64 {
    rand::thread_rng().gen_range(NONCE_MIN..=i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_escapes_like_the_service_expects() {
        assert_eq!(encode("a b/c_d.e-f~"), "a%20b/c_d.e-f%7e");
        assert_eq!(encode("User@Example.COM"), "user%40example.com");
    }

    #[test]
    fn nonce_stays_in_range() {
        for _ in 0..100 {
            assert!(generate_nonce() >= NONCE_MIN);
        }
    }

    #[test]
    fn fresh_envelopes_differ_in_nonce() {
        let a = RequestEnvelope::new(HttpVerb::Get, "Test_GetRequest", BTreeMap::new(), "k", "s");
        let b = RequestEnvelope::new(HttpVerb::Get, "Test_GetRequest", BTreeMap::new(), "k", "s");
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.signature, b.signature);
    }
}
