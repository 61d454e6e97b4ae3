// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! LMv1 request signing.
//!
//! Every request carries an `Authorization` header of the form
//! `LMv1 <access id>:<signature>:<epoch millis>`, where the signature is the
//! base64 encoding of the lowercase hex HMAC-SHA256 of
//! `<verb><epoch millis><body><resource path>` keyed with the access key.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use time::OffsetDateTime;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct Lmv1Signer {
    access_id: String,
    access_key: String,
}

impl Lmv1Signer {
    #[must_use]
    pub fn new(access_id: impl Into<String>, access_key: impl Into<String>) -> Self {
        Lmv1Signer {
            access_id: access_id.into(),
            access_key: access_key.into(),
        }
    }

    /// Builds the `Authorization` header value for a request sent now.
    #[must_use]
    pub fn authorization(&self, method: &str, body: &[u8], resource_path: &str) -> String {
        self.authorization_at(method, body, resource_path, epoch_millis())
    }

    /// Builds the `Authorization` header value for a request sent at `epoch_millis`.
    #[must_use]
    pub fn authorization_at(
        &self,
        method: &str,
        body: &[u8],
        resource_path: &str,
        epoch_millis: i128,
    ) -> String {
        let signature = self.signature(method, body, resource_path, epoch_millis);
        format!("LMv1 {}:{}:{}", self.access_id, signature, epoch_millis)
    }

    fn signature(&self, method: &str, body: &[u8], resource_path: &str, epoch_millis: i128) -> String {
        let mut mac = match HmacSha256::new_from_slice(self.access_key.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(method.as_bytes());
        mac.update(epoch_millis.to_string().as_bytes());
        mac.update(body);
        mac.update(resource_path.as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());
        base64::engine::general_purpose::STANDARD.encode(digest)
    }
}

impl std::fmt::Debug for Lmv1Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lmv1Signer")
            .field("access_id", &self.access_id)
            .finish_non_exhaustive()
    }
}

fn epoch_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "/log/ingest";

    #[test]
    fn test_authorization_header_format() {
        let signer = Lmv1Signer::new("my-id", "my-key");
        let header = signer.authorization_at("POST", b"[]", PATH, 1_700_000_000_123);

        let rest = header.strip_prefix("LMv1 ").unwrap();
        let parts: Vec<&str> = rest.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "my-id");
        assert_eq!(parts[2], "1700000000123");

        // base64 of a hex encoded SHA-256 digest
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(parts[1])
            .unwrap();
        assert_eq!(decoded.len(), 64);
        assert!(decoded
            .iter()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b)));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let signer = Lmv1Signer::new("id", "key");
        assert_eq!(
            signer.authorization_at("POST", b"[]", PATH, 42),
            signer.authorization_at("POST", b"[]", PATH, 42)
        );
    }

    #[test]
    fn test_signature_covers_body_time_and_key() {
        let signer = Lmv1Signer::new("id", "key");
        let base = signer.authorization_at("POST", b"[]", PATH, 42);
        let sig = |h: &str| h.split(':').nth(1).unwrap().to_string();

        assert_ne!(sig(&base), sig(&signer.authorization_at("POST", b"[{}]", PATH, 42)));
        assert_ne!(sig(&base), sig(&signer.authorization_at("POST", b"[]", PATH, 43)));
        assert_ne!(
            sig(&base),
            sig(&Lmv1Signer::new("id", "other").authorization_at("POST", b"[]", PATH, 42))
        );
    }

    #[test]
    fn test_debug_hides_access_key() {
        let signer = Lmv1Signer::new("id", "super-secret");
        assert!(!format!("{signer:?}").contains("super-secret"));
    }
}
