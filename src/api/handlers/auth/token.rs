//! Bearer token signing and verification.
//!
//! Tokens are `HS256`-signed and self-contained: the user id travels in `sub`
//! and the expiry in `exp`, so verification needs no session storage.

use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

pub(crate) struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenSigner {
    pub(crate) fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // Expired means expired; no clock-skew grace.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a signed token embedding the user id and expiry.
    ///
    /// # Errors
    /// Returns an error if the system clock is unusable or signing fails.
    pub(crate) fn sign(&self, user_id: Uuid) -> Result<String> {
        let now = unix_now()?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl_seconds,
        };
        encode(&Header::default(), &claims, &self.encoding).context("failed to sign token")
    }

    /// Verify signature and expiry, returning the embedded user id.
    ///
    /// Malformed, tampered, and expired tokens all collapse to `None`; the
    /// caller maps every failure to the same `401`.
    pub(crate) fn verify(&self, token: &str) -> Option<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).ok()?;
        Uuid::parse_str(&data.claims.sub).ok()
    }
}

fn unix_now() -> Result<i64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock before unix epoch")?;
    i64::try_from(now.as_secs()).context("timestamp out of i64 range")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(secret: &str, ttl_seconds: i64) -> TokenSigner {
        TokenSigner::new(&SecretString::from(secret.to_string()), ttl_seconds)
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let signer = signer("test-secret", 60);
        let user_id = Uuid::new_v4();
        let token = signer.sign(user_id).expect("sign");
        assert_eq!(signer.verify(&token), Some(user_id));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let signer_a = signer("secret-a", 60);
        let signer_b = signer("secret-b", 60);
        let token = signer_a.sign(Uuid::new_v4()).expect("sign");
        assert_eq!(signer_b.verify(&token), None);
    }

    #[test]
    fn verify_rejects_expired_token() {
        let signer = signer("test-secret", -10);
        let token = signer.sign(Uuid::new_v4()).expect("sign");
        assert_eq!(signer.verify(&token), None);
    }

    #[test]
    fn verify_rejects_garbage() {
        let signer = signer("test-secret", 60);
        assert_eq!(signer.verify("not-a-token"), None);
        assert_eq!(signer.verify(""), None);
    }

    #[test]
    fn verify_rejects_tampered_payload() {
        let signer = signer("test-secret", 60);
        let token = signer.sign(Uuid::new_v4()).expect("sign");
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        parts[1] = parts[1].chars().rev().collect();
        let tampered = parts.join(".");
        assert_eq!(signer.verify(&tampered), None);
    }
}
