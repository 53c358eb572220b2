//! Registration, login, and bearer-token authentication.
//!
//! Registration and login issue a signed token embedding the user id and an
//! expiry; protected routes present it as `Authorization: Bearer <token>`.
//! The guard in [`principal`] verifies signature and expiry offline, then
//! resolves the embedded user id against the database so deleted users lose
//! access immediately even while their tokens are still within TTL.
//!
//! Flow Overview:
//! 1) Validate registration/login input (name, email format, password length).
//! 2) Hash passwords with Argon2id; only the hash is stored.
//! 3) Sign a token for the user id; hand it to the client.
//! 4) On each protected request, verify the token and attach the principal.

pub(crate) mod login;
pub(crate) mod me;
pub mod principal;
pub(crate) mod register;

mod password;
mod storage;
mod token;
mod types;
mod utils;

use secrecy::SecretString;

const DEFAULT_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

const NAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 6;

#[derive(Clone)]
pub struct AuthConfig {
    token_secret: SecretString,
    frontend_base_url: String,
    token_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(token_secret: SecretString, frontend_base_url: String) -> Self {
        Self {
            token_secret,
            frontend_base_url,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    #[must_use]
    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"***")
            .field("frontend_base_url", &self.frontend_base_url)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// Shared auth state attached to the router as an `Extension`.
pub struct AuthState {
    config: AuthConfig,
    tokens: token::TokenSigner,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        let tokens = token::TokenSigner::new(&config.token_secret, config.token_ttl_seconds);
        Self { config, tokens }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn tokens(&self) -> &token::TokenSigner {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn auth_config_debug_hides_secret() {
        let config = AuthConfig::new(
            SecretString::from("sekrit".to_string()),
            "http://localhost:5173".to_string(),
        );
        let rendered = format!("{config:?}");
        assert!(rendered.contains("***"));
        assert!(!rendered.contains("sekrit"));
    }

    #[test]
    fn auth_state_signs_verifiable_tokens() {
        let config = AuthConfig::new(
            SecretString::from("sekrit".to_string()),
            "http://localhost:5173".to_string(),
        )
        .with_token_ttl_seconds(60);
        let state = AuthState::new(config);

        let user_id = Uuid::new_v4();
        let token = state.tokens().sign(user_id).expect("sign token");
        assert_eq!(state.tokens().verify(&token), Some(user_id));
    }
}
