use crate::api::{self, handlers::auth::AuthConfig};
use anyhow::Result;
use secrecy::SecretString;

pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub token_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub frontend_base_url: String,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field("dsn", &self.dsn)
            .field("token_secret", &"***")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("frontend_base_url", &self.frontend_base_url)
            .finish()
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database pool cannot be created or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = AuthConfig::new(args.token_secret, args.frontend_base_url)
        .with_token_ttl_seconds(args.token_ttl_seconds);

    api::new(args.port, args.dsn, auth_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_debug_hides_secret() {
        let args = Args {
            port: 8080,
            dsn: "postgres://localhost/tasko".to_string(),
            token_secret: SecretString::from("sekrit".to_string()),
            token_ttl_seconds: 3600,
            frontend_base_url: "http://localhost:5173".to_string(),
        };
        let rendered = format!("{args:?}");
        assert!(rendered.contains("***"));
        assert!(!rendered.contains("sekrit"));
    }
}
