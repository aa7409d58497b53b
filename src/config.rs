//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// SQLite database file path
    pub database_path: String,
    /// Exact-match origin allow-list. Empty means no origin is ever
    /// accepted (fail-closed), not "allow all".
    pub allowed_origins: Vec<String>,
    /// JWT signing secret for bearer tokens
    pub jwt_secret: String,
    /// Issued token lifetime in minutes
    pub session_ttl_minutes: i64,
    /// Public key handed to upload clients alongside the signature
    pub upload_public_key: String,
    /// Private key for upload signature HMAC
    pub upload_private_key: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Split a comma-separated origin list, dropping whitespace and empties.
    pub fn parse_allow_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/storefront.db".into()),
            allowed_origins: Self::parse_allow_list(
                &std::env::var("CORS_ALLOW_ORIGIN").unwrap_or_default(),
            ),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            session_ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1440),
            upload_public_key: Self::require_secret("UPLOAD_PUBLIC_KEY", &environment)?,
            upload_private_key: Self::require_secret("UPLOAD_PRIVATE_KEY", &environment)?,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_list_trims_and_drops_empties() {
        let origins = Config::parse_allow_list(
            " https://shop.example.com , https://www.shop.example.com ,, ",
        );
        assert_eq!(
            origins,
            vec![
                "https://shop.example.com".to_string(),
                "https://www.shop.example.com".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_allow_list_empty_input() {
        assert!(Config::parse_allow_list("").is_empty());
        assert!(Config::parse_allow_list("  ,  ").is_empty());
    }
}
