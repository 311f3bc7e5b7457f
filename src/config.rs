use std::env;
use std::net::IpAddr;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The minimum length of the token signing secret in bytes.
const MIN_JWT_SECRET_BYTES: usize = 32;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The maximum number of pooled database connections.
    pub db_pool_size: usize,
    /// The address the server binds to.
    pub bind_addr: IpAddr,
    /// The port the server listens on.
    pub port: u16,
    /// The HMAC secret used to sign session tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// How long an issued session token stays valid, in minutes.
    pub token_ttl_minutes: i64,
    /// Browser origins allowed by CORS.
    pub cors_origins: Vec<String>,
    /// Restricts employee mutations to admins when set.
    pub admin_only_mutations: bool,
    /// Directory holding the built client, served as a fallback.
    pub static_dir: Option<String>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = Zeroizing::new(
            env::var("JWT_SECRET")
                .context("JWT_SECRET must be set (generate with: openssl rand -hex 32)")?
                .into_bytes(),
        );

        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            anyhow::bail!("JWT_SECRET must be at least {} bytes", MIN_JWT_SECRET_BYTES);
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            db_pool_size: env::var("DB_POOL_SIZE")
                .unwrap_or_else(|_| "16".to_string())
                .parse()
                .context("Invalid DB_POOL_SIZE")?,
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .context("Invalid PORT")?,
            jwt_secret,
            token_ttl_minutes: env::var("TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Invalid TOKEN_TTL_MINUTES")?,
            cors_origins: parse_origins(
                &env::var("CORS_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".to_string()),
            ),
            admin_only_mutations: parse_flag(
                &env::var("ADMIN_ONLY_MUTATIONS").unwrap_or_default(),
            ),
            static_dir: env::var("STATIC_DIR").ok().filter(|dir| !dir.is_empty()),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        let origins = parse_origins(" http://a.test , ,http://b.test");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn flags_accept_common_truthy_values() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" ON "));
        assert!(parse_flag("1"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("false"));
    }
}
