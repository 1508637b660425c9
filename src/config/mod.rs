//! Application configuration management

use std::env;

use anyhow::{Context, Result};
use base64::Engine;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// Data store connection string (`sqlite:` URL or plain file path)
    pub database_url: String,

    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,

    /// Token lifetime in seconds; tokens never expire when unset
    pub token_lifetime_secs: Option<i64>,

    /// Bcrypt cost factor for password hashes
    pub bcrypt_cost: u32,

    /// Password assigned to users created without one
    pub default_user_password: String,

    /// Seed the sample catalog into an empty store on startup
    pub seed_sample_data: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Prefer DATABASE_URL, fall back to DATABASE_PATH
        let database_url = env::var("DATABASE_URL")
            .or_else(|_| env::var("DATABASE_PATH"))
            .unwrap_or_else(|_| "sqlite:./data/library.db".to_string());

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret.trim().to_string(),
            _ => {
                tracing::warn!("JWT_SECRET not set; generated a random secret for this process");
                generate_secret()
            }
        };

        let token_lifetime_secs = match env::var("TOKEN_LIFETIME_SECS") {
            Ok(v) => Some(v.parse().context("Invalid TOKEN_LIFETIME_SECS")?),
            Err(_) => None,
        };

        Ok(Self {
            host: env::var("HOST").ok(),

            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url,

            jwt_secret,

            token_lifetime_secs,

            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),

            default_user_password: env::var("DEFAULT_USER_PASSWORD")
                .unwrap_or_else(|_| "secret".to_string()),

            seed_sample_data: env::var("SEED_SAMPLE_DATA")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }

    /// Host used when logging the playground URL
    pub fn display_host(&self) -> &str {
        self.host.as_deref().unwrap_or("localhost")
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
