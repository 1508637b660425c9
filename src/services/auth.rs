//! Authentication service for user management and JWT handling
//!
//! Provides:
//! - User creation with bcrypt password hashes
//! - Login against the stored hash
//! - Bearer token issue and verification

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::db::{CreateUser, Database, UserRecord};

// ============================================================================
// JWT Claims
// ============================================================================

/// Claims carried by a bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID (subject)
    pub sub: String,
    /// Username
    pub username: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp, absent when tokens do not expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("wrong credentials")]
    WrongCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token user no longer exists")]
    UnknownUser,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("failed to hash password: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

// ============================================================================
// Configuration
// ============================================================================

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds; None issues tokens without expiry
    pub token_lifetime: Option<i64>,
    /// Bcrypt cost factor
    pub bcrypt_cost: u32,
    /// Password hashed for users created without one
    pub default_password: String,
}

impl AuthConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_lifetime: config.token_lifetime_secs,
            bcrypt_cost: config.bcrypt_cost,
            default_password: config.default_user_password.clone(),
        }
    }
}

// ============================================================================
// Auth Service
// ============================================================================

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(db: Database, config: AuthConfig) -> Self {
        Self { db, config }
    }

    /// Create a user, hashing `password` or the configured default password
    pub async fn create_user(
        &self,
        username: &str,
        favorite_genre: &str,
        password: Option<&str>,
    ) -> Result<UserRecord, AuthError> {
        let password = password.unwrap_or(self.config.default_password.as_str());
        let password_hash = self.hash_password(password)?;

        let user = self
            .db
            .users()
            .create(CreateUser {
                username: username.to_string(),
                favorite_genre: favorite_genre.to_string(),
                password_hash,
            })
            .await?;

        Ok(user)
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .db
            .users()
            .get_by_username(username)
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            return Err(AuthError::WrongCredentials);
        }

        self.issue_token(&user)
    }

    /// Resolve the user a bearer token was issued to
    pub async fn user_for_token(&self, token: &str) -> Result<UserRecord, AuthError> {
        let claims = self.decode_token(token)?;
        self.db
            .users()
            .get_by_id(&claims.sub)
            .await?
            .ok_or(AuthError::UnknownUser)
    }

    /// Sign a token for `user`
    pub fn issue_token(&self, user: &UserRecord) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: self
                .config
                .token_lifetime
                .map(|secs| (now + Duration::seconds(secs)).timestamp()),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify the signature (and expiry, when present) and return the claims
    pub fn decode_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_aud = false;

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(hash(password, self.config.bcrypt_cost)?)
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(verify(password, hash)?)
    }
}
