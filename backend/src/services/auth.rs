//! Authentication service for account registration, login, and token management

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use dripmate_shared::validation::{validate_password, validate_username};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub sub: String, // User ID
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issued access token
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Account row from the database
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Signed-in account
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub tokens: AuthTokens,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Create an account and sign it in
    pub async fn register(&self, username: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let username = username.trim();
        validate_username(username).map_err(|msg| AppError::validation("username", msg))?;
        validate_password(password).map_err(|msg| AppError::validation("password", msg))?;

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE lower(username) = lower($1)",
        )
        .bind(username)
        .fetch_one(&self.db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }

        let password_hash = hash_password(password.to_string()).await?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(%user_id, "account registered");

        Ok(AuthenticatedUser {
            id: user_id,
            username: username.to_string(),
            tokens: self.issue_token(user_id, username)?,
        })
    }

    /// Authenticate with username and password
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthenticatedUser> {
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE lower(username) = lower($1)
            "#,
        )
        .bind(username.trim())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(&self.db)
            .await?;

        let tokens = self.issue_token(user.id, &user.username)?;
        Ok(AuthenticatedUser {
            id: user.id,
            username: user.username,
            tokens,
        })
    }

    fn issue_token(&self, user_id: Uuid, username: &str) -> AppResult<AuthTokens> {
        encode_token(&self.jwt_secret, self.access_token_expiry, user_id, username, Utc::now())
    }
}

/// Sign an access token valid for `expiry_secs` from `now`
pub fn encode_token(
    secret: &str,
    expiry_secs: i64,
    user_id: Uuid,
    username: &str,
    now: DateTime<Utc>,
) -> AppResult<AuthTokens> {
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    Ok(AuthTokens {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: expiry_secs,
    })
}

/// Verify signature and expiry
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::InvalidToken(format!("Invalid token: {}", e)))
}

/// bcrypt is CPU bound; keep it off the async workers
pub async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

pub async fn verify_password(password: String, password_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}
