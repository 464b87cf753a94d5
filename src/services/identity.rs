//! Registration, login and signed session tokens.
//!
//! Tokens are `<payload>.<signature>`: the payload is base64url JSON claims,
//! the signature is base64url HMAC-SHA256 of the payload under the session
//! secret. Nothing is stored server-side beyond the last issued pair.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use validator::Validate;

use super::{load_user, modify_user};
use crate::config::SessionConfig;
use crate::domain::aggregates::{ProfilePatch, User};
use crate::domain::value_objects::StorageId;
use crate::storage::{StoreError, UserStore};
use crate::{CommerceError, Result};

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Session tokens
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct RefreshClaims {
    uid: String,
    exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct SessionIssuer {
    config: SessionConfig,
}

impl SessionIssuer {
    pub fn new(config: SessionConfig) -> Self { Self { config } }

    pub fn issue(&self, user: &User) -> Result<TokenPair> {
        self.issue_at(user, Utc::now())
    }

    fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<TokenPair> {
        let claims = SessionClaims {
            uid: user.user_id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            exp: now.timestamp() + self.config.token_ttl_seconds,
        };
        let refresh = RefreshClaims { uid: user.user_id.clone(), exp: now.timestamp() + self.config.refresh_ttl_seconds };
        Ok(TokenPair { token: self.sign(&claims)?, refresh_token: self.sign(&refresh)? })
    }

    /// Checks signature, shape and expiry of a session token.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let claims: SessionClaims = self.open(token)?;
        if claims.exp <= Utc::now().timestamp() {
            return Err(CommerceError::Unauthorized("Session expired".into()));
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(self.config.session_secret.expose_secret().as_bytes())
            .map_err(|e| CommerceError::Internal(format!("session key: {e}")))
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String> {
        let json = serde_json::to_vec(claims).map_err(|e| CommerceError::Internal(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    fn open<T: DeserializeOwned>(&self, token: &str) -> Result<T> {
        let invalid = || CommerceError::Unauthorized("Invalid token".into());
        let (payload, signature) = token.split_once('.').ok_or_else(invalid)?;
        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| invalid())?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let json = URL_SAFE_NO_PAD.decode(payload).map_err(|_| invalid())?;
        serde_json::from_slice(&json).map_err(|_| invalid())
    }
}

// =============================================================================
// Password hashing
// =============================================================================

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CommerceError::Internal(format!("password hash: {e}")))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

// =============================================================================
// Requests and views
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 30, message = "First name must be 2-30 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, max = 30, message = "Last name must be 2-30 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, max = 30, message = "First name must be 2-30 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 2, max = 30, message = "Last name must be 2-30 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// User as shown to its owner; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

fn validation(errors: validator::ValidationErrors) -> CommerceError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_values()
        .flatten()
        .map(|e| e.message.as_ref().map_or_else(|| e.code.to_string(), |m| m.to_string()))
        .collect();
    messages.sort();
    CommerceError::Validation(messages.join(", "))
}

// =============================================================================
// Service
// =============================================================================

#[derive(Clone)]
pub struct Identity {
    users: Arc<dyn UserStore>,
    sessions: SessionIssuer,
}

impl Identity {
    pub fn new(users: Arc<dyn UserStore>, sessions: SessionIssuer) -> Self { Self { users, sessions } }

    pub fn sessions(&self) -> &SessionIssuer { &self.sessions }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserProfile> {
        request.validate().map_err(validation)?;
        let email = request.email.trim().to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(CommerceError::Conflict("User already exists".into()));
        }
        if self.users.phone_in_use(&request.phone).await? {
            return Err(CommerceError::Conflict("Phone is already in use".into()));
        }

        let password_hash = hash_password(&request.password)?;
        let mut user = User::register(
            StorageId::generate().to_string(),
            request.first_name,
            request.last_name,
            &email,
            request.phone,
            password_hash,
        );
        let tokens = self.sessions.issue(&user)?;
        user.set_tokens(tokens.token, tokens.refresh_token);

        self.users.insert(&user).await.map_err(|e| match e {
            StoreError::Duplicate("email") => CommerceError::Conflict("User already exists".into()),
            other => other.into(),
        })?;
        tracing::info!(user_id = %user.user_id, "user registered");
        Ok(UserProfile::from(&user))
    }

    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let rejected = || CommerceError::Unauthorized("Invalid credentials".into());
        let user = self.users.find_by_email(request.email.trim()).await?.ok_or_else(rejected)?;
        if !verify_password(&request.password, &user.password_hash) {
            return Err(rejected());
        }

        let tokens = self.sessions.issue(&user)?;
        let (profile, _) = modify_user(self.users.as_ref(), &user.user_id, |user| {
            user.set_tokens(tokens.token.clone(), tokens.refresh_token.clone());
            Ok(UserProfile::from(&*user))
        })
        .await?;
        tracing::info!(user_id = %profile.user_id, "user logged in");
        Ok(LoginResponse { user: profile, tokens })
    }

    pub async fn profile(&self, user_id: &str) -> Result<UserProfile> {
        let user = load_user(self.users.as_ref(), user_id).await?;
        Ok(UserProfile::from(&user))
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn update_profile(&self, user_id: &str, request: UpdateProfileRequest) -> Result<UserProfile> {
        request.validate().map_err(validation)?;
        let patch = ProfilePatch {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
        };
        if patch.is_empty() {
            return Err(CommerceError::Validation("No fields to update".into()));
        }
        let (profile, _) = modify_user(self.users.as_ref(), user_id, |user| {
            user.update_profile(patch.clone());
            Ok(UserProfile::from(&*user))
        })
        .await?;
        Ok(profile)
    }
}
