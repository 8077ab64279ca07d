use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims, PasswordError};
use crate::config::SecurityConfig;
use crate::database::models::{Category, NewUser, User};
use crate::database::Store;
use crate::error::ApiError;
use crate::services::validation::{parse_categories, parse_credentials, parse_registration};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Body returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

/// Registration, login and the per-user category list.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
    security: SecurityConfig,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    pub async fn register(&self, payload: &Value) -> Result<AuthResponse, ApiError> {
        let registration = parse_registration(payload)?;

        if self.store.find_user_by_email(&registration.email).await?.is_some() {
            return Err(ApiError::conflict("User already exists"));
        }

        let password = registration.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| {
                tracing::error!("Password hashing task failed: {}", e);
                ApiError::internal_server_error("Failed to register user")
            })?
            .map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                ApiError::internal_server_error("Failed to register user")
            })?;

        // A concurrent registration can still win the race; the store reports it as a conflict.
        let user = self
            .store
            .insert_user(NewUser {
                name: registration.name,
                email: registration.email,
                password_hash,
            })
            .await?;

        tracing::info!("Registered user {} ({})", user.id, user.email);
        self.issue(user)
    }

    pub async fn login(&self, payload: &Value) -> Result<AuthResponse, ApiError> {
        let credentials = parse_credentials(payload)?;

        let Some(user) = self.store.find_user_by_email(&credentials.email).await? else {
            tracing::warn!("Login attempt for unknown email {}", credentials.email);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        };

        let candidate = credentials.password;
        let stored_hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored_hash))
            .await
            .map_err(|e| {
                tracing::error!("Password verification task failed: {}", e);
                ApiError::internal_server_error("Failed to log in")
            })?;

        match verified {
            Ok(()) => {
                tracing::info!("User {} logged in", user.id);
                self.issue(user)
            }
            Err(PasswordError::Mismatch) => {
                tracing::warn!("Wrong password for user {}", user.id);
                Err(ApiError::unauthorized(INVALID_CREDENTIALS))
            }
            Err(e) => {
                tracing::error!("Stored password hash for {} is unusable: {}", user.id, e);
                Err(ApiError::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    pub async fn me(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Token is not valid"))
    }

    /// Replaces the whole list; the client sends every category each time.
    pub async fn update_categories(&self, user_id: Uuid, payload: &Value) -> Result<CategoriesResponse, ApiError> {
        let categories = parse_categories(payload)?;
        let user = self
            .store
            .replace_categories(user_id, categories)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Token is not valid"))?;

        tracing::debug!("User {} now has {} categories", user.id, user.categories.len());
        Ok(CategoriesResponse {
            categories: user.categories,
        })
    }

    fn issue(&self, user: User) -> Result<AuthResponse, ApiError> {
        let claims = Claims::new(user.id, user.email.clone(), &self.security);
        let token = generate_jwt(&claims, &self.security).map_err(|e| {
            tracing::error!("Failed to issue token for {}: {}", user.id, e);
            ApiError::internal_server_error("Failed to issue token")
        })?;
        Ok(AuthResponse { token, user })
    }
}
