use std::sync::Arc;

use actix_web::web;
use bcrypt::DEFAULT_COST;
use chrono::{Duration, Utc};
use log::{error, info, warn};

use super::{parse_id, storage_failure};
use crate::auth::{decode_token, encode_token, hash_password_with_cost, verify_password, Claims};
use crate::error::AppError;
use crate::models::User;
use crate::storage::{StoreError, UserStore};

/// Registration, login, and token handling.
///
/// Holds only immutable configuration and a shared handle to the user store, so one
/// instance is shared by every worker.
pub struct AuthService {
    secret: Vec<u8>,
    token_ttl: Duration,
    bcrypt_cost: u32,
    users: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(
        secret: impl Into<Vec<u8>>,
        token_ttl: Duration,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            secret: secret.into(),
            token_ttl,
            bcrypt_cost: DEFAULT_COST,
            users,
        }
    }

    /// Overrides the bcrypt cost used for new password hashes.
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Creates a new account.
    ///
    /// Fails with `EmailInUse` when the email is taken. Only a not-found lookup leads to
    /// a new record; any other lookup failure is a storage error.
    pub async fn register(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, AppError> {
        match self.users.get_by_email(email).await {
            Ok(_) => return Err(AppError::EmailInUse),
            Err(StoreError::NotFound) => {}
            Err(err) => return Err(storage_failure("register lookup", email, err)),
        }

        let password_hash = self.hash(password).await?;
        let user = User::new(username.to_string(), email.to_string(), password_hash);

        match self.users.create(&user).await {
            Ok(()) => {
                info!("registered user {}", user.id);
                Ok(user)
            }
            // lost a race with a concurrent registration for the same email
            Err(StoreError::Conflict(_)) => Err(AppError::EmailInUse),
            Err(err) => Err(storage_failure("register insert", email, err)),
        }
    }

    /// Checks credentials and issues a token.
    ///
    /// An unknown email and a wrong password produce the same `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = match self.users.get_by_email(email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                warn!("login rejected: no matching account");
                return Err(AppError::InvalidCredentials);
            }
            Err(err) => return Err(storage_failure("login lookup", email, err)),
        };

        if !self.verify(password, &user).await? {
            warn!("login rejected for user {}: wrong password", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = self.generate_token(&user)?;
        info!("user {} logged in", user.id);
        Ok(token)
    }

    /// Signs a token for `user` that expires after the configured TTL.
    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode_token(&claims, &self.secret)
    }

    /// Verifies signature and expiry and returns the claim set.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        decode_token(token, &self.secret)
    }

    /// Loads the caller's own account.
    pub async fn profile(&self, user_id: &str) -> Result<User, AppError> {
        let id = parse_id(user_id, "user id")?;
        match self.users.get_by_id(id).await {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound) => Err(AppError::NotFound("User not found".into())),
            Err(err) => Err(storage_failure("profile", id, err)),
        }
    }

    async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        web::block(move || hash_password_with_cost(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing was cancelled: {}", e)))?
    }

    async fn verify(&self, password: &str, user: &User) -> Result<bool, AppError> {
        let password = password.to_string();
        let hashed = user.password_hash.clone();
        let outcome = web::block(move || verify_password(&password, &hashed))
            .await
            .map_err(|e| AppError::Internal(format!("Password check was cancelled: {}", e)))?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(err) => {
                // a corrupt stored hash still must not tell the caller anything
                error!("stored password hash of user {} is unusable: {}", user.id, err);
                Ok(false)
            }
        }
    }
}
