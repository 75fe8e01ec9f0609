//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::{AdminConfig, AuthConfig},
    error::{AppError, AppResult},
    models::user::{CreateUser, Role, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by name and password, returning a bearer token
    pub async fn authenticate(&self, name: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_name(name)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Incorrect username or password".to_string())
            })?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Incorrect username or password".to_string(),
            ));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.name.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Get the caller's profile
    pub async fn get_user(&self, user_id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// Create a new user (admin); duplicate name or email is a conflict
    pub async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.get_by_name(&request.name).await?.is_some() {
            return Err(AppError::Conflict(
                "DUPLICATE",
                format!("User '{}' already exists", request.name),
            ));
        }
        if self
            .repository
            .users
            .get_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "DUPLICATE",
                format!("Email '{}' is already registered", request.email),
            ));
        }

        let hash = self.hash_password(&request.password)?;
        self.repository
            .users
            .create(
                &request.name,
                &request.email,
                &hash,
                request.role.unwrap_or(Role::User),
            )
            .await
    }

    /// Create the admin account from configuration if it does not exist
    pub async fn bootstrap_admin(&self, admin: &AdminConfig) -> AppResult<()> {
        if self.repository.users.get_by_name(&admin.name).await?.is_some() {
            return Ok(());
        }

        let hash = self.hash_password(&admin.password)?;
        self.repository
            .users
            .create(&admin.name, &admin.email, &hash, Role::Admin)
            .await?;

        tracing::info!("Bootstrapped admin account '{}'", admin.name);
        Ok(())
    }
}
