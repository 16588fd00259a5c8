use crate::auth::authenticator::Identity;
use crate::configs::server::{AdminConfig, ServerConfig};
use crate::error::AuthError;
use crate::storage::{RefreshTokenRepository, UserRepository};
use crate::tokens::access_token::{GeneratedToken, JwtManager};
use crate::tokens::refresh_token::RefreshToken;
use crate::tokens::refresh_token_store::RefreshTokenStore;
use crate::users::user::{User, UserId};
use crate::utils::clock::Clock;
use crate::utils::crypto::{PasswordHasher, MAX_PASSWORD_BYTES};
use crate::utils::text;
use std::sync::Arc;
use tracing::{error, info, warn};

const MAX_USERNAME_LENGTH: usize = 50;

/// Tokens handed out by a successful login.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: GeneratedToken,
    pub refresh_token: RefreshToken,
}

/// How a single user is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Id(UserId),
    Email(String),
    Username(String),
}

/// Login, refresh, revocation and the administrative reset on top of the
/// repositories. Holds no mutable state of its own, the repositories are the only
/// point of serialization.
#[derive(Debug, Clone)]
pub struct SessionService {
    users: Arc<dyn UserRepository>,
    refresh_tokens: RefreshTokenStore,
    jwt_manager: Arc<JwtManager>,
    hasher: Arc<PasswordHasher>,
    clock: Arc<dyn Clock>,
    admin: AdminConfig,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        refresh_tokens: RefreshTokenStore,
        jwt_manager: Arc<JwtManager>,
        hasher: Arc<PasswordHasher>,
        clock: Arc<dyn Clock>,
        admin: AdminConfig,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            jwt_manager,
            hasher,
            clock,
            admin,
        }
    }

    /// Wires the service to a repository that stores both users and refresh tokens.
    pub fn from_config<R>(
        config: &ServerConfig,
        repository: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError>
    where
        R: UserRepository + RefreshTokenRepository + 'static,
    {
        let jwt_manager = Arc::new(JwtManager::from_config(&config.jwt, clock.clone())?);
        let hasher = Arc::new(PasswordHasher::new(config.password.hashing_cost)?);
        let refresh_tokens =
            RefreshTokenStore::new(repository.clone(), clock.clone(), config.refresh_token.expiry);
        Ok(Self::new(
            repository,
            refresh_tokens,
            jwt_manager,
            hasher,
            clock,
            config.admin.clone(),
        ))
    }

    pub fn jwt_manager(&self) -> Arc<JwtManager> {
        self.jwt_manager.clone()
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    pub async fn create_user(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = text::normalize_email(email);
        if !text::is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }

        let username = username.trim();
        if username.is_empty() || username.chars().count() > MAX_USERNAME_LENGTH {
            return Err(AuthError::InvalidUsername);
        }

        if password.is_empty() || password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::InvalidPassword);
        }

        if self.users.get_user_by_email(&email).await?.is_some() {
            warn!("User: {email} already exists.");
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = self.hash_password(password).await?;
        let user = User::new(&email, username, password_hash, self.clock.now());
        info!("Creating user: {email} with ID: {}...", user.id);
        self.users.create_user(&user).await?;
        info!("Created user: {email} with ID: {}.", user.id);
        Ok(user)
    }

    /// Unknown email and wrong password fail alike with `InvalidCredentials`, and
    /// both cost one password verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedTokens, AuthError> {
        let email = text::normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::InvalidEmail);
        }

        if password.is_empty() {
            return Err(AuthError::InvalidPassword);
        }

        let Some(user) = self.users.get_user_by_email(&email).await? else {
            self.verify_dummy(password).await;
            warn!("Cannot login user: {email} (not found).");
            return Err(AuthError::InvalidCredentials);
        };

        info!("Logging in user: {email} with ID: {}...", user.id);
        match self.verify_password(password, &user.password).await {
            Ok(()) => {}
            Err(AuthError::PasswordMismatch) => {
                warn!("Invalid password for user: {email} with ID: {}.", user.id);
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => return Err(err),
        }

        let access_token = self.jwt_manager.generate(user.id)?;
        let refresh_token = self.refresh_tokens.issue(user.id).await?;
        info!("Logged in user: {email} with ID: {}.", user.id);
        Ok(IssuedTokens {
            access_token,
            refresh_token,
        })
    }

    /// Mints a new access token for the owner of a live refresh token. The refresh
    /// token itself is neither rotated nor extended.
    pub async fn refresh(&self, refresh_token: &str) -> Result<GeneratedToken, AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::MissingRefreshToken);
        }

        let refresh_token = self.refresh_tokens.validate(refresh_token).await?;
        let user_id = refresh_token.user_id;
        if self.users.get_user_by_id(user_id).await?.is_none() {
            warn!("Refresh token owner with ID: {user_id} no longer exists.");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.jwt_manager.generate(user_id)?;
        info!("Refreshed access token for user with ID: {user_id}.");
        Ok(access_token)
    }

    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.revoke(refresh_token).await
    }

    /// Idempotent, an unknown or already revoked token is not an error.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        if refresh_token.is_empty() {
            return Err(AuthError::MissingRefreshToken);
        }

        self.refresh_tokens.revoke(refresh_token).await
    }

    pub async fn revoke_all(&self, user_id: UserId) -> Result<usize, AuthError> {
        self.refresh_tokens.revoke_all(user_id).await
    }

    /// Stores the new password and revokes every refresh token of the user.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.is_empty() || new_password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::InvalidPassword);
        }

        let user = self.get_user(user_id).await?;
        match self.verify_password(current_password, &user.password).await {
            Ok(()) => {}
            Err(AuthError::PasswordMismatch) => {
                warn!(
                    "Invalid current password for user: {} with ID: {user_id}.",
                    user.email
                );
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => return Err(err),
        }

        info!(
            "Changing password for user: {} with ID: {user_id}...",
            user.email
        );
        let password_hash = self.hash_password(new_password).await?;
        self.users
            .update_user_password(user_id, &password_hash, self.clock.now())
            .await?;
        self.refresh_tokens.revoke_all(user_id).await?;
        info!(
            "Changed password for user: {} with ID: {user_id}.",
            user.email
        );
        Ok(())
    }

    pub fn ensure_admin(&self, identity: &Identity) -> Result<(), AuthError> {
        if identity.is_admin {
            return Ok(());
        }

        warn!(
            "User with ID: {} is not an administrator.",
            identity.user_id
        );
        Err(AuthError::Unauthorized)
    }

    /// Deletes every user together with their refresh tokens and recreates the
    /// default administrator. The password is hashed before anything is deleted;
    /// the replacement is retried once, deleting users is idempotent.
    pub async fn admin_reset(&self) -> Result<User, AuthError> {
        info!("Resetting all users...");
        let admin = self.default_admin().await?;
        if let Err(err) = self.users.replace_all_users(&admin).await {
            warn!("Cannot reset users, retrying once. Error: {err}");
            self.users.replace_all_users(&admin).await.map_err(|err| {
                error!("Cannot reset users. Error: {err}");
                err
            })?;
        }

        info!(
            "Reset all users, created the default admin: {} with ID: {}.",
            admin.email, admin.id
        );
        Ok(admin)
    }

    /// Creates the default administrator when there are no users at all.
    pub async fn ensure_admin_exists(&self) -> Result<(), AuthError> {
        info!("Loading users...");
        let users = self.users.get_users().await?;
        if !users.is_empty() {
            info!("Initialized {} user(s).", users.len());
            return Ok(());
        }

        info!("No users found, creating the default admin...");
        let admin = self.default_admin().await?;
        self.users.create_user(&admin).await?;
        info!(
            "Created the default admin: {} with ID: {}.",
            admin.email, admin.id
        );
        Ok(())
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))
    }

    pub async fn find_user(&self, lookup: &UserLookup) -> Result<Option<User>, AuthError> {
        match lookup {
            UserLookup::Id(id) => self.users.get_user_by_id(*id).await,
            UserLookup::Email(email) => {
                self.users
                    .get_user_by_email(&text::normalize_email(email))
                    .await
            }
            UserLookup::Username(username) => {
                self.users.get_user_by_username(username.trim()).await
            }
        }
    }

    pub async fn get_users(&self) -> Result<Vec<User>, AuthError> {
        self.users.get_users().await
    }

    /// Revokes the refresh tokens of the user before removing the record, for
    /// repositories that do not cascade.
    pub async fn delete_user(&self, user_id: UserId) -> Result<User, AuthError> {
        let user = self.get_user(user_id).await?;
        info!("Deleting user: {} with ID: {user_id}...", user.email);
        self.refresh_tokens.revoke_all(user_id).await?;
        if !self.users.delete_user(user_id).await? {
            return Err(AuthError::UserNotFound(user_id.to_string()));
        }

        info!("Deleted user: {} with ID: {user_id}.", user.email);
        Ok(user)
    }

    async fn default_admin(&self) -> Result<User, AuthError> {
        let password_hash = self.hash_password(&self.admin.default_password).await?;
        Ok(User::admin(
            &text::normalize_email(&self.admin.email),
            self.admin.username.trim(),
            password_hash,
            self.clock.now(),
        ))
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| {
                error!("Password hashing task has failed. Error: {err}");
                AuthError::CannotHashPassword
            })?
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> Result<(), AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hashed = hashed.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
            .await
            .map_err(|err| {
                error!("Password verification task has failed. Error: {err}");
                AuthError::CannotVerifyPassword
            })?
    }

    async fn verify_dummy(&self, password: &str) {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
    }
}
