use crate::error::AuthError;
use crate::storage::{RefreshTokenRepository, UserRepository};
use crate::tokens::refresh_token::RefreshToken;
use crate::users::user::{User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    user_ids_by_email: HashMap<String, UserId>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

impl Tables {
    fn insert_user(&mut self, user: &User) -> Result<(), AuthError> {
        if self.users.contains_key(&user.id) || self.user_ids_by_email.contains_key(&user.email) {
            return Err(AuthError::UserAlreadyExists);
        }

        self.user_ids_by_email.insert(user.email.clone(), user.id);
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    fn clear_users(&mut self) {
        self.users.clear();
        self.user_ids_by_email.clear();
        self.refresh_tokens.clear();
    }
}

/// Process-local repository. Every call takes the single lock once, so each call
/// is atomic; deleting users cascades to their refresh tokens.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables
            .user_ids_by_email
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|user| user.username == username)
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)))
            .cloned())
    }

    async fn get_users(&self) -> Result<Vec<User>, AuthError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        Ok(users)
    }

    async fn create_user(&self, user: &User) -> Result<(), AuthError> {
        self.tables.write().await.insert_user(user)
    }

    async fn update_user_password(
        &self,
        id: UserId,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Err(AuthError::UserNotFound(id.to_string()));
        };

        user.password = password_hash.to_string();
        user.updated_at = updated_at;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<bool, AuthError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.remove(&id) else {
            return Ok(false);
        };

        tables.user_ids_by_email.remove(&user.email);
        let before = tables.refresh_tokens.len();
        tables.refresh_tokens.retain(|_, token| token.user_id != id);
        debug!(
            "Deleted {} refresh token(s) of user with ID: {id}.",
            before - tables.refresh_tokens.len()
        );
        Ok(true)
    }

    async fn delete_users(&self) -> Result<(), AuthError> {
        let mut tables = self.tables.write().await;
        let users = tables.users.len();
        tables.clear_users();
        info!("Deleted {users} user(s) with their refresh tokens.");
        Ok(())
    }

    async fn replace_all_users(&self, admin: &User) -> Result<(), AuthError> {
        let mut tables = self.tables.write().await;
        tables.clear_users();
        tables.insert_user(admin)
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRepository {
    async fn create_refresh_token(&self, token: &RefreshToken) -> Result<(), AuthError> {
        let mut tables = self.tables.write().await;
        if tables.refresh_tokens.contains_key(&token.token) {
            return Err(AuthError::RefreshTokenAlreadyExists);
        }

        tables
            .refresh_tokens
            .insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn get_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        Ok(self.tables.read().await.refresh_tokens.get(token).cloned())
    }

    async fn revoke_token(
        &self,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, AuthError> {
        let mut tables = self.tables.write().await;
        let Some(token) = tables.refresh_tokens.get_mut(token) else {
            return Ok(false);
        };

        token.revoke(revoked_at);
        Ok(true)
    }

    async fn revoke_all_user_tokens(
        &self,
        user_id: UserId,
        revoked_at: DateTime<Utc>,
    ) -> Result<usize, AuthError> {
        let mut tables = self.tables.write().await;
        let revoked = tables
            .refresh_tokens
            .values_mut()
            .filter(|token| token.user_id == user_id)
            .map(|token| token.revoke(revoked_at))
            .filter(|newly_revoked| *newly_revoked)
            .count();
        Ok(revoked)
    }
}
