//! User directory service

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{CutterError, Result};
use crate::services::IdentityClaims;
use crate::storage::{SeaOrmStorage, User, UserUpsert};

pub struct UserService {
    storage: Arc<SeaOrmStorage>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn get_by_id(&self, id: u32) -> Result<Option<User>> {
        self.storage.find_user_by_id(id).await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        self.storage.find_user_by_username(username).await
    }

    /// Create or refresh the user behind an external identity
    ///
    /// Overwrites the username and raw claims, appends `source_ip` when it
    /// has not been seen before and bumps `updated_at`, all in one transaction.
    pub async fn upsert_from_external_identity(
        &self,
        claims: &IdentityClaims,
        source_ip: IpAddr,
    ) -> Result<User> {
        let user = self
            .storage
            .upsert_user(&UserUpsert {
                id: claims.id(),
                username: claims.login().to_string(),
                raw_object: claims.raw().clone(),
                source_ip,
            })
            .await?;

        info!("UserService: refreshed user {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn disable(&self, id: u32) -> Result<User> {
        let user = self.storage.set_user_blocked(id).await?;
        warn!("UserService: blocked user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Attach an existing role; granting twice is a no-op
    pub async fn grant_role(&self, id: u32, role_name: &str) -> Result<User> {
        if self.storage.find_user_by_id(id).await?.is_none() {
            return Err(CutterError::not_found(format!("User not found: {}", id)));
        }

        let role = self
            .storage
            .find_role_by_name(role_name)
            .await?
            .ok_or_else(|| CutterError::not_found(format!("Role not found: {}", role_name)))?;

        self.storage.attach_role(id, role.id).await?;
        info!("UserService: granted role '{}' to user {}", role.name, id);

        self.storage
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| CutterError::not_found(format!("User not found: {}", id)))
    }
}
