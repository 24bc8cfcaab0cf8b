//! Authorization policies gating the mutating link endpoints

use tracing::{debug, info};

use crate::api::jwt::Principal;
use crate::errors::{CutterError, Result};
use crate::services::UserService;
use crate::storage::{Link, User};

/// 内置管理员角色
pub const ADMIN_ROLE: &str = migration::ADMIN_ROLE_NAME;

/// Account enabled: the principal resolves by username to a non-blocked user
///
/// Returns the resolved user so later checks see current roles.
pub async fn account_enabled(principal: Option<&Principal>, users: &UserService) -> Result<User> {
    let principal = principal.ok_or_else(|| CutterError::unauthorized("Login required"))?;

    let user = users
        .get_by_username(&principal.username)
        .await?
        .ok_or_else(|| {
            debug!("Session user '{}' no longer exists", principal.username);
            CutterError::unauthorized("Unknown account")
        })?;

    if user.is_blocked {
        info!("Blocked user '{}' rejected", user.username);
        return Err(CutterError::forbidden("Account is blocked"));
    }

    Ok(user)
}

pub fn is_admin(user: &User) -> bool {
    user.has_role(ADMIN_ROLE)
}

/// Own links: admin, or the creator of the link
pub fn own_links(user: &User, link: &Link) -> bool {
    is_admin(user) || user.username == link.created_by.username
}

pub fn require_own_links(user: &User, link: &Link) -> Result<()> {
    if own_links(user, link) {
        Ok(())
    } else {
        Err(CutterError::forbidden(format!(
            "Link '{}' belongs to another user",
            link.name
        )))
    }
}

pub fn require_admin(user: &User) -> Result<()> {
    if is_admin(user) {
        Ok(())
    } else {
        Err(CutterError::forbidden("Administrator role required"))
    }
}
