//! Link management service
//!
//! Owns the link lifecycle: creation with name collision checks and
//! destination dedup, redirect resolution, and the disable/enable/block
//! state transitions.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::errors::{CutterError, Result};
use crate::services::NameGenerator;
use crate::storage::{Link, LinkFlag, NewLink, SeaOrmStorage, User};
use crate::utils::is_valid_link_name;
use crate::utils::url_validator::validate_url;

/// 生成名称撞车时的最大尝试次数
const MAX_GENERATE_ATTEMPTS: usize = 8;

// ============ Request/Response DTOs ============

/// Request to create a new link
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    /// Short name (optional, will be generated if not provided)
    pub name: Option<String>,
    /// Target URL
    pub destination: String,
}

/// Result of link creation
#[derive(Debug, Clone)]
pub struct LinkCreateResult {
    pub link: Link,
    /// An existing link with the same destination was returned instead
    pub deduplicated: bool,
}

/// What the redirect endpoint should do for a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    Redirect(String),
    NotFound,
    Gone,
}

// ============ LinkService Implementation ============

pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    names: Arc<NameGenerator>,
    links_domain: String,
}

impl LinkService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        names: Arc<NameGenerator>,
        links_domain: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            names,
            links_domain: links_domain.into(),
        }
    }

    /// Exact match on name, no side effects
    pub async fn resolve(&self, name: &str) -> Result<Option<Link>> {
        self.storage.find_link_by_name(name).await
    }

    /// Blocked takes precedence over disabled
    pub async fn redirect_decision(&self, name: &str) -> Result<RedirectDecision> {
        Ok(match self.resolve(name).await? {
            None => RedirectDecision::NotFound,
            Some(link) if link.is_blocked => RedirectDecision::Gone,
            Some(link) if link.is_disabled => RedirectDecision::NotFound,
            Some(link) => RedirectDecision::Redirect(link.destination),
        })
    }

    pub async fn is_owned_by(&self, link_id: Uuid, user_id: u32) -> Result<bool> {
        self.storage.is_link_owned_by(link_id, user_id).await
    }

    pub async fn create(
        &self,
        req: CreateLinkRequest,
        requesting_user: &User,
        request_ip: IpAddr,
    ) -> Result<LinkCreateResult> {
        let destination = req.destination.trim().to_string();
        validate_url(&destination).map_err(|e| CutterError::validation(e.to_string()))?;

        let name = match req.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                if !is_valid_link_name(name) {
                    return Err(CutterError::validation(format!(
                        "Invalid link name '{}': only [a-zA-Z0-9_-] up to 512 characters",
                        name
                    )));
                }
                if self.storage.link_name_exists(name).await? {
                    return Err(CutterError::conflict(format!(
                        "Link name '{}' is already in use",
                        name
                    )));
                }
                Some(name.to_string())
            }
            _ => None,
        };

        if let Some(existing) = self.storage.find_link_by_destination(&destination).await? {
            info!(
                "LinkService: destination already shortened as '{}', returning existing link",
                existing.name
            );
            return Ok(LinkCreateResult {
                link: existing,
                deduplicated: true,
            });
        }

        let name = match name {
            Some(name) => name,
            None => self.generate_unused_name().await?,
        };

        let link = self
            .storage
            .insert_link(&NewLink {
                name,
                destination,
                owner_id: requesting_user.id,
                created_from_ip: request_ip,
            })
            .await?;

        info!(
            "LinkService: created link '{}' -> {} for {}",
            link.name, link.destination, requesting_user.username
        );

        Ok(LinkCreateResult {
            link,
            deduplicated: false,
        })
    }

    async fn generate_unused_name(&self) -> Result<String> {
        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let candidate = self.names.generate();
            if !self.storage.link_name_exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!("LinkService: generated name '{}' already taken", candidate);
        }

        Err(CutterError::conflict(
            "Could not generate an unused link name",
        ))
    }

    pub async fn disable(&self, name: &str) -> Result<Link> {
        let link = self
            .storage
            .update_link_flag(name, LinkFlag::Disabled(true))
            .await?;
        info!("LinkService: disabled link '{}'", name);
        Ok(link)
    }

    pub async fn enable(&self, name: &str) -> Result<Link> {
        let link = self
            .storage
            .update_link_flag(name, LinkFlag::Disabled(false))
            .await?;
        info!("LinkService: enabled link '{}'", name);
        Ok(link)
    }

    /// There is no unblock
    pub async fn block(&self, name: &str) -> Result<Link> {
        let link = self.storage.update_link_flag(name, LinkFlag::Blocked).await?;
        warn!("LinkService: blocked link '{}'", name);
        Ok(link)
    }

    pub async fn list_by_owner(&self, user_id: u32) -> Result<Vec<Link>> {
        self.storage.list_links_by_owner(user_id).await
    }

    /// Public URI of a link under the configured links domain
    pub fn build_public_uri(&self, link: &Link) -> Result<Url> {
        build_public_uri(&self.links_domain, &link.name)
    }
}

pub fn build_public_uri(links_domain: &str, name: &str) -> Result<Url> {
    let mut base = Url::parse(links_domain).map_err(|e| {
        CutterError::configuration(format!("Invalid links domain '{}': {}", links_domain, e))
    })?;

    if base.cannot_be_a_base() {
        return Err(CutterError::configuration(format!(
            "Links domain '{}' is not a base URI",
            links_domain
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    Ok(base.join(name)?)
}
