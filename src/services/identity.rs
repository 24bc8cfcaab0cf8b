//! External identity providers
//!
//! The provider builds the authorize URL and exchanges an authorization
//! code for validated `IdentityClaims`. GitHub is the only implementation;
//! its HTTP calls are blocking and run on the blocking thread pool.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use ureq::Agent;

use crate::errors::{CutterError, Result};
use crate::storage::LEGACY_USER_ID;

/// 用户名最大长度
pub const MAX_USERNAME_LENGTH: usize = 64;

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_URL: &str = "https://api.github.com/user";
const GITHUB_SCOPE: &str = "read:user";
const HTTP_TIMEOUT_SECS: u64 = 10;

static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// Claims of an authenticated external identity
///
/// Only constructed through [`IdentityClaims::from_raw`], which fails fast
/// when the id or login is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityClaims {
    id: u32,
    login: String,
    raw: serde_json::Value,
}

impl IdentityClaims {
    pub fn from_raw(raw: serde_json::Value) -> Result<Self> {
        let id = raw
            .get("id")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CutterError::authentication("Identity claims are missing 'id'"))?;

        let id = u32::try_from(id).map_err(|_| {
            CutterError::authentication(format!("Identity id {} is out of range", id))
        })?;

        if id == LEGACY_USER_ID {
            return Err(CutterError::authentication(
                "Identity id collides with a reserved user",
            ));
        }

        let login = raw
            .get("login")
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|login| !login.is_empty())
            .ok_or_else(|| CutterError::authentication("Identity claims are missing 'login'"))?
            .to_string();

        if login.chars().count() > MAX_USERNAME_LENGTH {
            return Err(CutterError::authentication(format!(
                "Identity login exceeds {} characters",
                MAX_USERNAME_LENGTH
            )));
        }

        Ok(Self { id, login, raw })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// URL the browser is sent to, carrying the anti-forgery `state`
    fn authorize_url(&self, state: &str) -> String;

    /// Exchange an authorization code for the caller's identity
    async fn exchange(&self, code: &str) -> Result<IdentityClaims>;
}

pub struct GitHubProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GitHubProvider {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    fn exchange_sync(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
        code: String,
    ) -> Result<serde_json::Value> {
        let agent = get_agent();

        let token: serde_json::Value = agent
            .post(GITHUB_TOKEN_URL)
            .header("Accept", "application/json")
            .send_form([
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("code", code.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
            ])
            .map_err(|e| CutterError::external_service(format!("GitHub token request failed: {}", e)))?
            .into_body()
            .read_json()
            .map_err(|e| CutterError::external_service(format!("GitHub token response: {}", e)))?;

        let access_token = match token.get("access_token").and_then(|t| t.as_str()) {
            Some(t) => t.to_string(),
            None => {
                let reason = token
                    .get("error_description")
                    .or_else(|| token.get("error"))
                    .and_then(|e| e.as_str())
                    .unwrap_or("no access_token in response");
                return Err(CutterError::authentication(format!(
                    "GitHub code exchange rejected: {}",
                    reason
                )));
            }
        };

        agent
            .get(GITHUB_USER_URL)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", access_token))
            .header("User-Agent", "cutter")
            .call()
            .map_err(|e| CutterError::external_service(format!("GitHub user request failed: {}", e)))?
            .into_body()
            .read_json()
            .map_err(|e| CutterError::external_service(format!("GitHub user response: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for GitHubProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn authorize_url(&self, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}",
            GITHUB_AUTHORIZE_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(GITHUB_SCOPE),
            urlencoding::encode(state)
        )
    }

    async fn exchange(&self, code: &str) -> Result<IdentityClaims> {
        let client_id = self.client_id.clone();
        let client_secret = self.client_secret.clone();
        let redirect_uri = self.redirect_uri.clone();
        let code = code.to_string();

        let raw = tokio::task::spawn_blocking(move || {
            Self::exchange_sync(client_id, client_secret, redirect_uri, code)
        })
        .await
        .map_err(|e| {
            warn!("GitHub exchange spawn_blocking failed: {}", e);
            CutterError::external_service(format!("GitHub exchange task failed: {}", e))
        })??;

        debug!("GitHub identity fetched for login {:?}", raw.get("login"));
        IdentityClaims::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claims_from_raw() {
        let claims = IdentityClaims::from_raw(json!({"id": 583231, "login": "octocat"})).unwrap();
        assert_eq!(claims.id(), 583231);
        assert_eq!(claims.login(), "octocat");
        assert_eq!(claims.raw()["login"], "octocat");
    }

    #[test]
    fn test_claims_missing_fields() {
        assert!(matches!(
            IdentityClaims::from_raw(json!({"login": "octocat"})),
            Err(CutterError::Authentication(_))
        ));
        assert!(matches!(
            IdentityClaims::from_raw(json!({"id": 5})),
            Err(CutterError::Authentication(_))
        ));
        assert!(matches!(
            IdentityClaims::from_raw(json!({"id": 5, "login": "  "})),
            Err(CutterError::Authentication(_))
        ));
    }

    #[test]
    fn test_claims_reject_reserved_and_oversized() {
        assert!(IdentityClaims::from_raw(json!({"id": 1, "login": "legacy"})).is_err());
        assert!(IdentityClaims::from_raw(json!({"id": 5_000_000_000u64, "login": "big"})).is_err());
        assert!(IdentityClaims::from_raw(json!({"id": 5, "login": "x".repeat(65)})).is_err());
    }

    #[test]
    fn test_github_authorize_url() {
        let provider = GitHubProvider::new(
            "client-id",
            "secret",
            "https://cutter.example.com/callback/login/github",
        );
        let url = provider.authorize_url("st4te");
        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains(
            "redirect_uri=https%3A%2F%2Fcutter.example.com%2Fcallback%2Flogin%2Fgithub"
        ));
        assert!(url.contains("scope=read%3Auser"));
        assert!(url.contains("state=st4te"));
    }
}
