use anyhow::{Context, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::jwt::JwtService;
use crate::api::services::{CookieBuilder, TrustedProxies};
use crate::config::{StaticConfig, get_config};
use crate::services::{GitHubProvider, IdentityProvider, LinkService, NameGenerator, UserService};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 随机会话密钥的字节数
const GENERATED_SECRET_BYTES: usize = 48;

/// 服务器运行所需的全部共享组件
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub link_service: Arc<LinkService>,
    pub user_service: Arc<UserService>,
    pub jwt_service: Arc<JwtService>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub cookie_builder: CookieBuilder,
    pub trusted_proxies: TrustedProxies,
}

/// CLI 子命令使用的组件（不需要 OAuth 与会话）
pub struct CliContext {
    pub storage: Arc<SeaOrmStorage>,
    pub link_service: Arc<LinkService>,
    pub user_service: Arc<UserService>,
}

/// 准备服务器启动的上下文
/// 包括存储、服务、会话签名与身份提供方
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    install_crypto_provider()?;

    let config = get_config();

    let identity_provider = build_identity_provider(&config)?;

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let (link_service, user_service) = build_services(storage.clone(), &config);

    let session_secret = if config.auth.session_secret.is_empty() {
        warn!(
            "WARNING: auth.session_secret is empty, generated a random one. \
            Sessions will not survive a restart."
        );
        generate_session_secret()
    } else {
        check_session_secret_security(&config.auth.session_secret);
        config.auth.session_secret.clone()
    };
    let jwt_service = Arc::new(JwtService::new(&session_secret, config.auth.session_hours));

    if !config.auth.cookie_secure {
        warn!(
            "WARNING: Cookie Secure flag is disabled. \
            Cookies will be sent over unencrypted HTTP connections. \
            Enable cookie_secure=true for production environments."
        );
    }

    let trusted_proxies = TrustedProxies(config.auth.trusted_proxies.clone());
    if trusted_proxies.0.is_empty() {
        info!(
            "Client IP: auto-detect mode. Connections from private IPs will use X-Forwarded-For."
        );
    } else {
        info!(
            "Client IP: explicit trusted proxies configured: {:?}",
            trusted_proxies.0
        );
    }

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        link_service,
        user_service,
        jwt_service,
        identity_provider,
        cookie_builder: CookieBuilder::from_auth_config(&config.auth),
        trusted_proxies,
    })
}

/// CLI 模式只需要存储和两个领域服务
pub async fn prepare_cli_startup() -> Result<CliContext> {
    install_crypto_provider()?;

    let config = get_config();

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    debug!("CLI using storage backend: {}", storage.backend_name());

    let (link_service, user_service) = build_services(storage.clone(), &config);

    Ok(CliContext {
        storage,
        link_service,
        user_service,
    })
}

fn install_crypto_provider() -> Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|e| anyhow::anyhow!("Failed to install rustls crypto provider: {:?}", e))
}

fn build_services(
    storage: Arc<SeaOrmStorage>,
    config: &StaticConfig,
) -> (Arc<LinkService>, Arc<UserService>) {
    if config.cutter.name_seed.is_some() {
        warn!("Name generator is seeded from configuration; generated names are predictable");
    }
    let names = Arc::new(NameGenerator::from_optional_seed(config.cutter.name_seed));

    let link_service = Arc::new(LinkService::new(
        storage.clone(),
        names,
        config.cutter.links_domain.clone(),
    ));
    let user_service = Arc::new(UserService::new(storage));

    (link_service, user_service)
}

fn build_identity_provider(config: &StaticConfig) -> Result<Arc<dyn IdentityProvider>> {
    let auth = &config.auth;
    if auth.github_client_id.is_empty() || auth.github_client_secret.is_empty() {
        anyhow::bail!(
            "GitHub OAuth is not configured: set auth.github_client_id and auth.github_client_secret \
            (or CUTTER__AUTH__GITHUB_CLIENT_ID / CUTTER__AUTH__GITHUB_CLIENT_SECRET)"
        );
    }

    let redirect_uri = auth.effective_redirect_uri(&config.cutter.cutter_domain);
    info!("GitHub OAuth redirect URI: {}", redirect_uri);

    Ok(Arc::new(GitHubProvider::new(
        auth.github_client_id.clone(),
        auth.github_client_secret.clone(),
        redirect_uri,
    )))
}

fn generate_session_secret() -> String {
    let mut bytes = [0u8; GENERATED_SECRET_BYTES];
    rand::rng().fill(&mut bytes[..]);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// 检查会话密钥长度
fn check_session_secret_security(secret: &str) {
    if secret.len() < 32 {
        warn!(
            "WARNING: Session secret is too short ({} bytes). \
            Recommended minimum is 32 bytes for security.",
            secret.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_session_secret_is_random() {
        let a = generate_session_secret();
        let b = generate_session_secret();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_identity_provider_requires_credentials() {
        let mut config = StaticConfig::default();
        assert!(build_identity_provider(&config).is_err());

        config.auth.github_client_id = "id".to_string();
        config.auth.github_client_secret = "secret".to_string();
        let provider = build_identity_provider(&config).unwrap();
        assert_eq!(provider.name(), "github");
    }
}
