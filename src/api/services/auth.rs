//! Login, OAuth callback and logout endpoints

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use base64::Engine;
use rand::Rng;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::api::constants::{HOME_PATH, STATE_BYTES, STATE_COOKIE_NAME};
use crate::api::jwt::JwtService;
use crate::errors::CutterError;
use crate::services::{IdentityProvider, UserService};
use crate::utils::ip::extract_client_ip;

use super::error_code::ErrorCode;
use super::helpers::{CookieBuilder, TrustedProxies, error_from_cutter, error_response};
use super::types::{ApiResponse, CallbackParams};

/// 生成 256 bit 的 URL-safe state
fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    rand::rng().fill(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// 常量时间比较
fn state_matches(expected: &str, actual: &str) -> bool {
    expected.len() == actual.len() && bool::from(expected.as_bytes().ct_eq(actual.as_bytes()))
}

fn redirect_home() -> actix_web::HttpResponseBuilder {
    let mut builder = HttpResponse::Found();
    builder.insert_header(("Location", HOME_PATH));
    builder
}

/// GET /challenge
pub async fn challenge(
    provider: web::Data<Arc<dyn IdentityProvider>>,
    cookies: web::Data<CookieBuilder>,
) -> HttpResponse {
    let state = generate_state();
    let location = provider.authorize_url(&state);

    HttpResponse::Found()
        .insert_header(("Location", location))
        .cookie(cookies.build_state_cookie(state))
        .finish()
}

/// GET /callback/login/github
pub async fn callback_get(
    req: HttpRequest,
    params: web::Query<CallbackParams>,
    provider: web::Data<Arc<dyn IdentityProvider>>,
    users: web::Data<UserService>,
    jwt: web::Data<JwtService>,
    cookies: web::Data<CookieBuilder>,
    proxies: web::Data<TrustedProxies>,
) -> HttpResponse {
    handle_callback(req, params.into_inner(), provider, users, jwt, cookies, proxies).await
}

/// POST /callback/login/github
pub async fn callback_post(
    req: HttpRequest,
    params: web::Form<CallbackParams>,
    provider: web::Data<Arc<dyn IdentityProvider>>,
    users: web::Data<UserService>,
    jwt: web::Data<JwtService>,
    cookies: web::Data<CookieBuilder>,
    proxies: web::Data<TrustedProxies>,
) -> HttpResponse {
    handle_callback(req, params.into_inner(), provider, users, jwt, cookies, proxies).await
}

async fn handle_callback(
    req: HttpRequest,
    params: CallbackParams,
    provider: web::Data<Arc<dyn IdentityProvider>>,
    users: web::Data<UserService>,
    jwt: web::Data<JwtService>,
    cookies: web::Data<CookieBuilder>,
    proxies: web::Data<TrustedProxies>,
) -> HttpResponse {
    let expected_state = req.cookie(STATE_COOKIE_NAME).map(|c| c.value().to_string());

    let state_ok = match (expected_state.as_deref(), params.state.as_deref()) {
        (Some(expected), Some(actual)) if !expected.is_empty() => state_matches(expected, actual),
        _ => false,
    };

    if !state_ok {
        warn!("OAuth callback rejected: state missing or mismatched");
        return HttpResponse::BadRequest()
            .cookie(cookies.build_expired_state_cookie())
            .json(ApiResponse::<()> {
                code: ErrorCode::StateMismatch as i32,
                message: "Invalid OAuth state".to_string(),
                data: None,
            });
    }

    if let Some(error) = params.error {
        info!("OAuth provider returned error: {}", error);
        return error_from_cutter(&CutterError::authentication(format!(
            "Login was not completed: {}",
            error
        )));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Missing authorization code",
        );
    };

    let claims = match provider.exchange(&code).await {
        Ok(claims) => claims,
        Err(e) => {
            warn!("{} code exchange failed: {}", provider.name(), e);
            return error_from_cutter(&e);
        }
    };

    let source_ip = extract_client_ip(&req, &proxies.0);
    let user = match users.upsert_from_external_identity(&claims, source_ip).await {
        Ok(user) => user,
        Err(e) => return error_from_cutter(&e),
    };

    if user.is_blocked {
        info!("Blocked user '{}' attempted to log in", user.username);
        return error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::UserBlocked,
            "Account is blocked",
        );
    }

    let token = match jwt.generate_session_token(&user) {
        Ok(token) => token,
        Err(e) => {
            warn!("Failed to issue session token: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to issue session",
            );
        }
    };

    info!("User '{}' logged in via {}", user.username, provider.name());
    redirect_home()
        .cookie(cookies.build_session_cookie(token))
        .cookie(cookies.build_expired_state_cookie())
        .finish()
}

/// GET /logout
pub async fn logout(cookies: web::Data<CookieBuilder>) -> HttpResponse {
    redirect_home()
        .cookie(cookies.build_expired_session_cookie())
        .finish()
}
