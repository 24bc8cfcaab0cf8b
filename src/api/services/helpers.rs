//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::api::constants;
use crate::config::{AuthConfig, SameSitePolicy};
use crate::errors::CutterError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 CutterError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_cutter(err: &CutterError) -> HttpResponse {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, ErrorCode::from(err), err.message())
}

/// 客户端 IP 提取使用的可信代理列表
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies(pub Vec<String>);

/// Cookie 构建器
#[derive(Debug, Clone)]
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    session_hours: u64,
}

impl CookieBuilder {
    pub fn from_auth_config(auth: &AuthConfig) -> Self {
        let same_site = match auth.cookie_same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
            SameSitePolicy::Lax => SameSite::Lax,
        };

        Self {
            same_site,
            secure: auth.cookie_secure,
            domain: auth.cookie_domain.clone(),
            session_hours: auth.session_hours,
        }
    }

    fn build_cookie_base(
        &self,
        name: &str,
        value: String,
        same_site: SameSite,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        let mut cookie = Cookie::new(name.to_string(), value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(same_site);
        cookie.set_max_age(max_age);
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }

    pub fn build_session_cookie(&self, token: String) -> Cookie<'static> {
        self.build_cookie_base(
            constants::SESSION_COOKIE_NAME,
            token,
            self.same_site,
            actix_web::cookie::time::Duration::hours(self.session_hours as i64),
        )
    }

    pub fn build_expired_session_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(
            constants::SESSION_COOKIE_NAME,
            String::new(),
            self.same_site,
            actix_web::cookie::time::Duration::ZERO,
        )
    }

    /// state cookie 需要在 GitHub 跳回时随顶级导航发送，固定 Lax
    pub fn build_state_cookie(&self, state: String) -> Cookie<'static> {
        self.build_cookie_base(
            constants::STATE_COOKIE_NAME,
            state,
            SameSite::Lax,
            actix_web::cookie::time::Duration::minutes(constants::STATE_COOKIE_MINUTES),
        )
    }

    pub fn build_expired_state_cookie(&self) -> Cookie<'static> {
        self.build_cookie_base(
            constants::STATE_COOKIE_NAME,
            String::new(),
            SameSite::Lax,
            actix_web::cookie::time::Duration::ZERO,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_cutter_maps_status() {
        assert_eq!(
            error_from_cutter(&CutterError::conflict("taken")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_from_cutter(&CutterError::unauthorized("login")).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            error_from_cutter(&CutterError::external_service("github down")).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_success_response() {
        assert_eq!(success_response("ok").status(), StatusCode::OK);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let mut auth = AuthConfig::default();
        auth.cookie_domain = Some("example.com".to_string());
        auth.cookie_same_site = SameSitePolicy::Strict;
        let builder = CookieBuilder::from_auth_config(&auth);

        let cookie = builder.build_session_cookie("token".to_string());
        assert_eq!(cookie.name(), constants::SESSION_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.domain(), Some("example.com"));

        let state = builder.build_state_cookie("s".to_string());
        assert_eq!(state.same_site(), Some(SameSite::Lax));

        let expired = builder.build_expired_session_cookie();
        assert_eq!(
            expired.max_age(),
            Some(actix_web::cookie::time::Duration::ZERO)
        );
    }
}
