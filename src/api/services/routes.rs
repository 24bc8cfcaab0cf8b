//! 路由配置

use actix_web::web;

use crate::api::constants::GITHUB_CALLBACK_PATH;

use super::auth::{callback_get, callback_post, challenge, logout};
use super::health::health_routes;
use super::links::{block_link, create_link, disable_link, enable_link};
use super::redirect::redirect_routes;

/// 链接管理路由
///
/// - POST /create
/// - DELETE /disable/{name}
/// - PUT /enable/{name}
/// - DELETE /block/{name}
pub fn link_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/create", web::post().to(create_link))
        .route("/disable/{name}", web::delete().to(disable_link))
        .route("/enable/{name}", web::put().to(enable_link))
        .route("/block/{name}", web::delete().to(block_link));
}

/// 认证路由
pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/challenge", web::get().to(challenge))
        .route(GITHUB_CALLBACK_PATH, web::get().to(callback_get))
        .route(GITHUB_CALLBACK_PATH, web::post().to(callback_post))
        .route("/logout", web::get().to(logout));
}

/// 注册全部路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_routes())
        .service(redirect_routes())
        .configure(link_routes)
        .configure(auth_routes);
}
