//! Link management endpoints

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

use crate::api::middleware::session::current_principal;
use crate::api::policies::{account_enabled, require_admin, require_own_links};
use crate::errors::{CutterError, Result};
use crate::services::{CreateLinkRequest, LinkService, UserService};
use crate::storage::Link;
use crate::utils::ip::extract_client_ip;

use super::error_code::ErrorCode;
use super::helpers::{TrustedProxies, error_from_cutter, json_response, success_response};
use super::types::{CreateLinkQuery, LinkResponse};

fn to_response(links: &LinkService, link: Link) -> Result<LinkResponse> {
    let public_uri = links.build_public_uri(&link)?.to_string();
    Ok(LinkResponse { link, public_uri })
}

/// POST /create?name=&destination=
pub async fn create_link(
    req: HttpRequest,
    query: web::Query<CreateLinkQuery>,
    links: web::Data<LinkService>,
    users: web::Data<UserService>,
    proxies: web::Data<TrustedProxies>,
) -> HttpResponse {
    let principal = current_principal(&req);
    let user = match account_enabled(principal.as_ref(), &users).await {
        Ok(user) => user,
        Err(e) => return error_from_cutter(&e),
    };

    let query = query.into_inner();
    let request_ip = extract_client_ip(&req, &proxies.0);

    let result = links
        .create(
            CreateLinkRequest {
                name: query.name,
                destination: query.destination.unwrap_or_default(),
            },
            &user,
            request_ip,
        )
        .await;

    let created = match result {
        Ok(created) => created,
        Err(e) => return error_from_cutter(&e),
    };

    let location = format!("/go/{}", created.link.name);
    let deduplicated = created.deduplicated;
    let body = match to_response(&links, created.link) {
        Ok(body) => body,
        Err(e) => return error_from_cutter(&e),
    };

    if deduplicated {
        json_response(
            StatusCode::OK,
            ErrorCode::Success,
            "Destination already shortened",
            Some(body),
        )
    } else {
        let mut response = json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(body));
        if let Ok(value) = actix_web::http::header::HeaderValue::from_str(&location) {
            response
                .headers_mut()
                .insert(actix_web::http::header::LOCATION, value);
        }
        response
    }
}

/// Resolve the session user and the target link, then apply the owner check
async fn authorize_owner(
    req: &HttpRequest,
    name: &str,
    links: &LinkService,
    users: &UserService,
) -> Result<()> {
    let principal = current_principal(req);
    let user = account_enabled(principal.as_ref(), users).await?;

    let link = links
        .resolve(name)
        .await?
        .ok_or_else(|| CutterError::not_found(format!("Link not found: {}", name)))?;

    require_own_links(&user, &link)
}

fn link_result(links: &LinkService, result: Result<Link>) -> HttpResponse {
    match result.and_then(|link| to_response(links, link)) {
        Ok(body) => success_response(body),
        Err(e) => error_from_cutter(&e),
    }
}

/// DELETE /disable/{name}
pub async fn disable_link(
    req: HttpRequest,
    path: web::Path<String>,
    links: web::Data<LinkService>,
    users: web::Data<UserService>,
) -> HttpResponse {
    let name = path.into_inner();
    if let Err(e) = authorize_owner(&req, &name, &links, &users).await {
        return error_from_cutter(&e);
    }
    link_result(&links, links.disable(&name).await)
}

/// PUT /enable/{name}
pub async fn enable_link(
    req: HttpRequest,
    path: web::Path<String>,
    links: web::Data<LinkService>,
    users: web::Data<UserService>,
) -> HttpResponse {
    let name = path.into_inner();
    if let Err(e) = authorize_owner(&req, &name, &links, &users).await {
        return error_from_cutter(&e);
    }
    link_result(&links, links.enable(&name).await)
}

/// DELETE /block/{name}
pub async fn block_link(
    req: HttpRequest,
    path: web::Path<String>,
    links: web::Data<LinkService>,
    users: web::Data<UserService>,
) -> HttpResponse {
    let name = path.into_inner();
    let principal = current_principal(&req);

    let user = match account_enabled(principal.as_ref(), &users).await {
        Ok(user) => user,
        Err(e) => return error_from_cutter(&e),
    };
    if let Err(e) = require_admin(&user) {
        return error_from_cutter(&e);
    }

    info!("Admin {} blocking link '{}'", user.username, name);
    link_result(&links, links.block(&name).await)
}
