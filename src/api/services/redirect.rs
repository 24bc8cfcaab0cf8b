use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error, trace};

use crate::services::{LinkService, RedirectDecision};
use crate::utils::is_valid_link_name;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        links: web::Data<LinkService>,
    ) -> impl Responder {
        let name = path.into_inner();

        if !is_valid_link_name(&name) {
            trace!("Invalid link name rejected: {}", name);
            return Self::plain_response(StatusCode::NOT_FOUND, "Not Found");
        }

        match links.redirect_decision(&name).await {
            Ok(RedirectDecision::Redirect(destination)) => {
                trace!("Redirecting {} -> {}", name, destination);
                HttpResponse::MovedPermanently()
                    .insert_header(("Location", destination))
                    .finish()
            }
            Ok(RedirectDecision::NotFound) => {
                debug!("Link not found or disabled: {}", name);
                Self::plain_response(StatusCode::NOT_FOUND, "Not Found")
            }
            Ok(RedirectDecision::Gone) => {
                debug!("Link blocked: {}", name);
                Self::plain_response(StatusCode::GONE, "Gone")
            }
            Err(e) => {
                error!("Database error during redirect lookup: {}", e);
                Self::plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    #[inline]
    fn plain_response(status: StatusCode, body: &'static str) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body(body)
    }
}

/// 重定向路由 `/go/{name}`
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("/go")
        .route("/{name}", web::get().to(RedirectService::handle_redirect))
        .route("/{name}", web::head().to(RedirectService::handle_redirect))
}
