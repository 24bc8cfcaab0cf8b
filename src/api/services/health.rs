use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::storage::SeaOrmStorage;

use super::error_code::ErrorCode;
use super::helpers::json_response;
use super::types::{HealthDatabaseCheck, HealthResponse};

/// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl Default for AppStartTime {
    fn default() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let backend = storage.backend_name().to_string();

        let database = match tokio::time::timeout(Duration::from_secs(5), storage.count_links()).await
        {
            Ok(Ok(count)) => HealthDatabaseCheck {
                status: "healthy".to_string(),
                backend,
                links_count: Some(count),
                error: None,
            },
            Ok(Err(e)) => {
                error!("Database health check failed: {}", e);
                HealthDatabaseCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    links_count: None,
                    error: Some(format!("database error: {}", e)),
                }
            }
            Err(_) => {
                error!("Database health check timeout");
                HealthDatabaseCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    links_count: None,
                    error: Some("timeout".to_string()),
                }
            }
        };

        let healthy = database.status == "healthy";
        let now = chrono::Utc::now();
        let body = HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: now.to_rfc3339(),
            uptime: (now - app_start_time.start_datetime).num_seconds(),
            database,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        if healthy {
            json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(body))
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                Some(body),
            )
        }
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}
