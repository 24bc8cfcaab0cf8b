pub mod auth;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod links;
pub mod redirect;
pub mod routes;
pub mod types;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{CookieBuilder, TrustedProxies};
pub use redirect::{RedirectService, redirect_routes};
pub use routes::configure;
pub use types::{ApiResponse, LinkResponse};
