pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod policies;
pub mod services;
