//! CLI command implementations

mod config_gen;
mod link_management;
mod user_management;

pub use config_gen::*;
pub use link_management::*;
pub use user_management::*;
