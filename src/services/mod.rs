//! Business logic layer

pub mod identity;
pub mod link_service;
pub mod name_generator;
pub mod user_service;

pub use identity::{GitHubProvider, IdentityClaims, IdentityProvider};
pub use link_service::{CreateLinkRequest, LinkCreateResult, LinkService, RedirectDecision};
pub use name_generator::{NAME_ALPHABET, NAME_LENGTH, NameGenerator};
pub use user_service::UserService;
