pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20240418_000001_users_and_links;
mod m20240518_000001_user_roles;

pub use m20240418_000001_users_and_links::{LEGACY_USER_ID, LEGACY_USERNAME};
pub use m20240518_000001_user_roles::ADMIN_ROLE_NAME;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240418_000001_users_and_links::Migration),
            Box::new(m20240518_000001_user_roles::Migration),
        ]
    }
}
