//! User administration commands

use colored::Colorize;

use crate::api::policies::ADMIN_ROLE;
use crate::interfaces::cli::CliError;
use crate::services::UserService;

pub async fn block_user(users: &UserService, id: u32) -> Result<(), CliError> {
    let user = users.disable(id).await?;
    println!(
        "{} Blocked user {} ({})",
        "✓".bold().green(),
        user.username.cyan(),
        user.id
    );
    Ok(())
}

pub async fn grant_admin(users: &UserService, id: u32) -> Result<(), CliError> {
    let user = users.grant_role(id, ADMIN_ROLE).await?;
    println!(
        "{} {} ({}) now has roles: {}",
        "✓".bold().green(),
        user.username.cyan(),
        user.id,
        user.role_names().join(", ").yellow()
    );
    Ok(())
}
