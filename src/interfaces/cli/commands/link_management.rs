//! Link administration commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::LinkService;

pub async fn block_link(links: &LinkService, name: &str) -> Result<(), CliError> {
    let link = links.block(name).await?;
    println!(
        "{} Blocked link {} -> {}",
        "✓".bold().green(),
        link.name.cyan(),
        link.destination.blue().underline()
    );
    Ok(())
}

pub async fn list_user_links(links: &LinkService, user_id: u32) -> Result<(), CliError> {
    let owned = links.list_by_owner(user_id).await?;

    if owned.is_empty() {
        println!("{} No links owned by user {}", "ℹ".bold().blue(), user_id);
        return Ok(());
    }

    println!("{}", format!("Links of user {}:", user_id).bold().green());
    println!();
    for link in &owned {
        let public_uri = links
            .build_public_uri(link)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| link.name.clone());

        let mut info_parts = vec![format!(
            "{} -> {}",
            public_uri.cyan(),
            link.destination.blue().underline()
        )];
        info_parts.push(
            format!("({})", link.created_at.format("%Y-%m-%d %H:%M:%S UTC"))
                .dimmed()
                .to_string(),
        );
        if link.is_blocked {
            info_parts.push("[blocked]".red().to_string());
        } else if link.is_disabled {
            info_parts.push("[disabled]".yellow().to_string());
        }

        println!("  {}", info_parts.join(" "));
    }
    println!();
    println!(
        "{} Total {} links",
        "ℹ".bold().blue(),
        owned.len().to_string().green()
    );
    Ok(())
}
