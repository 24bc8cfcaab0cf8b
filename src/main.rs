use clap::Parser;

use cutter::cli::{Cli, Commands};
use cutter::config::{get_config, init_config};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            let config = get_config();
            let _guard = cutter::system::init_logging(&config.logging)?;
            cutter::runtime::modes::run_server().await
        }
        #[cfg(feature = "cli")]
        Some(cmd) => {
            if let Err(e) = cutter::runtime::modes::run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
        #[cfg(not(feature = "cli"))]
        Some(_) => {
            anyhow::bail!("CLI support is not compiled in; rebuild with --features cli")
        }
    }
}
