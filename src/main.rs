use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use porssi::config::Config;
use porssi::logging::{get_logger, init_logging};
use porssi::service::PriceService;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "porssi", version = env!("APP_VERSION"), about = "Finnish spot electricity prices")]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true, env = "PORSSI_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch once and print the hourly overview
    Show,
    /// Run the refresh loop and the HTTP API
    Serve,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::from_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display()))?,
        None => Config::load().context("Failed to load config")?,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_logging(&config.logging).map_err(|e| anyhow::anyhow!("Logging init failed: {}", e))?;

    let logger = get_logger("main");
    let service = Arc::new(PriceService::new(config).context("Failed to create price service")?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Show => {
            service.refresh().await?;
            println!("{}", service.overview_text());
            Ok(())
        }
        Command::Serve => {
            logger.info(&format!("Porssi {} starting up", env!("APP_VERSION")));
            let refresher = tokio::spawn(Arc::clone(&service).run());

            #[cfg(feature = "web")]
            {
                let web = service.config().web.clone();
                let result = porssi::web::serve(Arc::clone(&service), &web.host, web.port).await;
                refresher.abort();
                if let Err(e) = &result {
                    logger.error(&format!("Web server error: {}", e));
                }
                result
            }

            #[cfg(not(feature = "web"))]
            {
                refresher.await.context("Refresh loop terminated")?;
                Ok(())
            }
        }
    }
}
