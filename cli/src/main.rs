use clap::Parser;

mod cli;

use cli::{Cli, Commands};
use vod_catalog_core::config::load_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.clone())?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("vod_catalog={}", config.logging.level).parse()?)
                .add_directive(format!("vod_catalog_core={}", config.logging.level).parse()?)
        )
        .init();

    let ctx = cli::commands::Context::new(config)?;

    match cli.command {
        Commands::Categories => {
            cli::commands::browse::categories(&ctx).await?;
        }
        Commands::List { category, page, pages } => {
            cli::commands::browse::list(&ctx, category.as_deref(), page, pages).await?;
        }
        Commands::Search { term, page, pages } => {
            cli::commands::browse::search(&ctx, &term, page, pages).await?;
        }
        Commands::Detail { id } => {
            cli::commands::browse::detail(&ctx, &id).await?;
        }
        Commands::Watchlist { command } => {
            cli::commands::watchlist::run(&ctx, command).await?;
        }
        Commands::History { limit } => {
            cli::commands::history::run(&ctx, limit).await?;
        }
        Commands::Watched { id, episode } => {
            cli::commands::userdata::watched(&ctx, &id, &episode)?;
        }
        Commands::Position { id, episode, set, duration } => {
            cli::commands::userdata::position(&ctx, &id, &episode, set, duration)?;
        }
        Commands::Export { path } => {
            cli::commands::userdata::export(&ctx, &path)?;
        }
        Commands::Import { path } => {
            cli::commands::userdata::import(&ctx, &path)?;
        }
        Commands::Proxies => {
            cli::commands::proxies::run(&ctx).await?;
        }
    }

    Ok(())
}
