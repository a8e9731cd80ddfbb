use crate::cli::WatchListCommands;

use super::browse::print_videos;
use super::Context;

pub async fn run(ctx: &Context, command: WatchListCommands) -> anyhow::Result<()> {
    match command {
        WatchListCommands::List => {
            list(ctx).await?;
        }
        WatchListCommands::Add { id } => {
            if ctx.library()?.add_to_watch_list(&id)? {
                println!("Added to watch list");
            } else {
                println!("Already in watch list");
            }
        }
        WatchListCommands::Remove { id } => {
            if ctx.library()?.remove_from_watch_list(&id)? {
                println!("Removed from watch list");
            } else {
                println!("Not in watch list");
            }
        }
        WatchListCommands::Toggle { id } => {
            if ctx.library()?.toggle_watch_list(&id)? {
                println!("Added to watch list");
            } else {
                println!("Removed from watch list");
            }
        }
    }
    Ok(())
}

async fn list(ctx: &Context) -> anyhow::Result<()> {
    let library = ctx.library()?;
    let ids = library.watch_list();

    if ids.is_empty() {
        println!("No videos in your watch list.");
        return Ok(());
    }

    tracing::info!("Loading your watch list...");
    match ctx.api.details(ids, false).await {
        Ok(videos) => print_videos(&videos),
        Err(e) if e.is_exhausted() => println!("Failed to load watch list."),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
