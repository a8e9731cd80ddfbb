use std::path::Path;

use super::browse::format_seconds;
use super::Context;

pub fn watched(ctx: &Context, id: &str, episode: &str) -> anyhow::Result<()> {
    ctx.library()?.mark_episode_watched(id, episode)?;
    println!("Marked {} / {} as watched", id, episode);
    Ok(())
}

pub fn position(
    ctx: &Context,
    id: &str,
    episode: &str,
    set: Option<f64>,
    duration: Option<f64>,
) -> anyhow::Result<()> {
    let mut library = ctx.library()?;

    if let Some(time) = set {
        if library.save_position(id, episode, time, duration)? {
            println!("Saved position {} for {} / {}", format_seconds(time), id, episode);
        } else {
            println!("Position {} is too close to the start or end, not saved", format_seconds(time));
        }
        return Ok(());
    }

    let resume = library.resume_position(id, episode, duration);
    if resume > 0.0 {
        println!("Resume {} / {} at {} ({:.1}s)", id, episode, format_seconds(resume), resume);
    } else {
        println!("{} / {} starts from the beginning", id, episode);
    }
    Ok(())
}

pub fn export(ctx: &Context, path: &Path) -> anyhow::Result<()> {
    ctx.library()?.export_to(path)?;
    println!("All user data exported to {:?}", path);
    Ok(())
}

pub fn import(ctx: &Context, path: &Path) -> anyhow::Result<()> {
    ctx.library()?.import_from(path)?;
    println!("All user data imported!");
    Ok(())
}
