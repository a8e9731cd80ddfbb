use std::collections::HashMap;

use super::Context;

pub async fn run(ctx: &Context, limit: usize) -> anyhow::Result<()> {
    let library = ctx.library()?;
    let history = library.recent_history(limit);

    if history.is_empty() {
        println!("No watch history yet.");
        return Ok(());
    }

    // Titles are a nice-to-have: fetch quietly and fall back to ids
    let mut ids: Vec<&str> = Vec::new();
    for entry in &history {
        if !ids.contains(&entry.video_id.as_str()) {
            ids.push(&entry.video_id);
        }
    }
    let titles: HashMap<String, String> = match ctx.api.details(&ids, true).await {
        Ok(videos) => videos
            .into_iter()
            .map(|v| (v.vod_id.clone(), v.title().to_string()))
            .collect(),
        Err(e) => {
            tracing::debug!("History titles unavailable: {}", e);
            HashMap::new()
        }
    };

    println!("{:<20} {:<36} {:<16}", "WHEN", "VIDEO", "EPISODE");
    println!("{}", "-".repeat(74));
    for entry in history {
        let when = entry
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let video = titles
            .get(&entry.video_id)
            .cloned()
            .unwrap_or_else(|| entry.video_id.clone());
        println!("{:<20} {:<36} {:<16}", when, video, entry.episode_name);
    }

    if library.history_len() > limit {
        println!("\nOnly the latest {} entries are shown.", limit);
    }
    Ok(())
}
