use vod_catalog_core::catalog::{Pager, Vod, VodPage};
use vod_catalog_core::fetch::FetchError;

use super::Context;

pub fn print_videos(videos: &[Vod]) {
    println!("{:<10} {:<40} {:<20}", "ID", "TITLE", "REMARKS");
    println!("{}", "-".repeat(72));
    for video in videos {
        println!(
            "{:<10} {:<40} {:<20}",
            video.vod_id,
            video.title(),
            video.vod_remarks.as_deref().unwrap_or("")
        );
    }
}

/// Exhaustion was already announced by the notifier; anything else is a real error
fn fallback(err: FetchError, message: &str) -> anyhow::Result<()> {
    if err.is_exhausted() {
        println!("{}", message);
        Ok(())
    } else {
        Err(err.into())
    }
}

pub async fn categories(ctx: &Context) -> anyhow::Result<()> {
    let categories = match ctx.api.categories().await {
        Ok(categories) => categories,
        Err(e) => return fallback(e, "Could not load categories."),
    };

    println!("{:<8} {}", "ID", "NAME");
    println!("{}", "-".repeat(40));
    for cat in categories {
        println!("{:<8} {}", cat.type_id, cat.type_name.unwrap_or_default());
    }
    Ok(())
}

/// Which listing a paged browse walks
enum Listing<'a> {
    Category(Option<&'a str>),
    Search(&'a str),
}

impl Listing<'_> {
    async fn fetch(&self, ctx: &Context, page: u32) -> Result<VodPage, FetchError> {
        match self {
            Listing::Category(category) => ctx.api.list(page, *category).await,
            Listing::Search(term) => ctx.api.search(term, page).await,
        }
    }

    fn print_empty(&self) {
        match self {
            Listing::Category(_) => println!("No videos found for this category."),
            Listing::Search(term) => println!("No videos found for \"{}\".", term),
        }
    }
}

/// Print up to `pages` pages of a listing, following the pager from `first_page`
async fn browse(ctx: &Context, listing: Listing<'_>, first_page: u32, pages: u32) -> anyhow::Result<()> {
    let mut pager = Pager::new();
    let mut next = Some(first_page.max(1));
    let mut fetched = 0;
    let mut shown = 0;

    while let Some(page_number) = next {
        if fetched >= pages.max(1) {
            break;
        }
        let page = match listing.fetch(ctx, page_number).await {
            Ok(page) => page,
            Err(e) => {
                pager.record_failure();
                if fetched == 0 {
                    return fallback(e, "No videos found or failed to load.");
                }
                return fallback(e, "Failed to load more videos.");
            }
        };

        if fetched == 0 && page.list.is_empty() {
            listing.print_empty();
            return Ok(());
        }

        println!("Page {}/{}", page_number, page.pagecount.max(1));
        print_videos(&page.list);
        shown += page.list.len();
        pager.record(page_number, &page);
        fetched += 1;
        next = pager.next_page();
    }

    if let Listing::Search(term) = listing {
        println!("Found {} video(s) for \"{}\"", shown, term);
    }
    if !pager.has_more() {
        println!("(end of listing)");
    }
    Ok(())
}

pub async fn list(ctx: &Context, category: Option<&str>, first_page: u32, pages: u32) -> anyhow::Result<()> {
    browse(ctx, Listing::Category(category), first_page, pages).await
}

pub async fn search(ctx: &Context, term: &str, first_page: u32, pages: u32) -> anyhow::Result<()> {
    let term = term.trim();
    if term.is_empty() {
        anyhow::bail!("Please enter a search term");
    }

    tracing::info!("Searching for \"{}\"...", term);
    browse(ctx, Listing::Search(term), first_page, pages).await
}

pub async fn detail(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let video = match ctx.api.detail(id).await {
        Ok(Some(video)) => video,
        Ok(None) => {
            println!("Failed to load video details.");
            return Ok(());
        }
        Err(e) => return fallback(e, "Failed to load video details."),
    };
    let library = ctx.library()?;

    let or_na = |v: &Option<String>| v.clone().filter(|s| !s.is_empty()).unwrap_or_else(|| "N/A".to_string());

    println!("\n🎬 {}", video.title());
    println!("{}", "=".repeat(60));
    println!("  Year:      {}", or_na(&video.vod_year));
    println!("  Area:      {}", or_na(&video.vod_area));
    println!("  Language:  {}", or_na(&video.vod_lang));
    println!("  Director:  {}", or_na(&video.vod_director));
    println!("  Actors:    {}", or_na(&video.vod_actor));
    println!("  Remarks:   {}", or_na(&video.vod_remarks));
    println!("  Poster:    {}", video.poster_url().unwrap_or_else(|| "-".to_string()));
    println!(
        "  Watch list: {}",
        if library.in_watch_list(&video.vod_id) { "yes" } else { "no" }
    );
    println!();
    println!("{}", video.vod_content.as_deref().unwrap_or("No description available."));
    println!();

    let episodes = video.episodes();
    if episodes.is_empty() {
        println!("No playback sources available.");
        return Ok(());
    }

    println!("{:<3} {:<20} {:<6} {:>8}  {}", "", "EPISODE", "TYPE", "RESUME", "URL");
    println!("{}", "-".repeat(78));
    for episode in episodes {
        let watched = if library.is_episode_watched(&video.vod_id, &episode.name) { "✓" } else { "" };
        let resume = library.resume_position(&video.vod_id, &episode.name, None);
        let resume = if resume > 0.0 { format_seconds(resume) } else { "-".to_string() };
        println!(
            "{:<3} {:<20} {:<6} {:>8}  {}",
            watched,
            episode.name,
            if episode.is_hls { "hls" } else { "link" },
            resume,
            episode.url
        );
    }
    Ok(())
}

pub fn format_seconds(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
