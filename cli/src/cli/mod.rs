pub mod commands;
pub mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vod-catalog")]
#[command(author, version, about = "Browse a video catalog API through a chain of CORS proxies")]
pub struct Cli {
    /// Path to config file (checked in order: local config.toml, ~/.config/vod-catalog/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List categories
    Categories,

    /// List videos, optionally within a category
    List {
        /// Category ID
        #[arg(short = 't', long)]
        category: Option<String>,

        /// First page to fetch
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// How many pages to follow
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Search videos by name
    Search {
        term: String,

        /// First page to fetch
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// How many pages to follow
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Show a video with its episodes
    Detail {
        id: String,
    },

    /// Manage the watch list
    Watchlist {
        #[command(subcommand)]
        command: WatchListCommands,
    },

    /// Show watch history, latest first
    History {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Mark an episode as watched
    Watched {
        id: String,
        episode: String,
    },

    /// Show or save the resume position of an episode
    Position {
        id: String,
        episode: String,

        /// Playback time in seconds to save
        #[arg(long)]
        set: Option<f64>,

        /// Episode duration in seconds, if known
        #[arg(long)]
        duration: Option<f64>,
    },

    /// Export watch list, watched episodes and positions to a JSON file
    Export {
        path: PathBuf,
    },

    /// Import user data from a JSON file
    Import {
        path: PathBuf,
    },

    /// Show configured proxies and probe each one
    Proxies,
}

#[derive(Subcommand)]
pub enum WatchListCommands {
    /// List saved videos
    List,

    /// Add a video
    Add {
        id: String,
    },

    /// Remove a video
    Remove {
        id: String,
    },

    /// Add if missing, remove if present
    Toggle {
        id: String,
    },
}
