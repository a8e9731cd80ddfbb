//! vod-catalog core library
//! Resilient proxied API client, catalog models and the local user library

pub mod config;
pub mod fetch;
pub mod catalog;
pub mod library;
