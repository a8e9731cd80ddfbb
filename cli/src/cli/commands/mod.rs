pub mod browse;
pub mod history;
pub mod proxies;
pub mod userdata;
pub mod watchlist;

use std::sync::Arc;

use vod_catalog_core::catalog::CatalogApi;
use vod_catalog_core::config::Config;
use vod_catalog_core::fetch::ResilientClient;
use vod_catalog_core::library::Library;

use super::ui::{ConsoleLoading, ConsoleNotifier};

/// What every command needs: config, the catalog API and access to the library
pub struct Context {
    pub config: Config,
    pub api: CatalogApi,
}

impl Context {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = ResilientClient::from_config(&config)?
            .with_notifier(Arc::new(ConsoleNotifier))
            .with_loading_indicator(Arc::new(ConsoleLoading));

        Ok(Self {
            api: CatalogApi::new(client),
            config,
        })
    }

    pub fn library(&self) -> anyhow::Result<Library> {
        Library::open(&self.config.data_dir())
    }
}
