//! Video catalog: listings, search, details

pub mod api;
pub mod models;

pub use api::{detail_params, list_params, CatalogApi, Pager};
pub use models::{normalize_image_url, Category, Episode, Vod, VodPage};
