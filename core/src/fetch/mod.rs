//! Resilient fetch client - walks an ordered list of CORS proxies until the API answers

pub mod client;
pub mod cursor;
pub mod error;
pub mod notice;
pub mod params;

pub use client::{classify, ApiResponse, ClientOptions, ResilientClient};
pub use cursor::{CursorPolicy, ProxyCursor, ProxyList};
pub use error::{AttemptError, ClientBuildError, FetchError};
pub use notice::{LoadingIndicator, NoLoadingIndicator, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use params::{proxied_url, ParamValue, RequestParams};
