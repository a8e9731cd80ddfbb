//! Resilient client for the catalog API, relayed through an ordered proxy list

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::cursor::{CursorPolicy, ProxyCursor, ProxyList};
use super::error::{AttemptError, ClientBuildError, FetchError};
use super::notice::{
    LoadingGuard, LoadingIndicator, NoLoadingIndicator, Notice, Notifier, TracingNotifier,
    SWITCH_NOTICE_DURATION,
};
use super::params::{proxied_url, RequestParams};
use crate::config::Config;

const USER_AGENT: &str = concat!("vod-catalog/", env!("CARGO_PKG_VERSION"));

/// A decoded body whose application code was the success sentinel
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    body: Value,
}

impl ApiResponse {
    pub fn code(&self) -> Option<&Value> {
        self.body.get("code")
    }

    pub fn msg(&self) -> Option<&str> {
        self.body.get("msg").and_then(Value::as_str)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.body)
    }
}

/// Split a decoded body into success or an application error.
///
/// Only a numeric `code` equal to 1 counts as success.
pub fn classify(body: Value) -> Result<ApiResponse, AttemptError> {
    let ok = body
        .get("code")
        .map_or(false, |code| code.is_number() && code.as_f64() == Some(1.0));
    if ok {
        return Ok(ApiResponse { body });
    }

    let message = body.get("msg").map(|m| match m.as_str() {
        Some(s) => s.to_string(),
        None => m.to_string(),
    });
    Err(AttemptError::Application {
        code: body.get("code").cloned(),
        message,
    })
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-attempt deadline; `None` leaves only the connect timeout
    pub attempt_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub cursor_policy: CursorPolicy,
    /// Proxy slot the first call starts from
    pub start_index: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            attempt_timeout: Some(Duration::from_secs(15)),
            connect_timeout: Some(Duration::from_secs(10)),
            cursor_policy: CursorPolicy::default(),
            start_index: 0,
        }
    }
}

impl ClientOptions {
    /// Options from the `[timeouts]` and `[proxies]` sections; a timeout of 0 is disabled
    pub fn from_config(config: &Config) -> Self {
        let seconds = |secs: u64| (secs > 0).then(|| Duration::from_secs(secs));
        Self {
            attempt_timeout: seconds(config.timeouts.attempt_timeout),
            connect_timeout: seconds(config.timeouts.connect_timeout),
            cursor_policy: config.proxies.cursor_policy,
            start_index: 0,
        }
    }
}

#[derive(Clone)]
pub struct ResilientClient {
    http_client: Client,
    base_url: String,
    proxies: ProxyList,
    cursor: ProxyCursor,
    policy: CursorPolicy,
    notifier: Arc<dyn Notifier>,
    indicator: Arc<dyn LoadingIndicator>,
}

impl ResilientClient {
    pub fn new(
        base_url: impl Into<String>,
        proxies: ProxyList,
        options: ClientOptions,
    ) -> Result<Self, ClientBuildError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = options.attempt_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let cursor = ProxyCursor::starting_at(options.start_index, proxies.len());
        tracing::debug!(
            "Fetch client ready: {} proxies, starting at {}",
            proxies.len(),
            proxies.label(cursor.get())
        );

        Ok(Self {
            http_client,
            base_url,
            proxies,
            cursor,
            policy: options.cursor_policy,
            notifier: Arc::new(TracingNotifier),
            indicator: Arc::new(NoLoadingIndicator),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientBuildError> {
        let proxies = ProxyList::new(config.proxies.list.iter().cloned())?;
        Self::new(config.api.base_url.clone(), proxies, ClientOptions::from_config(config))
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_loading_indicator(mut self, indicator: Arc<dyn LoadingIndicator>) -> Self {
        self.indicator = indicator;
        self
    }

    pub fn proxies(&self) -> &ProxyList {
        &self.proxies
    }

    /// Slot the next call will start from
    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    /// GET the API with `params`, walking the proxy list from the cursor until one works.
    ///
    /// Each failed attempt moves the cursor on and emits a "switching" notice; the
    /// last one emits a single error notice instead. `silent` skips the loading
    /// indicator.
    pub async fn fetch_data(
        &self,
        params: &RequestParams,
        silent: bool,
    ) -> Result<ApiResponse, FetchError> {
        let _loading = LoadingGuard::start(self.indicator.as_ref(), silent);

        let target_url = params.target_url(&self.base_url);
        let total = self.proxies.len();
        let start = self.cursor.get();
        let mut last_err: Option<AttemptError> = None;

        for attempt in 0..total {
            let slot = self.cursor.slot(start, attempt);
            let url = proxied_url(self.proxies.get(slot), &target_url);
            tracing::debug!("Fetching via CORS proxy {}: {}", slot + 1, url);

            match self.send(&url).await {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(
                            "Proxy fallback succeeded: {} (attempt {})",
                            self.proxies.label(slot),
                            attempt + 1
                        );
                    }
                    let rest_at = match self.policy {
                        CursorPolicy::StickToLastGood => slot,
                        CursorPolicy::AdvancePastLastGood => self.cursor.slot(slot, 1),
                    };
                    self.cursor.set(rest_at);
                    return Ok(response);
                }
                Err(e) => {
                    tracing::warn!("Fetch error with proxy {}: {}", self.proxies.label(slot), e);

                    let next = self.cursor.slot(slot, 1);
                    self.cursor.set(next);

                    if attempt + 1 == total {
                        self.notifier.notify(&Notice::error(format!(
                            "Failed to fetch data after trying all CORS proxies: {}",
                            e
                        )));
                    } else {
                        self.notifier.notify(
                            &Notice::info(format!("Switching to CORS proxy {}...", next + 1))
                                .with_duration(SWITCH_NOTICE_DURATION),
                        );
                    }
                    last_err = Some(e);
                }
            }
        }

        let last = last_err.unwrap_or_else(|| AttemptError::Transport("no proxy attempted".to_string()));
        tracing::debug!("All {} proxies failed for {}: {}", total, target_url, last);
        Err(FetchError::Exhausted { attempts: total, last })
    }

    /// `fetch_data`, then decode the body into `T`
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        params: &RequestParams,
        silent: bool,
    ) -> Result<T, FetchError> {
        let response = self.fetch_data(params, silent).await?;
        Ok(response.decode()?)
    }

    /// Try one proxy slot once, leaving the cursor alone
    pub async fn probe(
        &self,
        slot: usize,
        params: &RequestParams,
    ) -> Result<Duration, AttemptError> {
        let url = proxied_url(self.proxies.get(slot), &params.target_url(&self.base_url));
        let started = Instant::now();
        self.send(&url).await?;
        Ok(started.elapsed())
    }

    async fn send(&self, url: &str) -> Result<ApiResponse, AttemptError> {
        let response = self.http_client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError::HttpStatus { status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AttemptError::MalformedResponse(e.to_string()))?;

        classify(body)
    }
}
