//! Shared helpers for fetch client integration tests.
//!
//! A local axum server plays every proxy: the first path segment picks how it
//! behaves, e.g. `http://127.0.0.1:PORT/fail500/?url=...`.

#![allow(dead_code)]

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vod_catalog_core::fetch::{
    ClientOptions, CursorPolicy, LoadingIndicator, Notice, NoticeLevel, Notifier, ProxyList,
    ResilientClient,
};

/// Nothing listens here, so connecting fails straight away
pub const DOWN: &str = "down";

#[derive(Clone, Default)]
pub struct Hits(Arc<Mutex<Vec<(String, String)>>>);

impl Hits {
    /// Behaviors hit so far, in order
    pub fn behaviors(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|(b, _)| b.clone()).collect()
    }

    pub fn queries(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|(_, q)| q.clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn record(&self, behavior: &str, query: Option<String>) {
        self.0
            .lock()
            .unwrap()
            .push((behavior.to_string(), query.unwrap_or_default()));
    }
}

pub struct MockProxies {
    pub addr: SocketAddr,
    pub hits: Hits,
}

impl MockProxies {
    pub async fn start() -> Self {
        let hits = Hits::default();
        let app = Router::new()
            .route("/direct/api.php", get(direct))
            .route("/:behavior/", get(relay))
            .with_state(hits.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, hits }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/direct/api.php", self.addr)
    }

    pub fn prefix(&self, behavior: &str) -> String {
        match behavior {
            DOWN => "http://127.0.0.1:1/?url=".to_string(),
            "" => String::new(),
            other => format!("http://{}/{}/?url=", self.addr, other),
        }
    }

    pub fn proxy_list(&self, behaviors: &[&str]) -> ProxyList {
        ProxyList::new(behaviors.iter().map(|b| self.prefix(b))).unwrap()
    }

    pub fn client(&self, behaviors: &[&str], policy: CursorPolicy) -> ResilientClient {
        self.client_with(behaviors, ClientOptions {
            cursor_policy: policy,
            ..fast_options()
        })
    }

    pub fn client_with(&self, behaviors: &[&str], options: ClientOptions) -> ResilientClient {
        ResilientClient::new(self.base_url(), self.proxy_list(behaviors), options).unwrap()
    }
}

pub fn fast_options() -> ClientOptions {
    ClientOptions {
        attempt_timeout: Some(Duration::from_secs(5)),
        connect_timeout: Some(Duration::from_secs(2)),
        ..ClientOptions::default()
    }
}

async fn relay(
    State(hits): State<Hits>,
    Path(behavior): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    let target = query
        .as_deref()
        .and_then(|q| q.strip_prefix("url="))
        .and_then(|t| urlencoding::decode(t).ok())
        .map(|t| t.into_owned());
    hits.record(&behavior, target.clone());

    match behavior.as_str() {
        "ok" | "ok2" => Json(json!({
            "code": 1,
            "msg": "数据列表",
            "page": 1,
            "pagecount": 3,
            "limit": "20",
            "total": 2,
            "list": [
                {"vod_id": 101, "vod_name": format!("from {}", behavior), "vod_pic": "/upload/101.jpg",
                 "vod_play_url": "第01集$https://cdn.example/101/1.m3u8#第02集$https://cdn.example/101/2.m3u8"},
                {"vod_id": "102", "vod_name": "second"}
            ],
            "class": [
                {"type_id": 16, "type_name": "香港剧"},
                {"type_id": 13, "type_name": null},
                {"type_id": "6", "type_name": "动作片"}
            ]
        }))
        .into_response(),
        "empty" => Json(json!({"code": 1, "msg": "数据列表", "pagecount": 0, "list": []})).into_response(),
        "echo" => Json(json!({"code": 1, "target": target})).into_response(),
        "fail500" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "fail404" => (StatusCode::NOT_FOUND, "nope").into_response(),
        "badjson" => "<html>rate limited</html>".into_response(),
        "apperr" => Json(json!({"code": 0, "msg": "key invalid"})).into_response(),
        "nocode" => Json(json!({"msg": "where is my code", "list": []})).into_response(),
        "strcode" => Json(json!({"code": "1", "list": []})).into_response(),
        "oddshape" => Json(json!({"code": 1, "list": "not a list"})).into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"code": 1, "list": []})).into_response()
        }
        _ => (StatusCode::BAD_REQUEST, "unknown behavior").into_response(),
    }
}

async fn direct(State(hits): State<Hits>, RawQuery(query): RawQuery) -> Json<serde_json::Value> {
    hits.record("direct", query.clone());
    Json(json!({"code": 1, "via": "direct", "query": query}))
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn count(&self, level: NoticeLevel) -> usize {
        self.notices.lock().unwrap().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

#[derive(Default)]
pub struct CountingIndicator {
    pub shown: AtomicUsize,
    pub hidden: AtomicUsize,
}

impl CountingIndicator {
    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    pub fn hidden(&self) -> usize {
        self.hidden.load(Ordering::SeqCst)
    }
}

impl LoadingIndicator for CountingIndicator {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }
}
