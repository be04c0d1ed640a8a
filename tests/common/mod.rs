//! In-process stand-in for the remote news service, served with axum on an
//! ephemeral port.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use newsguru::Config;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Records {
    items: BTreeMap<i64, Value>,
    next_id: i64,
    list_requests: usize,
    item_requests: usize,
    posted: Vec<Value>,
}

/// Shared handle to the fake service's state.
#[derive(Clone, Default)]
pub struct FakeNewsService {
    records: Arc<Mutex<Records>>,
    list_delay: Duration,
}

impl FakeNewsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds every list response back by `delay`.
    pub fn with_list_delay(delay: Duration) -> Self {
        Self {
            list_delay: delay,
            ..Self::default()
        }
    }

    pub fn seed(&self, title: &str, category: &str) -> i64 {
        let mut records = self.records.lock().unwrap();
        records.next_id += 1;
        let id = records.next_id;
        records.items.insert(
            id,
            json!({
                "news_id": id,
                "title": title,
                "body": format!("{} body text that is long enough.", title),
                "author_name": "Jane Doe",
                "category": category,
                "published_at": "2024-05-01T09:30:00.000Z",
                "updated_at": "2024-05-01T09:30:00.000Z",
            }),
        );
        id
    }

    pub fn list_requests(&self) -> usize {
        self.records.lock().unwrap().list_requests
    }

    pub fn item_requests(&self) -> usize {
        self.records.lock().unwrap().item_requests
    }

    pub fn last_posted(&self) -> Option<Value> {
        self.records.lock().unwrap().posted.last().cloned()
    }

    /// Starts serving and returns the base URL.
    pub async fn spawn(&self) -> String {
        init_logging();
        let router = Router::new()
            .route("/news", get(list_news).post(create_news))
            .route("/news/:id", get(get_news).delete(delete_news))
            .with_state(self.clone());
        serve(router).await
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Serves `router` on 127.0.0.1 with an OS-assigned port.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Test configuration pointing at `base_url`.
pub fn config_for(base_url: &str) -> Config {
    let mut config = Config::test_default();
    config.api_url = base_url.to_string();
    config
}

async fn list_news(State(service): State<FakeNewsService>) -> Json<Vec<Value>> {
    let items = {
        let mut records = service.records.lock().unwrap();
        records.list_requests += 1;
        records.items.values().cloned().collect()
    };
    if !service.list_delay.is_zero() {
        tokio::time::sleep(service.list_delay).await;
    }
    Json(items)
}

async fn get_news(
    State(service): State<FakeNewsService>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut records = service.records.lock().unwrap();
    records.item_requests += 1;
    records
        .items
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(json!({ "error": "News not found" }))))
}

async fn create_news(
    State(service): State<FakeNewsService>,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut records = service.records.lock().unwrap();
    records.posted.push(body.clone());
    records.next_id += 1;
    let id = records.next_id;
    body["news_id"] = json!(id);
    records.items.insert(id, body);
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "News created successfully" })),
    )
}

async fn delete_news(
    State(service): State<FakeNewsService>,
    Path(id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    let mut records = service.records.lock().unwrap();
    match records.items.remove(&id) {
        Some(_) => (StatusCode::OK, Json(json!({ "message": "News deleted successfully" }))),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "News not found" }))),
    }
}
