use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use marquee_api::{
    api::{create_router, AppState},
    config::Config,
    services::upstream::{QueryParams, TransportError, UpstreamTransport},
};

pub const API_KEY: &str = "test-api-key";

type Reply = Result<Value, TransportError>;

/// In-memory upstream that replays scripted replies and records every call
///
/// Replies for an endpoint are consumed in order; the last one repeats.
/// Unscripted endpoints answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, QueryParams)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, endpoint: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<(String, QueryParams)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<QueryParams> {
        self.calls()
            .into_iter()
            .filter(|(called, _)| called == endpoint)
            .map(|(_, params)| params)
            .collect()
    }
}

#[async_trait::async_trait]
impl UpstreamTransport for ScriptedTransport {
    async fn get(&self, endpoint: &str, params: &QueryParams) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), params.clone()));

        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(endpoint) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Err(TransportError::Status(404)),
        }
    }
}

pub fn test_app(transport: Arc<ScriptedTransport>) -> Router {
    let mut config = Config::with_api_key(API_KEY);
    config.backoff_unit_ms = 0;
    config.image_base_url = "https://img.test/w500".to_string();
    create_router(AppState::new(&config, transport))
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
