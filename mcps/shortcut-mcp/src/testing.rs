//! Test doubles: scripted transport, manual clock and reference fixtures

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};

use crate::cache::{Clock, ReferenceCache};
use crate::config::Config;
use crate::handlers::ShortcutService;
use crate::shortcut::{ApiClient, RawResponse, ShortcutResult, Transport};
use crate::types::{Member, Workflow};

pub fn raw(status: u16, body: &str) -> RawResponse {
    RawResponse {
        status,
        retry_after: None,
        body: body.to_string(),
    }
}

pub fn json_response(status: u16, body: Value) -> RawResponse {
    raw(status, &body.to_string())
}

impl RawResponse {
    pub fn with_retry_after(mut self, value: &str) -> Self {
        self.retry_after = Some(value.to_string());
        self
    }
}

/// A request as seen by [`MockTransport`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

/// Transport answering from per-route response queues
///
/// Responses for a route are consumed in order; the last one repeats.
/// Routes are matched on the full path first, then on the path without
/// its query string. Unknown routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(String, String), VecDeque<RawResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, path: &str, response: RawResponse) {
        self.routes
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn respond_json(&self, method: &str, path: &str, body: Value) {
        self.respond(method, path, json_response(200, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn count_for(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Requests other than GET
    pub fn mutations(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }

    fn next_response(&self, method: &str, path: &str) -> RawResponse {
        let mut routes = self.routes.lock().unwrap();
        let bare = path.split('?').next().unwrap_or(path);

        let key = [path, bare]
            .into_iter()
            .map(|p| (method.to_string(), p.to_string()))
            .find(|k| routes.contains_key(k));
        let Some(key) = key else {
            return raw(404, "Resource not found");
        };
        let Some(queue) = routes.get_mut(&key) else {
            return raw(404, "Resource not found");
        };

        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| raw(500, "empty queue"))
        } else {
            queue.front().cloned().unwrap_or_else(|| raw(500, "empty queue"))
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ShortcutResult<RawResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.as_str().to_string(),
            path: path.to_string(),
            body: body.cloned(),
        });
        Ok(self.next_response(method.as_str(), path))
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

/// Two workflows; the first state of type `unstarted` in the first is 500001
pub fn workflows_fixture() -> Value {
    json!([
        {
            "id": 500000,
            "name": "Engineering",
            "states": [
                {"id": 500010, "name": "Unscheduled", "type": "backlog"},
                {"id": 500001, "name": "Ready for Development", "type": "unstarted"},
                {"id": 500002, "name": "In Progress", "type": "started"},
                {"id": 500003, "name": "Ready for Review", "type": "started"},
                {"id": 500004, "name": "Done", "type": "done"}
            ]
        },
        {
            "id": 600000,
            "name": "Design",
            "states": [
                {"id": 600001, "name": "To Do", "type": "unstarted"},
                {"id": 600002, "name": "Designing", "type": "started"},
                {"id": 600003, "name": "Shipped", "type": "done"}
            ]
        }
    ])
}

pub fn members_fixture() -> Value {
    json!([
        {"id": "m-ada", "profile": {"name": "Ada Lovelace", "mention_name": "ada"}},
        {"id": "m-grace", "profile": {"name": "Grace Hopper", "mention_name": "grace"}},
        {"id": "m-linus", "profile": {"name": "Linus T", "mention_name": "lt"}}
    ])
}

pub fn current_member_fixture() -> Value {
    json!({"id": "m-grace", "name": "Grace Hopper", "mention_name": "grace"})
}

/// Transport pre-loaded with the reference fixtures
pub fn reference_transport() -> Arc<MockTransport> {
    let transport = Arc::new(MockTransport::new());
    transport.respond_json("GET", "/workflows", workflows_fixture());
    transport.respond_json("GET", "/members", members_fixture());
    transport.respond_json("GET", "/member", current_member_fixture());
    transport
}

/// Service wired to the given transport with default config
pub fn service(transport: &Arc<MockTransport>) -> ShortcutService {
    let config = Config::default();
    let client = ApiClient::new(transport.clone(), &config.rate_limit);
    let cache = ReferenceCache::with_clock(
        client.clone(),
        Duration::from_secs(config.cache.ttl_seconds),
        Arc::new(ManualClock::new()),
    );
    ShortcutService::new(client, cache, config.search.limit)
}

/// Reference cache backed by the fixture transport
pub fn fixture_cache() -> (Arc<MockTransport>, ReferenceCache) {
    let transport = reference_transport();
    let client = ApiClient::new(transport.clone(), &Config::default().rate_limit);
    let cache = ReferenceCache::with_clock(
        client,
        Duration::from_secs(300),
        Arc::new(ManualClock::new()),
    );
    (transport, cache)
}

pub fn workflows() -> Vec<Workflow> {
    serde_json::from_value(workflows_fixture()).unwrap()
}

pub fn members() -> Vec<Member> {
    serde_json::from_value(members_fixture()).unwrap()
}
