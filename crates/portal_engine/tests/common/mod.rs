#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use portal_engine::{ApiError, FailureKind, JobBoardApi};
use serde_json::Value;

pub type Reply = Result<Value, ApiError>;

pub fn failure(kind: FailureKind) -> ApiError {
    ApiError {
        kind,
        message: "scripted".to_string(),
    }
}

/// Scripted backend that counts calls per endpoint.
#[derive(Default)]
pub struct FakeApi {
    replies: Mutex<HashMap<&'static str, Reply>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    pub last_search: Mutex<Vec<(String, String)>>,
    pub delay: Option<Duration>,
    pub applies: AtomicUsize,
}

impl FakeApi {
    pub fn reply(self, endpoint: &'static str, reply: Reply) -> Self {
        self.replies.lock().unwrap().insert(endpoint, reply);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    async fn answer(&self, endpoint: &'static str) -> Reply {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .unwrap_or(Ok(Value::Null))
    }
}

#[async_trait::async_trait]
impl JobBoardApi for FakeApi {
    async fn matches(&self) -> Reply {
        self.answer("matches").await
    }

    async fn search(&self, query: &[(String, String)]) -> Reply {
        *self.last_search.lock().unwrap() = query.to_vec();
        self.answer("search").await
    }

    async fn public_listing(&self) -> Reply {
        self.answer("public").await
    }

    async fn filter_options(&self) -> Reply {
        self.answer("options").await
    }

    async fn my_applications(&self) -> Reply {
        self.answer("applications").await
    }

    async fn apply(&self, _job_id: &str) -> Reply {
        self.applies.fetch_add(1, Ordering::SeqCst);
        self.answer("apply").await
    }
}
