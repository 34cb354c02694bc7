//! In-memory dispatcher for service tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use wxwork_domain::{Result, WxWorkError};

use crate::ports::{ApiDispatcher, HttpMethod};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedBody {
    None,
    Json(Value),
    File { name: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RecordedBody,
}

/// Replays queued responses and records what was sent
#[derive(Default)]
pub struct ScriptedDispatcher {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
    invalidations: AtomicUsize,
}

impl ScriptedDispatcher {
    pub fn replying(responses: impl IntoIterator<Item = Result<Value>>) -> Self {
        Self { responses: Mutex::new(responses.into_iter().collect()), ..Self::default() }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }

    fn record(&self, method: HttpMethod, path: &str, query: &[(&str, &str)], body: RecordedBody) -> Result<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            query: query.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(WxWorkError::Network("no scripted response".into())))
    }
}

#[async_trait]
impl ApiDispatcher for ScriptedDispatcher {
    async fn send_json(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let body = body.cloned().map_or(RecordedBody::None, RecordedBody::Json);
        self.record(method, path, query, body)
    }

    async fn send_multipart(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        file_bytes: &[u8],
        file_name: &str,
    ) -> Result<Value> {
        let body = RecordedBody::File { name: file_name.to_string(), bytes: file_bytes.to_vec() };
        self.record(method, path, query, body)
    }

    async fn invalidate_token(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}
