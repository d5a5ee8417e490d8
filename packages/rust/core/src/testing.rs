//! Scripted in-memory platform for dispatch tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use sourcebridge_connectors::Credentials;
use sourcebridge_platform::Platform;
use sourcebridge_shared::{DefaultsConfig, Result, SourceBridgeError};

use crate::registry::Dispatcher;

enum Reply {
    Data(Value),
    Reject(String),
}

/// Replies to each operation from a per-operation queue and records calls.
#[derive(Default)]
pub struct ScriptedPlatform {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedPlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful `data` payload for `operation`.
    pub fn reply(&self, operation: &str, data: Value) {
        self.push(operation, Reply::Data(data));
    }

    /// Queue a platform-side rejection for `operation`.
    pub fn reject(&self, operation: &str, message: &str) {
        self.push(operation, Reply::Reject(message.to_string()));
    }

    fn push(&self, operation: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(operation.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, v)| v)
            .collect()
    }
}

#[async_trait]
impl Platform for ScriptedPlatform {
    async fn execute(&self, operation: &str, variables: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((operation.to_string(), variables));
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Data(data)) => Ok(data),
            Some(Reply::Reject(message)) => Err(SourceBridgeError::Remote(message)),
            None => Err(SourceBridgeError::Remote(format!(
                "no scripted reply for {operation}"
            ))),
        }
    }
}

/// Fixed "now" for dispatch tests: 2026-04-01T12:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 1, 12, 0, 0).unwrap()
}

pub fn dispatcher(platform: Arc<ScriptedPlatform>, credentials: Credentials) -> Dispatcher {
    Dispatcher::new(platform, credentials, DefaultsConfig::default()).with_clock(fixed_now)
}

pub fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
