// In-memory stand-in for the encryption service
//
// Responses are canned per path as JSON values and decoded through serde the
// same way the HTTP client decodes real bodies. Every call is recorded.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::api::{ApiError, CryptoService};

#[derive(Default)]
pub(crate) struct StubService {
    responses: HashMap<&'static str, Result<Value, ApiError>>,
    probe_result: Option<Result<(), ApiError>>,
    panic_on: Option<&'static str>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl StubService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &'static str, response: Result<Value, ApiError>) -> Self {
        self.responses.insert(path, response);
        self
    }

    pub fn probe_with(mut self, result: Result<(), ApiError>) -> Self {
        self.probe_result = Some(result);
        self
    }

    /// Make POSTs to `path` panic instead of answering
    pub fn panic_on(mut self, path: &'static str) -> Self {
        self.panic_on = Some(path);
        self
    }

    /// (path, JSON body) of every POST so far
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

impl CryptoService for StubService {
    async fn post<B, R>(&self, path: &'static str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Transport(e.to_string()))?;
        self.calls.lock().unwrap().push((path.to_string(), body));
        if self.panic_on == Some(path) {
            panic!("stub service panicked on {}", path);
        }

        let response = self
            .responses
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Transport(format!("no stub for {}", path))))?;
        serde_json::from_value(response).map_err(|e| ApiError::Transport(e.to_string()))
    }

    async fn probe(&self) -> Result<(), ApiError> {
        self.probe_result
            .clone()
            .unwrap_or_else(|| Err(ApiError::Transport("no probe stub".to_string())))
    }
}
