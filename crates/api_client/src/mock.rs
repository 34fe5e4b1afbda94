//! Scripted transport for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, Method, RawResponse, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Respond { response: RawResponse, delay: Option<Duration> },
    Fail(String),
}

/// Answers requests from per-route queues keyed by method and URL path.
///
/// The last reply queued for a route is sticky. Unscripted routes answer 404
/// with an empty body. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<String>) -> &Self {
        self.push(
            method,
            path,
            Reply::Respond { response: RawResponse::new(status, body), delay: None },
        )
    }

    /// Like [`respond`](Self::respond), but the answer arrives after `delay`.
    pub fn respond_after(
        &self,
        delay: Duration,
        method: Method,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) -> &Self {
        self.push(
            method,
            path,
            Reply::Respond { response: RawResponse::new(status, body), delay: Some(delay) },
        )
    }

    /// The route fails before any HTTP status is seen.
    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(method, path, Reply::Fail(message.to_string()))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<Reply> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let queue = routes.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let key_path = request.url.path().to_string();
        let method = request.method;
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        match self.next_reply(method, &key_path) {
            None => Ok(RawResponse::new(404, "")),
            Some(Reply::Fail(message)) => Err(ClientError::Network(message)),
            Some(Reply::Respond { response, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
        }
    }
}
