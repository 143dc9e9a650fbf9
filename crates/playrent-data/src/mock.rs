//! Scripted in-memory transport for tests.

use crate::{FetchError, Method, RequestBuilder, Response, Transport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// A scripted reply held by [`MockTransport`].
#[derive(Debug, Clone)]
struct Reply {
    delay: Option<Duration>,
    result: Result<Response, FetchError>,
}

/// In-memory transport that replays scripted replies per method and path
/// and records every request it receives.
///
/// Unscripted requests get a 404.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<RequestBuilder>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply.
    pub fn reply<T: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: &T,
    ) -> &Self {
        self.push(method, path, None, Ok(Response::from_json(status, body)))
    }

    /// Queue an empty reply.
    pub fn reply_empty(&self, method: Method, path: &str, status: u16) -> &Self {
        self.push(
            method,
            path,
            None,
            Ok(Response::new(status, HashMap::new(), Vec::new())),
        )
    }

    /// Queue a JSON reply delivered after a delay.
    pub fn reply_after<T: serde::Serialize>(
        &self,
        delay: Duration,
        method: Method,
        path: &str,
        status: u16,
        body: &T,
    ) -> &Self {
        self.push(method, path, Some(delay), Ok(Response::from_json(status, body)))
    }

    /// Queue a transport failure.
    pub fn fail(&self, method: Method, path: &str, error: FetchError) -> &Self {
        self.push(method, path, None, Err(error))
    }

    /// Queue a transport failure delivered after a delay.
    pub fn fail_after(
        &self,
        delay: Duration,
        method: Method,
        path: &str,
        error: FetchError,
    ) -> &Self {
        self.push(method, path, Some(delay), Err(error))
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RequestBuilder> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of requests received for a method and path.
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path() == path)
            .count()
    }

    fn push(
        &self,
        method: Method,
        path: &str,
        delay: Option<Duration>,
        result: Result<Response, FetchError>,
    ) -> &Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies
                .entry((method, path.to_string()))
                .or_default()
                .push_back(Reply { delay, result });
        }
        self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let key = (request.method, request.path().to_string());
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.get_mut(&key).and_then(|q| q.pop_front()));

        match reply {
            Some(reply) => {
                if let Some(delay) = reply.delay {
                    tokio::time::sleep(delay).await;
                }
                reply.result
            }
            None => Ok(Response::new(404, HashMap::new(), b"not scripted".to_vec())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(path: &str) -> RequestBuilder {
        RequestBuilder::parse(Method::Get, &format!("http://store.test{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockTransport::new();
        mock.reply(Method::Get, "/api/cart", 200, &serde_json::json!({ "n": 1 }))
            .reply(Method::Get, "/api/cart", 200, &serde_json::json!({ "n": 2 }));

        let first = mock.send(get("/api/cart")).await.unwrap();
        let second = mock.send(get("/api/cart")).await.unwrap();
        assert_eq!(first.json::<serde_json::Value>().unwrap()["n"], 1);
        assert_eq!(second.json::<serde_json::Value>().unwrap()["n"], 2);
        assert_eq!(mock.count(Method::Get, "/api/cart"), 2);
    }

    #[tokio::test]
    async fn test_mock_unscripted_is_404() {
        let mock = MockTransport::new();
        let response = mock.send(get("/api/orders")).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockTransport::new();
        mock.fail(Method::Get, "/api/cart", FetchError::Timeout);
        assert_eq!(mock.send(get("/api/cart")).await, Err(FetchError::Timeout));
    }
}
