//! Remote visit counting.
//!
//! Visit counts live in a Redis-compatible KV store behind an HTTP REST
//! bridge: `GET {base}/incr/{key}` and `GET {base}/get/{key}` with a bearer
//! token, answering `{"result": <integer | string | null>}`. Counter keys
//! are `visits:{subject}:{output}`.
//!
//! The store is strictly best-effort. Every public method returns a plain
//! count and masks transport or payload failures as 0 after logging a
//! warning; a broken counter must never break a build or a page view.
//! Increments are additionally gated to production mode so local builds and
//! dev serving cannot inflate real counters. Reads are not gated.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the KV REST base URL.
pub const URL_ENV: &str = "UPSTASH_REDIS_REST_URL";
/// Environment variable holding the KV REST bearer token.
pub const TOKEN_ENV: &str = "UPSTASH_REDIS_REST_TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ViewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected KV payload: {0}")]
    Payload(String),
}

/// Reply shape of the KV REST bridge.
#[derive(Deserialize)]
struct KvReply {
    result: Option<serde_json::Value>,
}

struct Endpoint {
    base_url: String,
    token: String,
}

/// Client for the remote visit counter.
pub struct VisitStore {
    endpoint: Option<Endpoint>,
    production: bool,
    client: reqwest::blocking::Client,
}

impl VisitStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, production: bool) -> Self {
        Self {
            endpoint: Some(Endpoint {
                base_url: base_url.into(),
                token: token.into(),
            }),
            production,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Build a store from `UPSTASH_REDIS_REST_URL` / `UPSTASH_REDIS_REST_TOKEN`.
    ///
    /// When either variable is missing the store still works, answering 0
    /// for every count.
    pub fn from_env(production: bool) -> Self {
        match (std::env::var(URL_ENV), std::env::var(TOKEN_ENV)) {
            (Ok(base_url), Ok(token)) => Self::new(base_url, token, production),
            _ => {
                if production {
                    eprintln!(
                        "Warning: {URL_ENV} / {TOKEN_ENV} not set, visit counting is disabled"
                    );
                }
                Self {
                    endpoint: None,
                    production,
                    client: reqwest::blocking::Client::new(),
                }
            }
        }
    }

    /// A store with no endpoint. All counts are 0, nothing is recorded.
    pub fn disabled() -> Self {
        Self {
            endpoint: None,
            production: false,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Record a visit and return the post-increment count.
    ///
    /// Outside production mode this is a no-op returning 0. Store failures
    /// are logged and masked as 0.
    pub fn increment(&self, subject: &str, output: &str) -> u64 {
        if !self.production {
            return 0;
        }
        self.command("incr", &key(subject, output))
            .unwrap_or_else(|err| {
                eprintln!("Warning: visit increment failed for {subject}/{output}: {err}");
                0
            })
    }

    /// Read the current count without recording a visit.
    ///
    /// Not gated to production: a configured store answers real counts even
    /// in dev mode. Store failures are logged and masked as 0.
    pub fn read(&self, subject: &str, output: &str) -> u64 {
        self.command("get", &key(subject, output))
            .unwrap_or_else(|err| {
                eprintln!("Warning: visit lookup failed for {subject}/{output}: {err}");
                0
            })
    }

    fn command(&self, cmd: &str, key: &str) -> Result<u64, ViewsError> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(0);
        };
        // Keys carry ':' and possibly '/' (nested outputs), so they go into
        // the path percent-encoded as a single segment.
        let url = format!(
            "{}/{}/{}",
            endpoint.base_url.trim_end_matches('/'),
            cmd,
            urlencoding::encode(key)
        );
        let reply: KvReply = self
            .client
            .get(&url)
            .bearer_auth(&endpoint.token)
            .timeout(REQUEST_TIMEOUT)
            .send()?
            .error_for_status()?
            .json()?;

        match reply.result {
            None | Some(serde_json::Value::Null) => Ok(0),
            Some(serde_json::Value::Number(n)) => n
                .as_u64()
                .ok_or_else(|| ViewsError::Payload(format!("non-integer count: {n}"))),
            Some(serde_json::Value::String(s)) => s
                .parse()
                .map_err(|_| ViewsError::Payload(format!("non-numeric count: {s:?}"))),
            Some(other) => Err(ViewsError::Payload(other.to_string())),
        }
    }
}

fn key(subject: &str, output: &str) -> String {
    format!("visits:{subject}:{output}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread::{self, JoinHandle};
    use tiny_http::{Response, Server, StatusCode};

    /// In-process stand-in for the KV REST bridge. Answers every request
    /// with a fixed status/body and records (url, authorization) pairs.
    struct MockKv {
        base_url: String,
        requests: Arc<Mutex<Vec<(String, Option<String>)>>>,
        server: Arc<Server>,
        handle: Option<JoinHandle<()>>,
    }

    fn mock_kv(status: u16, body: &'static str) -> MockKv {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    let auth = request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("Authorization"))
                        .map(|h| h.value.as_str().to_string());
                    requests
                        .lock()
                        .unwrap()
                        .push((request.url().to_string(), auth));
                    let response =
                        Response::from_string(body).with_status_code(StatusCode(status));
                    let _ = request.respond(response);
                }
            })
        };
        let addr = server.server_addr().to_ip().unwrap();
        MockKv {
            base_url: format!("http://{addr}"),
            requests,
            server,
            handle: Some(handle),
        }
    }

    impl MockKv {
        fn finish(mut self) -> Vec<(String, Option<String>)> {
            self.server.unblock();
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
            let requests = self.requests.lock().unwrap().clone();
            requests
        }
    }

    #[test]
    fn increment_returns_post_increment_value() {
        let kv = mock_kv(200, r#"{"result": 7}"#);
        let store = VisitStore::new(&kv.base_url, "secret", true);

        assert_eq!(store.increment("cc104", "m-1"), 7);

        let requests = kv.finish();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "/incr/visits%3Acc104%3Am-1");
        assert_eq!(requests[0].1.as_deref(), Some("Bearer secret"));
    }

    #[test]
    fn increment_outside_production_sends_nothing() {
        let kv = mock_kv(200, r#"{"result": 99}"#);
        let store = VisitStore::new(&kv.base_url, "secret", false);

        assert_eq!(store.increment("cc104", "m-1"), 0);
        assert!(kv.finish().is_empty());
    }

    #[test]
    fn read_works_outside_production() {
        let kv = mock_kv(200, r#"{"result": "42"}"#);
        let store = VisitStore::new(&kv.base_url, "secret", false);

        // String results come back from the KV bridge for plain GETs.
        assert_eq!(store.read("cc104", "m-1"), 42);

        let requests = kv.finish();
        assert_eq!(requests[0].0, "/get/visits%3Acc104%3Am-1");
    }

    #[test]
    fn missing_counter_reads_as_zero() {
        let kv = mock_kv(200, r#"{"result": null}"#);
        let store = VisitStore::new(&kv.base_url, "secret", false);

        assert_eq!(store.read("cc104", "m-1"), 0);
        kv.finish();
    }

    #[test]
    fn http_failure_is_masked_as_zero() {
        let kv = mock_kv(500, "boom");
        let store = VisitStore::new(&kv.base_url, "secret", true);

        assert_eq!(store.increment("cc104", "m-1"), 0);
        assert_eq!(store.read("cc104", "m-1"), 0);
        kv.finish();
    }

    #[test]
    fn garbage_payload_is_masked_as_zero() {
        let kv = mock_kv(200, "this is not json");
        let store = VisitStore::new(&kv.base_url, "secret", false);

        assert_eq!(store.read("cc104", "m-1"), 0);
        kv.finish();
    }

    #[test]
    fn unexpected_result_type_is_masked_as_zero() {
        let kv = mock_kv(200, r#"{"result": [1, 2]}"#);
        let store = VisitStore::new(&kv.base_url, "secret", false);

        assert_eq!(store.read("cc104", "m-1"), 0);
        kv.finish();
    }

    #[test]
    fn disabled_store_answers_zero() {
        let store = VisitStore::disabled();
        assert_eq!(store.read("cc104", "m-1"), 0);
        assert_eq!(store.increment("cc104", "m-1"), 0);
    }

    #[test]
    fn nested_output_key_is_a_single_path_segment() {
        let kv = mock_kv(200, r#"{"result": 1}"#);
        let store = VisitStore::new(&kv.base_url, "secret", false);

        store.read("cc104", "modules/sql-basics");

        let requests = kv.finish();
        assert_eq!(requests[0].0, "/get/visits%3Acc104%3Amodules%2Fsql-basics");
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let kv = mock_kv(200, r#"{"result": 1}"#);
        let store = VisitStore::new(format!("{}/", kv.base_url), "secret", false);

        store.read("cc104", "m-1");

        let requests = kv.finish();
        assert_eq!(requests[0].0, "/get/visits%3Acc104%3Am-1");
    }

    #[test]
    fn repeated_increments_are_monotonic() {
        // Stateful mock: the counter advances on every incr request.
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let handle = {
            let server = Arc::clone(&server);
            thread::spawn(move || {
                let mut count = 0u64;
                for request in server.incoming_requests() {
                    if request.url().starts_with("/incr/") {
                        count += 1;
                    }
                    let body = format!(r#"{{"result": {count}}}"#);
                    let _ = request.respond(Response::from_string(body));
                }
            })
        };
        let addr = server.server_addr().to_ip().unwrap();
        let store = VisitStore::new(format!("http://{addr}"), "secret", true);

        assert_eq!(store.increment("cc104", "m-1"), 1);
        assert_eq!(store.increment("cc104", "m-1"), 2);
        assert_eq!(store.increment("cc104", "m-1"), 3);
        assert_eq!(store.read("cc104", "m-1"), 3);

        server.unblock();
        let _ = handle.join();
    }

    #[test]
    fn key_format() {
        assert_eq!(key("cc104", "m-1"), "visits:cc104:m-1");
        assert_eq!(
            key("cc104", "modules/sql-basics"),
            "visits:cc104:modules/sql-basics"
        );
    }
}
