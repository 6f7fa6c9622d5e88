//! Blocking HTTP exchange abstraction.
//!
//! The session talks to the wire through [`HttpExchange`], which
//! keeps the engine testable ([`RecordingHttp`]) and the concrete
//! client swappable. [`ReqwestHttp`] is the shipping implementation:
//! cookie jar, gzip decoding, split connect/read timeouts.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// A fetched response: the body text plus the names of any cookies
/// the response set (the login exchange inspects them).
#[derive(Debug, Clone, Default)]
pub struct FetchResponse {
    /// Decoded response body.
    pub body: String,
    /// Names of cookies set by the response.
    pub cookie_names: Vec<String>,
}

impl FetchResponse {
    /// Creates a response with a body and no cookies.
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            cookie_names: Vec::new(),
        }
    }

    /// Adds a cookie name.
    pub fn with_cookie(mut self, name: impl Into<String>) -> Self {
        self.cookie_names.push(name.into());
        self
    }
}

/// Blocking HTTP exchange used by the session.
///
/// Errors are plain transport-level messages; the session wraps them
/// into its own failure taxonomy.
pub trait HttpExchange {
    /// Issues a GET request.
    fn get(&self, url: &str) -> Result<FetchResponse, String>;

    /// Issues a form-encoded POST request.
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<FetchResponse, String>;
}

/// One request seen by [`RecordingHttp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// `GET` or `POST`.
    pub method: &'static str,
    /// Request URL.
    pub url: String,
    /// The `r` form payload of a POST, if any.
    pub payload: Option<String>,
}

/// An exchange that replays canned responses and records every
/// request, for tests.
#[derive(Debug, Default)]
pub struct RecordingHttp {
    responses: Mutex<VecDeque<Result<FetchResponse, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingHttp {
    /// Creates an exchange with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn push_response(&self, response: FetchResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queues a successful response with just a body.
    pub fn push_body(&self, body: impl Into<String>) {
        self.push_response(FetchResponse::body(body));
    }

    /// Queues a transport failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Err(message.into()));
    }

    /// Every request made so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The `r` payloads of every POST made so far, parsed as JSON.
    pub fn posted_bodies(&self) -> Vec<serde_json::Value> {
        self.requests()
            .into_iter()
            .filter_map(|request| request.payload)
            .filter_map(|payload| serde_json::from_str(&payload).ok())
            .collect()
    }

    fn next_response(&self) -> Result<FetchResponse, String> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no canned response queued".into()))
    }
}

impl HttpExchange for RecordingHttp {
    fn get(&self, url: &str) -> Result<FetchResponse, String> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: "GET",
            url: url.to_owned(),
            payload: None,
        });
        self.next_response()
    }

    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<FetchResponse, String> {
        let payload = fields
            .iter()
            .find(|(name, _)| *name == "r")
            .map(|(_, value)| (*value).to_owned());
        self.requests.lock().unwrap().push(RecordedRequest {
            method: "POST",
            url: url.to_owned(),
            payload,
        });
        self.next_response()
    }
}

/// The reqwest-backed exchange.
pub struct ReqwestHttp {
    client: reqwest::blocking::Client,
}

impl ReqwestHttp {
    /// Builds a client with a cookie jar and the given timeouts.
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()
            .map_err(|err| err.to_string())?;
        Ok(Self { client })
    }

    fn cookie_names(response: &reqwest::blocking::Response) -> Vec<String> {
        response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| value.split('=').next())
            .map(|name| name.trim().to_owned())
            .collect()
    }
}

impl HttpExchange for ReqwestHttp {
    fn get(&self, url: &str) -> Result<FetchResponse, String> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().map_err(|err| err.to_string())?;
        let cookie_names = Self::cookie_names(&response);
        let body = response.text().map_err(|err| err.to_string())?;
        Ok(FetchResponse { body, cookie_names })
    }

    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<FetchResponse, String> {
        tracing::debug!(url, "POST");
        let response = self
            .client
            .post(url)
            // Anti-forgery marker the service requires on mutations.
            .header("AT", "1")
            .form(fields)
            .send()
            .map_err(|err| err.to_string())?;
        let cookie_names = Self::cookie_names(&response);
        let body = response.text().map_err(|err| err.to_string())?;
        Ok(FetchResponse { body, cookie_names })
    }
}
