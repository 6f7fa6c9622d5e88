//! Configuration for the remote session.

use std::time::Duration;

/// Configuration for a [`RemoteSession`](crate::RemoteSession).
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the remote service, with a trailing slash
    /// (e.g. `https://tasks.example.com/tasks/`).
    pub base_url: String,
    /// Path of the read/login endpoint relative to the base URL.
    pub get_endpoint: String,
    /// Path of the mutation endpoint relative to the base URL.
    pub post_endpoint: String,
    /// Account domains served by the default endpoint. Accounts on
    /// any other domain get one retry against the domain-scoped
    /// endpoint variant when the default login is rejected.
    pub consumer_domains: Vec<String>,
    /// Substring expected in the name of the auth cookie set by a
    /// successful login. Its absence is logged, not fatal.
    pub auth_cookie_marker: String,
    /// How long a session stays valid before a re-login is forced.
    pub session_ttl: Duration,
    /// Queue size at which pending update actions are auto-flushed.
    /// The queue never holds more than this many entries.
    pub flush_threshold: usize,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
    /// Read timeout for an established request.
    pub read_timeout: Duration,
}

impl SyncConfig {
    /// Creates a configuration for the given base URL with the
    /// service defaults.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            get_endpoint: "ig".into(),
            post_endpoint: "r/ig".into(),
            consumer_domains: Vec::new(),
            auth_cookie_marker: "GTL".into(),
            session_ttl: Duration::from_secs(60 * 5),
            flush_threshold: 10,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(15),
        }
    }

    /// Sets the consumer domains served by the default endpoint.
    pub fn with_consumer_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.consumer_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the session staleness window.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Sets the update-queue flush threshold.
    pub fn with_flush_threshold(mut self, threshold: usize) -> Self {
        self.flush_threshold = threshold;
        self
    }

    /// Sets the connect and read timeouts.
    pub fn with_timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self
    }

    /// URL of the read/login endpoint.
    pub fn default_get_url(&self) -> String {
        format!("{}{}", self.base_url, self.get_endpoint)
    }

    /// URL of the mutation endpoint.
    pub fn default_post_url(&self) -> String {
        format!("{}{}", self.base_url, self.post_endpoint)
    }

    /// URL of the read/login endpoint scoped to a hosted domain.
    pub fn domain_get_url(&self, domain: &str) -> String {
        format!("{}a/{}/{}", self.base_url, domain, self.get_endpoint)
    }

    /// URL of the mutation endpoint scoped to a hosted domain.
    pub fn domain_post_url(&self, domain: &str) -> String {
        format!("{}a/{}/{}", self.base_url, domain, self.post_endpoint)
    }

    /// Returns true if the account's domain is served by the default
    /// endpoint.
    pub fn is_consumer_domain(&self, domain: &str) -> bool {
        self.consumer_domains
            .iter()
            .any(|d| d.eq_ignore_ascii_case(domain))
    }
}
