//! Credential provider boundary.

use std::sync::Mutex;

/// Supplies bearer credentials for the login exchange.
///
/// The real provider lives with the platform's account machinery;
/// the session only needs to ask for a token and, when a login is
/// rejected, ask again with `force_refresh` to invalidate a cached
/// one.
pub trait TokenProvider {
    /// Obtains a bearer token for the account, optionally forcing the
    /// provider to discard any cached token first.
    fn obtain_token(&self, account: &str, force_refresh: bool) -> Result<String, String>;
}

/// A provider that hands out a fixed token, recording every request.
///
/// Intended for tests and loopback setups.
#[derive(Debug, Default)]
pub struct StaticTokenProvider {
    token: String,
    requests: Mutex<Vec<(String, bool)>>,
}

impl StaticTokenProvider {
    /// Creates a provider that always returns `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every `(account, force_refresh)` request made so far.
    pub fn requests(&self) -> Vec<(String, bool)> {
        self.requests.lock().unwrap().clone()
    }
}

impl TokenProvider for StaticTokenProvider {
    fn obtain_token(&self, account: &str, force_refresh: bool) -> Result<String, String> {
        self.requests
            .lock()
            .unwrap()
            .push((account.to_owned(), force_refresh));
        Ok(self.token.clone())
    }
}
