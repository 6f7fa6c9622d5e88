//! The remote session: login state machine, update queue, and the
//! entity-level operations the orchestrator drives one node at a
//! time.

use crate::auth::TokenProvider;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::http::HttpExchange;
use crate::node::{NodeKey, SyncNode};
use crate::task::Task;
use crate::tasklist::TaskList;
use notesync_protocol::{
    client_version_from_login, extract_setup_payload, first_new_id, keys, remote_lists,
    remote_tasks, ActionIdSource, RequestEnvelope,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle of the authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No valid session. Only `login` is allowed.
    LoggedOut,
    /// A login exchange is in flight.
    LoggingIn,
    /// Session cookie and protocol version are valid.
    LoggedIn,
}

/// Handle for requesting pass-granular cancellation from outside the
/// session.
///
/// Cancellation stops the session from issuing new network calls; an
/// action already sent is not rolled back, and pending queued actions
/// are dropped, not retried.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Requests cancellation of the current pass.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

/// The batched wire-protocol client.
///
/// Owns one authenticated session against the remote service,
/// serializes node actions into the batched action-list format, and
/// manages the outbound update queue. Not thread-safe by design: the
/// orchestrator guarantees at most one sync pass at a time.
///
/// Every operation other than [`login`](Self::login) requires a
/// logged-in session; calling one while logged out is a programming
/// error and panics.
pub struct RemoteSession<H: HttpExchange, P: TokenProvider> {
    config: SyncConfig,
    http: H,
    tokens: P,
    state: SessionState,
    account: Option<String>,
    last_login: Option<Instant>,
    client_version: i64,
    get_url: String,
    post_url: String,
    ids: ActionIdSource,
    update_queue: Vec<Value>,
    cancelled: Arc<AtomicBool>,
}

impl<H: HttpExchange, P: TokenProvider> RemoteSession<H, P> {
    /// Creates a logged-out session.
    pub fn new(config: SyncConfig, http: H, tokens: P) -> Self {
        let get_url = config.default_get_url();
        let post_url = config.default_post_url();
        Self {
            config,
            http,
            tokens,
            state: SessionState::LoggedOut,
            account: None,
            last_login: None,
            client_version: -1,
            get_url,
            post_url,
            ids: ActionIdSource::new(),
            update_queue: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The protocol version scraped at login, `-1` before the first
    /// successful login.
    pub fn client_version(&self) -> i64 {
        self.client_version
    }

    /// The account of the current session, if logged in.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Number of update actions waiting in the queue.
    pub fn pending_updates(&self) -> usize {
        self.update_queue.len()
    }

    /// The underlying HTTP exchange.
    pub fn http(&self) -> &H {
        &self.http
    }

    /// Returns a handle that can cancel this pass from outside.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    /// Clears the cancellation flag for a new pass.
    pub fn reset_cancel(&mut self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    /// Drops any pending queued update actions without sending them.
    pub fn reset_update_queue(&mut self) {
        self.update_queue.clear();
    }

    /// Establishes (or reuses) the authenticated session.
    ///
    /// A session goes stale after the configured TTL, and an account
    /// change always forces a fresh exchange. A rejected login
    /// invalidates the cached bearer credential once and retries the
    /// full exchange exactly once; accounts on a hosted (non-consumer)
    /// domain additionally get one retry against the domain-scoped
    /// endpoint variant within each exchange.
    pub fn login(&mut self, account: &str) -> SyncResult<()> {
        if self
            .last_login
            .map_or(true, |at| at.elapsed() >= self.config.session_ttl)
        {
            self.state = SessionState::LoggedOut;
        }
        if self.state == SessionState::LoggedIn && self.account.as_deref() != Some(account) {
            tracing::debug!("account changed, forcing re-login");
            self.state = SessionState::LoggedOut;
        }
        if self.state == SessionState::LoggedIn {
            tracing::debug!("already logged in");
            return Ok(());
        }

        self.state = SessionState::LoggingIn;
        self.check_cancelled()?;
        let token = self
            .tokens
            .obtain_token(account, false)
            .map_err(SyncError::Credential)?;

        let outcome = match self.login_attempt(account, &token) {
            Ok(()) => Ok(()),
            Err(first) => {
                // The cached credential may have expired in a race:
                // invalidate it once and retry the full exchange.
                tracing::warn!(error = %first, "login rejected, refreshing bearer credential");
                match self.tokens.obtain_token(account, true) {
                    Ok(token) => self.login_attempt(account, &token),
                    Err(err) => Err(SyncError::Credential(err)),
                }
            }
        };

        match outcome {
            Ok(()) => {
                self.state = SessionState::LoggedIn;
                self.account = Some(account.to_owned());
                self.last_login = Some(Instant::now());
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::LoggedOut;
                tracing::error!(error = %err, "login failed");
                Err(err)
            }
        }
    }

    /// Creates the task remotely and records the assigned remote id
    /// on it. The task must already be a child of `list`.
    pub fn create_task(&mut self, list: &mut TaskList, task: NodeKey) -> SyncResult<()> {
        self.require_login();
        self.commit_update()?;

        let action = {
            let child = list.child_by_key(task).ok_or_else(|| {
                SyncError::Action(format!("task {task} is not a child of the list"))
            })?;
            child.create_action(self.ids.next_id(), Some(&*list))?
        };
        let response =
            self.post_request(RequestEnvelope::single(self.client_version, action).into_body())?;
        let new_id = first_new_id(&response)?;
        if let Some(child) = list.child_by_key_mut(task) {
            child.set_remote_id(new_id);
        }
        Ok(())
    }

    /// Creates the list remotely and records the assigned remote id
    /// on it.
    pub fn create_task_list(&mut self, list: &mut TaskList) -> SyncResult<()> {
        self.require_login();
        self.commit_update()?;

        let action = list.create_action(self.ids.next_id(), None)?;
        let response =
            self.post_request(RequestEnvelope::single(self.client_version, action).into_body())?;
        list.set_remote_id(first_new_id(&response)?);
        Ok(())
    }

    /// Queues an update action for the node, auto-flushing first when
    /// the queue is full. The queue never holds more than the
    /// configured threshold of entries.
    pub fn add_update_node(&mut self, node: &dyn SyncNode) -> SyncResult<()> {
        self.require_login();
        if self.update_queue.len() >= self.config.flush_threshold {
            self.commit_update()?;
        }
        self.update_queue.push(node.update_action(self.ids.next_id()));
        Ok(())
    }

    /// Flushes the queued update actions in one batched request.
    ///
    /// On failure the batch is reported and dropped, not replayed
    /// per item; the pass is expected to abort.
    pub fn commit_update(&mut self) -> SyncResult<()> {
        if self.update_queue.is_empty() {
            return Ok(());
        }
        let actions = std::mem::take(&mut self.update_queue);
        let count = actions.len();
        self.post_request(RequestEnvelope::batch(self.client_version, actions).into_body())?;
        tracing::debug!(count, "flushed update queue");
        Ok(())
    }

    /// Moves a task between lists or within one list.
    ///
    /// The task must already sit at its target position in `dest`'s
    /// sequence. Flushes the queue first: a move changes ordering
    /// state queued actions may depend on.
    pub fn move_task(
        &mut self,
        task: &Task,
        source: &TaskList,
        dest: &TaskList,
    ) -> SyncResult<()> {
        self.require_login();
        self.commit_update()?;

        let task_id = task
            .remote_id()
            .ok_or_else(|| SyncError::Action("moving a task that was never created".into()))?;
        let source_id = source
            .remote_id()
            .ok_or_else(|| SyncError::Action("moving out of a list that was never created".into()))?;
        let dest_id = dest
            .remote_id()
            .ok_or_else(|| SyncError::Action("moving into a list that was never created".into()))?;
        let same_list = source_id == dest_id;

        let mut action = json!({
            keys::ACTION_TYPE: keys::ACTION_TYPE_MOVE,
            keys::ACTION_ID: self.ids.next_id(),
            keys::ID: task_id,
            keys::SOURCE_LIST: source_id,
            keys::DEST_PARENT: dest_id,
        });
        if same_list {
            // Only a same-list move away from the head names its
            // predecessor; position zero omits it.
            if let Some(prior_id) = dest.prior_sibling_remote_id(task.key()) {
                action[keys::PRIOR_SIBLING_ID] = json!(prior_id);
            }
        } else {
            action[keys::DEST_LIST] = json!(dest_id);
        }

        self.post_request(RequestEnvelope::single(self.client_version, action).into_body())?;
        Ok(())
    }

    /// Tombstones the node remotely.
    ///
    /// Encoded as an update action with the deleted flag set; the
    /// service has no dedicated delete verb. Flushes the queue first
    /// and drops anything queued afterwards.
    pub fn delete_node(&mut self, node: &mut dyn SyncNode) -> SyncResult<()> {
        self.require_login();
        self.commit_update()?;

        node.set_deleted(true);
        let action = node.update_action(self.ids.next_id());
        self.post_request(RequestEnvelope::single(self.client_version, action).into_body())?;
        self.update_queue.clear();
        Ok(())
    }

    /// Fetches all remote list descriptors.
    ///
    /// Read-only, but flushes the queue first so the enumeration sees
    /// this session's own pending writes.
    pub fn get_task_lists(&mut self) -> SyncResult<Vec<TaskList>> {
        self.require_login();
        self.commit_update()?;
        self.check_cancelled()?;

        let response = self.http.get(&self.get_url).map_err(SyncError::Network)?;
        let setup = extract_setup_payload(&response.body)?;
        remote_lists(&setup)?
            .iter()
            .map(|descriptor| {
                let mut list = TaskList::new();
                list.apply_remote_json(descriptor)?;
                Ok(list)
            })
            .collect()
    }

    /// Fetches all task descriptors of one remote list, excluding
    /// tombstones. Flushes the queue first.
    pub fn get_tasks_in_list(&mut self, list_remote_id: &str) -> SyncResult<Vec<Task>> {
        self.require_login();
        self.commit_update()?;

        let action = json!({
            keys::ACTION_TYPE: keys::ACTION_TYPE_GETALL,
            keys::ACTION_ID: self.ids.next_id(),
            keys::LIST_ID: list_remote_id,
            keys::GET_DELETED: false,
        });
        let response =
            self.post_request(RequestEnvelope::single(self.client_version, action).into_body())?;
        remote_tasks(&response)?
            .iter()
            .map(|descriptor| {
                let mut task = Task::new();
                task.apply_remote_json(descriptor)?;
                Ok(task)
            })
            .collect()
    }

    fn login_attempt(&mut self, account: &str, token: &str) -> SyncResult<()> {
        self.point_at_default();
        match self.login_exchange(token) {
            Ok(()) => Ok(()),
            Err(primary) => match self.hosted_domain(account) {
                Some(domain) => {
                    tracing::warn!(
                        error = %primary,
                        domain,
                        "default endpoint rejected login, trying domain-scoped endpoint"
                    );
                    self.get_url = self.config.domain_get_url(&domain);
                    self.post_url = self.config.domain_post_url(&domain);
                    self.login_exchange(token).map_err(|err| {
                        self.point_at_default();
                        err
                    })
                }
                None => Err(primary),
            },
        }
    }

    fn point_at_default(&mut self) {
        self.get_url = self.config.default_get_url();
        self.post_url = self.config.default_post_url();
    }

    /// The account's domain when it is not served by the default
    /// endpoint.
    fn hosted_domain(&self, account: &str) -> Option<String> {
        let (_, domain) = account.rsplit_once('@')?;
        if domain.is_empty() || self.config.is_consumer_domain(domain) {
            None
        } else {
            Some(domain.to_ascii_lowercase())
        }
    }

    fn login_exchange(&mut self, token: &str) -> SyncResult<()> {
        self.check_cancelled()?;
        let url = format!("{}?auth={}", self.get_url, token);
        let response = self.http.get(&url).map_err(SyncError::Network)?;

        if !response
            .cookie_names
            .iter()
            .any(|name| name.contains(&self.config.auth_cookie_marker))
        {
            tracing::warn!("it seems that there is no auth cookie");
        }

        self.client_version = client_version_from_login(&response.body)?;
        tracing::debug!(version = self.client_version, "login exchange complete");
        Ok(())
    }

    fn post_request(&mut self, body: Value) -> SyncResult<Value> {
        self.check_cancelled()?;
        let serialized = body.to_string();
        let response = self
            .http
            .post_form(&self.post_url, &[("r", serialized.as_str())])
            .map_err(SyncError::Network)?;
        serde_json::from_str(&response.body)
            .map_err(|err| SyncError::Action(format!("unparseable action response: {err}")))
    }

    fn require_login(&self) {
        assert!(
            self.state == SessionState::LoggedIn,
            "remote operation before login: complete login() first"
        );
    }

    fn check_cancelled(&mut self) -> SyncResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            self.update_queue.clear();
            Err(SyncError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use crate::http::{FetchResponse, RecordingHttp};
    use std::time::Duration;

    const LOGIN_BODY: &str = "<script>function boot(){_setup({\"v\":7,\"t\":{\"lists\":[]}})}</script>";

    fn config() -> SyncConfig {
        SyncConfig::new("https://tasks.example.com/tasks/").with_consumer_domains(["example.com"])
    }

    fn session_with(config: SyncConfig) -> RemoteSession<RecordingHttp, StaticTokenProvider> {
        RemoteSession::new(config, RecordingHttp::new(), StaticTokenProvider::new("tok"))
    }

    fn logged_in() -> RemoteSession<RecordingHttp, StaticTokenProvider> {
        let session = session_with(config());
        session
            .http
            .push_response(FetchResponse::body(LOGIN_BODY).with_cookie("GTL_SESSION"));
        let mut session = session;
        session.login("user@example.com").unwrap();
        session
    }

    fn created_task(name: &str, remote_id: &str) -> Task {
        let mut task = Task::new();
        task.set_name(name);
        task.set_remote_id(remote_id.to_owned());
        task
    }

    fn created_list(remote_id: &str) -> TaskList {
        let mut list = TaskList::new();
        list.set_remote_id(remote_id.to_owned());
        list
    }

    #[test]
    fn login_scrapes_version_and_sets_state() {
        let session = logged_in();
        assert_eq!(session.state(), SessionState::LoggedIn);
        assert_eq!(session.client_version(), 7);
        assert_eq!(session.account(), Some("user@example.com"));

        let requests = session.http.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://tasks.example.com/tasks/ig?auth=tok"
        );
    }

    #[test]
    fn fresh_session_is_reused() {
        let mut session = logged_in();
        session.login("user@example.com").unwrap();
        assert_eq!(session.http.requests().len(), 1);
    }

    #[test]
    fn stale_session_forces_relogin() {
        let mut session = session_with(config().with_session_ttl(Duration::ZERO));
        session.http.push_body(LOGIN_BODY);
        session.http.push_body(LOGIN_BODY);
        session.login("user@example.com").unwrap();
        session.login("user@example.com").unwrap();
        assert_eq!(session.http.requests().len(), 2);
    }

    #[test]
    fn account_change_forces_relogin() {
        let mut session = logged_in();
        session.http.push_body(LOGIN_BODY);
        session.login("other@example.com").unwrap();
        assert_eq!(session.http.requests().len(), 2);
        assert_eq!(session.account(), Some("other@example.com"));
    }

    #[test]
    fn rejected_login_refreshes_credential_once() {
        let mut session = session_with(config());
        session.http.push_error("401");
        session.http.push_body(LOGIN_BODY);

        session.login("user@example.com").unwrap();
        assert_eq!(session.state(), SessionState::LoggedIn);
        assert_eq!(
            session.tokens.requests(),
            vec![
                ("user@example.com".to_owned(), false),
                ("user@example.com".to_owned(), true),
            ]
        );
    }

    #[test]
    fn hosted_domain_gets_scoped_endpoint_retry() {
        let mut session = session_with(config());
        session.http.push_error("401");
        session.http.push_body(LOGIN_BODY);

        session.login("user@corp.net").unwrap();
        let requests = session.http.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0]
            .url
            .starts_with("https://tasks.example.com/tasks/ig"));
        assert!(requests[1]
            .url
            .starts_with("https://tasks.example.com/tasks/a/corp.net/ig"));
        // The scoped attempt succeeded before any credential refresh.
        assert_eq!(session.tokens.requests().len(), 1);
    }

    #[test]
    fn exhausted_login_attempts_surface_failure() {
        let mut session = session_with(config());
        // No canned responses: every exchange fails.
        let err = session.login("user@example.com").unwrap_err();
        assert!(matches!(err, SyncError::Network(_)));
        assert_eq!(session.state(), SessionState::LoggedOut);
    }

    #[test]
    #[should_panic(expected = "remote operation before login")]
    fn mutating_call_before_login_is_a_programming_error() {
        let mut session = session_with(config());
        let task = created_task("milk", "task-1");
        let _ = session.add_update_node(&task);
    }

    #[test]
    fn queue_flushes_before_the_eleventh_entry() {
        let mut session = logged_in();
        session.http.push_body("{}");

        for n in 0..11 {
            let task = created_task(&format!("t{n}"), &format!("task-{n}"));
            session.add_update_node(&task).unwrap();
            // The queue never exceeds the threshold.
            assert!(session.pending_updates() <= 10);
        }

        let bodies = session.http.posted_bodies();
        assert_eq!(bodies.len(), 1, "exactly one automatic flush");
        assert_eq!(bodies[0]["action_list"].as_array().unwrap().len(), 10);
        assert_eq!(session.pending_updates(), 1);
    }

    #[test]
    fn commit_update_drains_queue_and_stamps_version() {
        let mut session = logged_in();
        session.http.push_body("{}");

        session
            .add_update_node(&created_task("milk", "task-1"))
            .unwrap();
        session
            .add_update_node(&created_task("eggs", "task-2"))
            .unwrap();
        session.commit_update().unwrap();

        assert_eq!(session.pending_updates(), 0);
        let bodies = session.http.posted_bodies();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["client_version"], 7);
        let actions = bodies[0]["action_list"].as_array().unwrap();
        assert_eq!(actions.len(), 2);
        // Action ids keep increasing across the batch.
        assert!(
            actions[0]["action_id"].as_u64().unwrap() < actions[1]["action_id"].as_u64().unwrap()
        );
    }

    #[test]
    fn empty_commit_posts_nothing() {
        let mut session = logged_in();
        session.commit_update().unwrap();
        assert_eq!(session.http.posted_bodies().len(), 0);
    }

    #[test]
    fn create_task_list_assigns_remote_id() {
        let mut session = logged_in();
        session
            .http
            .push_body("{\"results\":[{\"new_id\":\"list-1\"}]}");

        let mut list = TaskList::new();
        list.set_name("[notesync]Groceries");
        session.create_task_list(&mut list).unwrap();
        assert_eq!(list.remote_id(), Some("list-1"));

        let bodies = session.http.posted_bodies();
        assert_eq!(bodies[0]["action_list"][0]["action_type"], "create");
    }

    #[test]
    fn create_task_flushes_queue_first() {
        let mut session = logged_in();
        session.http.push_body("{}");
        session
            .http
            .push_body("{\"results\":[{\"new_id\":\"task-9\"}]}");

        session
            .add_update_node(&created_task("pending", "task-0"))
            .unwrap();

        let mut list = created_list("list-1");
        let mut milk = Task::new();
        milk.set_name("milk");
        let key = list.add_child(milk).unwrap();

        session.create_task(&mut list, key).unwrap();
        assert_eq!(
            list.child_by_key(key).unwrap().remote_id(),
            Some("task-9")
        );

        let bodies = session.http.posted_bodies();
        assert_eq!(bodies.len(), 2, "queued update flushed before create");
        assert_eq!(bodies[1]["action_list"][0]["parent_id"], "list-1");
    }

    #[test]
    fn move_within_list_names_predecessor() {
        let mut session = logged_in();
        session.http.push_body("{}");

        let mut list = created_list("list-1");
        list.add_child(created_task("a", "task-a")).unwrap();
        let b = list.add_child(created_task("b", "task-b")).unwrap();
        let task = list.child_by_key(b).unwrap().clone();

        session.move_task(&task, &list, &list).unwrap();

        let action = &session.http.posted_bodies()[0]["action_list"][0];
        assert_eq!(action["action_type"], "move");
        assert_eq!(action["id"], "task-b");
        assert_eq!(action["source_list"], "list-1");
        assert_eq!(action["dest_parent"], "list-1");
        assert_eq!(action["prior_sibling_id"], "task-a");
        assert!(action.get("dest_list").is_none());
    }

    #[test]
    fn move_to_head_omits_predecessor() {
        let mut session = logged_in();
        session.http.push_body("{}");

        let mut list = created_list("list-1");
        let a = list.add_child(created_task("a", "task-a")).unwrap();
        list.add_child(created_task("b", "task-b")).unwrap();
        let task = list.child_by_key(a).unwrap().clone();

        session.move_task(&task, &list, &list).unwrap();

        let action = &session.http.posted_bodies()[0]["action_list"][0];
        assert!(action.get("prior_sibling_id").is_none());
        assert!(action.get("dest_list").is_none());
    }

    #[test]
    fn cross_list_move_names_destination() {
        let mut session = logged_in();
        session.http.push_body("{}");

        let source = created_list("list-1");
        let mut dest = created_list("list-2");
        let key = dest.add_child(created_task("a", "task-a")).unwrap();
        let task = dest.child_by_key(key).unwrap().clone();

        session.move_task(&task, &source, &dest).unwrap();

        let action = &session.http.posted_bodies()[0]["action_list"][0];
        assert_eq!(action["source_list"], "list-1");
        assert_eq!(action["dest_parent"], "list-2");
        assert_eq!(action["dest_list"], "list-2");
        assert!(action.get("prior_sibling_id").is_none());
    }

    #[test]
    fn delete_flushes_then_tombstones() {
        let mut session = logged_in();
        session.http.push_body("{}");
        session.http.push_body("{}");

        session
            .add_update_node(&created_task("pending", "task-0"))
            .unwrap();
        let mut task = created_task("milk", "task-9");
        session.delete_node(&mut task).unwrap();

        assert!(task.deleted());
        assert_eq!(session.pending_updates(), 0);

        let bodies = session.http.posted_bodies();
        assert_eq!(bodies.len(), 2);
        let delete = &bodies[1]["action_list"][0];
        assert_eq!(delete["action_type"], "update");
        assert_eq!(delete["entity_delta"]["deleted"], true);
    }

    #[test]
    fn list_enumeration_flushes_queue_first() {
        let mut session = logged_in();
        session.http.push_body("{}");
        session.http.push_body(
            "<script>_setup({\"v\":7,\"t\":{\"lists\":[{\"id\":\"list-1\",\"name\":\"[notesync]Groceries\"}]}})}</script>",
        );

        session
            .add_update_node(&created_task("pending", "task-0"))
            .unwrap();
        let lists = session.get_task_lists().unwrap();

        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].remote_id(), Some("list-1"));

        let requests = session.http.requests();
        assert_eq!(requests.len(), 3); // login GET, flush POST, read GET
        assert_eq!(requests[1].method, "POST");
        assert_eq!(requests[2].method, "GET");
    }

    #[test]
    fn task_enumeration_excludes_tombstones() {
        let mut session = logged_in();
        session.http.push_body(
            "{\"tasks\":[{\"id\":\"task-1\",\"name\":\"milk\",\"last_modified\":5}]}",
        );

        let tasks = session.get_tasks_in_list("list-1").unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].remote_id(), Some("task-1"));
        assert_eq!(tasks[0].last_modified(), 5);

        let action = &session.http.posted_bodies()[0]["action_list"][0];
        assert_eq!(action["action_type"], "get_all");
        assert_eq!(action["list_id"], "list-1");
        assert_eq!(action["get_deleted"], false);
    }

    #[test]
    fn unparseable_action_response_is_action_failure() {
        let mut session = logged_in();
        session.http.push_body("<html>maintenance</html>");
        session
            .add_update_node(&created_task("milk", "task-1"))
            .unwrap();
        let err = session.commit_update().unwrap_err();
        assert!(matches!(err, SyncError::Action(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn transport_failure_is_retryable_network_error() {
        let mut session = logged_in();
        session.http.push_error("connection reset");
        session
            .add_update_node(&created_task("milk", "task-1"))
            .unwrap();
        let err = session.commit_update().unwrap_err();
        assert!(matches!(err, SyncError::Network(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn cancellation_drops_queue_before_the_next_call() {
        let mut session = logged_in();
        session
            .add_update_node(&created_task("milk", "task-1"))
            .unwrap();

        session.cancel_handle().cancel();
        let err = session.commit_update().unwrap_err();
        assert!(matches!(err, SyncError::Cancelled));
        assert_eq!(session.pending_updates(), 0);
        // No request went out after cancellation.
        assert_eq!(session.http.posted_bodies().len(), 0);

        session.reset_cancel();
        session.commit_update().unwrap();
    }
}
