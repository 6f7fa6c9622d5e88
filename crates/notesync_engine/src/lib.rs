//! # notesync engine
//!
//! Two-way synchronization core between an on-device note/task store
//! and a remote list-of-lists task service.
//!
//! This crate provides:
//! - The sync node model (`Task`, `TaskList`, `MetaData`) behind the
//!   [`SyncNode`] capability trait
//! - The per-entity sync-action resolver (local-wins conflict policy)
//! - [`RemoteSession`], the batched wire-protocol client that owns the
//!   authenticated session and the outbound update queue
//! - The identity bridge (`MetaData` sentinel) that lets local folder
//!   attributes survive a round trip through a service with no folder
//!   concept
//!
//! ## Architecture
//!
//! An external orchestrator drives the core one node at a time, single
//! threaded per sync pass: read a local snapshot, resolve a sync
//! action, then either mutate the local store (LOCAL actions) or hand
//! the node to the session (REMOTE actions). The session batches
//! update actions and flushes them before any operation that depends
//! on identity or ordering state.
//!
//! ## Key invariants
//!
//! - `remote_id` is empty only for entities never created remotely and
//!   immutable once assigned
//! - `last_modified` always reflects the last known remote value,
//!   never a local clock
//! - Within a list, exactly one task has no prior sibling (the head),
//!   and the prior-sibling links form a single acyclic chain
//! - Creates, moves, deletes, and reads flush the update queue first

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod config;
mod error;
mod http;
pub mod local;
mod meta;
mod node;
mod session;
mod task;
mod tasklist;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use http::{FetchResponse, HttpExchange, RecordingHttp, RecordedRequest, ReqwestHttp};
pub use meta::MetaData;
pub use node::{LocalSnapshot, NodeFields, NodeKey, SyncAction, SyncNode};
pub use session::{CancelHandle, RemoteSession, SessionState};
pub use task::Task;
pub use tasklist::TaskList;
