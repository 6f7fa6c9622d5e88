//! # notesync protocol
//!
//! Wire-protocol types and parsers for the remote list-of-lists task
//! service notesync talks to.
//!
//! This crate provides:
//! - The JSON key constants of the batched action-list format
//! - The request envelope builder (`action_list` + `client_version`)
//! - Response parsing helpers (new-id extraction, list/task arrays)
//! - The script-embedded setup-payload scraper used at login
//!
//! This is a pure protocol crate with no I/O operations. The session
//! client that actually drives the wire lives in `notesync_engine`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod envelope;
mod error;
pub mod keys;
mod response;
mod scrape;

pub use envelope::{ActionIdSource, RequestEnvelope};
pub use error::{ProtocolError, ProtocolResult};
pub use response::{first_new_id, remote_lists, remote_tasks};
pub use scrape::{client_version_from_login, extract_setup_payload};
