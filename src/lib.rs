//! pat-host - browser native messaging host for GitHub PAT storage
//!
//! A browser extension launches this process and talks to it over stdin and
//! stdout using length-prefixed JSON frames. Each frame carries one command
//! (`set`, `get`, `remove`, `health`) against a single personal access token
//! kept in the platform credential store.

pub mod config;
pub mod error;
pub mod framing;
pub mod host;
pub mod protocol;
pub mod router;
pub mod store;

pub use error::{HostError, Result};
