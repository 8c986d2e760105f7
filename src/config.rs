//! Host configuration
//!
//! The native messaging manifest installed alongside the browser extension
//! hard-codes this process's identity, so the service name, account name, and
//! log path are fixed constants known to both ends of the protocol. They are
//! still carried in an explicit record, built once at startup and passed into
//! the store and router, rather than read from globals.

use std::path::PathBuf;

/// Keychain service the PAT lives under
const SERVICE_NAME: &str = "chrome_bookmarks_extension";

/// Keychain account for the stored PAT
const ACCOUNT_NAME: &str = "github_pat";

/// Keychain account used for the health-check round trip
const HEALTH_ACCOUNT_NAME: &str = "chrome_bookmarks_extension_health_check";

/// Side-channel log destination; stdout belongs to the frame protocol
const LOG_PATH: &str = "/tmp/chrome_bookmarks_host.log";

/// Host version reported by the `health` command
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed configuration for one host process
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Credential store service name
    pub service: String,
    /// Credential store account holding the PAT
    pub account: String,
    /// Credential store account for the health probe
    pub health_account: String,
    /// Where diagnostic logs go
    pub log_path: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            account: ACCOUNT_NAME.to_string(),
            health_account: HEALTH_ACCOUNT_NAME.to_string(),
            log_path: PathBuf::from(LOG_PATH),
        }
    }
}
