//! Command dispatch
//!
//! One stateless dispatch per inbound message. Every credential store failure
//! is converted into a `status: error` response here; nothing a handler does
//! can terminate the read loop. Log lines carry command names and outcomes
//! only, never the token.

use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::config::VERSION;
use crate::error::{HostError, Result};
use crate::protocol::{Message, Response, TokenField};
use crate::store::SecretStore;

/// Value written through the store during a health check
const HEALTH_PROBE_VALUE: &str = "test";

/// Recognized GitHub token prefixes (classic and fine-grained)
const PAT_PREFIXES: [&str; 2] = ["ghp_", "github_pat_"];

/// Routes decoded messages to credential store operations
pub struct Router<S> {
    pat: S,
    probe: S,
}

impl<S: SecretStore> Router<S> {
    /// Create a router over the PAT slot and the health-probe slot.
    pub fn new(pat: S, probe: S) -> Self {
        Self { pat, probe }
    }

    /// Handle one message and produce the response to send back.
    pub fn dispatch(&self, message: Message) -> Response {
        let cmd = message.cmd.as_deref().unwrap_or("<missing>");
        info!(cmd, "received command");

        let response = match cmd {
            "set" => self.handle_set(message.pat),
            "get" => self.handle_get(),
            "remove" => self.handle_remove(),
            "health" => self.handle_health(),
            other => {
                warn!(cmd = other, "unknown command");
                Response::unknown_command(other)
            }
        };

        info!(cmd, status = ?response.status, "command handled");
        response
    }

    fn handle_set(&self, pat: TokenField) -> Response {
        let pat = match pat {
            TokenField::Missing => {
                return Response::error("Missing 'pat' field in set command");
            }
            TokenField::NotAString => {
                return Response::error("Invalid PAT: must be a non-empty string");
            }
            TokenField::Present(pat) => pat,
        };
        let token = pat.expose_secret();
        // An empty string counts as missing, same as the original host.
        if token.is_empty() {
            return Response::error("Missing 'pat' field in set command");
        }

        // GitHub PATs start with ghp_ or github_pat_. An unusual prefix gets
        // a warning and the value is NOT written; the extension is expected
        // to re-submit a corrected token. See DESIGN.md before changing this.
        if !PAT_PREFIXES.iter().any(|p| token.starts_with(p)) {
            warn!("set rejected with warning: unusual token prefix");
            return Response::warning(
                "PAT format looks unusual (expected to start with 'ghp_' or 'github_pat_')",
            );
        }

        match self.pat.set(token) {
            Ok(()) => Response::success("PAT stored securely"),
            Err(e) => Response::error(format!("Failed to store PAT: {e}")),
        }
    }

    fn handle_get(&self) -> Response {
        match self.pat.get() {
            Ok(Some(pat)) => Response::with_pat(pat),
            Ok(None) => {
                Response::error("PAT not found. Please set it first in the Options page.")
            }
            Err(e) => Response::error(format!("Failed to retrieve PAT: {e}")),
        }
    }

    /// Remove is idempotent at the protocol level: nothing to remove is
    /// still a success, with a different message.
    fn handle_remove(&self) -> Response {
        match self.pat.get() {
            Ok(None) => Response::success("No PAT to remove"),
            Ok(Some(_)) => match self.pat.delete() {
                Ok(()) => Response::success("PAT removed successfully"),
                Err(e) => Response::error(format!("Failed to remove PAT: {e}")),
            },
            Err(e) => Response::error(format!("Failed to remove PAT: {e}")),
        }
    }

    fn handle_health(&self) -> Response {
        match self.health_round_trip() {
            Ok(()) => Response::healthy(VERSION, self.probe.backend()),
            Err(e) => Response::unhealthy(format!("Health check failed: {e}"), VERSION),
        }
    }

    /// Write a throwaway value through the probe slot, read it back, delete
    /// it, and verify the value survived the trip.
    fn health_round_trip(&self) -> Result<()> {
        self.probe.set(HEALTH_PROBE_VALUE)?;
        let read_back = self.probe.get()?;
        self.probe.delete()?;
        match read_back {
            Some(value) if value.expose_secret() == HEALTH_PROBE_VALUE => Ok(()),
            _ => Err(HostError::Credential(
                "keyring round-trip returned an unexpected value".to_string(),
            )),
        }
    }
}
