//! Wire message types for the native messaging protocol
//!
//! Inbound messages carry a `cmd` field (`set`, `get`, `remove`, `health`) and,
//! for `set`, the token itself. Field extraction is tolerant: a frame that is
//! valid JSON but has a missing or wrong-typed field still dispatches, and the
//! router answers it with a per-request error instead of tearing the session
//! down. Outbound responses carry a `status` field (`success`, `warning`,
//! `error`) plus command-specific fields; absent fields are omitted from the
//! JSON entirely so the extension sees the exact shapes it was written against.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Commands the router understands, in the order reported to the peer
pub const SUPPORTED_COMMANDS: [&str; 4] = ["set", "get", "remove", "health"];

/// The `pat` field of an inbound frame
///
/// Wrapped in [`SecretString`] immediately on extraction so `Debug`
/// formatting can never leak it. The missing/wrong-type split exists because
/// the two cases answer with different error texts.
#[derive(Debug)]
pub enum TokenField {
    /// Field absent or JSON null
    Missing,
    /// Field present but not a JSON string
    NotAString,
    /// Field present as a string (possibly empty; the router validates)
    Present(SecretString),
}

/// One decoded inbound frame
#[derive(Debug)]
pub struct Message {
    /// Requested command; non-string values are rendered so the
    /// unknown-command error can echo what arrived
    pub cmd: Option<String>,
    /// Token payload, only meaningful for `set`
    pub pat: TokenField,
}

impl Message {
    /// Extract a message from a decoded JSON body.
    ///
    /// Never fails: anything that is not the expected shape (non-object
    /// body, missing `cmd`, wrong-typed fields) degrades to a message the
    /// router answers with an error response. Unknown fields are ignored.
    pub fn from_value(value: Value) -> Self {
        let cmd = match value.get("cmd") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        let pat = match value.get("pat") {
            None | Some(Value::Null) => TokenField::Missing,
            Some(Value::String(s)) => TokenField::Present(SecretString::from(s.clone())),
            Some(_) => TokenField::NotAString,
        };
        Self { cmd, pat }
    }
}

/// Response status reported to the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Error,
}

/// One outbound frame
#[derive(Debug, Serialize)]
pub struct Response {
    /// Outcome class
    pub status: Status,
    /// Human-readable success/warning text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Human-readable error text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The stored token, only on a successful `get`
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_secret"
    )]
    pub pat: Option<SecretString>,
    /// Host version, on `health` responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Credential store backend identifier, on successful `health`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyring_backend: Option<String>,
    /// Valid commands, on unknown-command errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_commands: Option<Vec<String>>,
}

impl Response {
    fn bare(status: Status) -> Self {
        Self {
            status,
            message: None,
            error: None,
            pat: None,
            version: None,
            keyring_backend: None,
            supported_commands: None,
        }
    }

    /// Create a success response with a human-readable message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::bare(Status::Success)
        }
    }

    /// Create a successful `get` response carrying the token.
    pub fn with_pat(pat: SecretString) -> Self {
        Self {
            pat: Some(pat),
            ..Self::bare(Status::Success)
        }
    }

    /// Create a warning response.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::bare(Status::Warning)
        }
    }

    /// Create an error response.
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::bare(Status::Error)
        }
    }

    /// Create the unknown-command error, listing what the router accepts.
    pub fn unknown_command(cmd: &str) -> Self {
        Self {
            supported_commands: Some(SUPPORTED_COMMANDS.iter().map(|c| c.to_string()).collect()),
            ..Self::error(format!("Unknown command: {cmd}"))
        }
    }

    /// Create the healthy response with version and backend identifier.
    pub fn healthy(version: &str, backend: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            keyring_backend: Some(backend.to_string()),
            ..Self::success("Native host is healthy")
        }
    }

    /// Create a health-check failure; still carries the version so the
    /// extension can report what it is talking to.
    pub fn unhealthy(error: impl Into<String>, version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            ..Self::error(error)
        }
    }
}

// SecretString does not implement Serialize on purpose; expose it explicitly
// at the protocol boundary and nowhere else.
fn serialize_opt_secret<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match secret {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}
