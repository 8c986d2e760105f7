//! Secure credential storage using the system keyring
//!
//! Thin pass-through to the platform store (macOS Keychain, Linux Secret
//! Service) at a fixed (service, account) pair. The trait seam exists so the
//! router can be exercised against mock stores without touching a real
//! keychain.

use keyring::Entry;
use secrecy::SecretString;

use crate::error::{HostError, Result};

/// One credential slot in the platform store
#[cfg_attr(test, mockall::automock)]
pub trait SecretStore {
    /// Store or overwrite the value.
    fn set(&self, value: &str) -> Result<()>;

    /// Fetch the value, `None` if nothing is stored.
    fn get(&self) -> Result<Option<SecretString>>;

    /// Delete the value; deleting an absent value is an error at this level,
    /// callers decide whether that matters.
    fn delete(&self) -> Result<()>;

    /// Identifier of the underlying backend, for health reporting.
    fn backend(&self) -> &'static str;
}

/// Platform keyring entry at a fixed (service, account) pair
pub struct KeyringStore {
    service: String,
    account: String,
}

impl KeyringStore {
    /// Address a credential slot. The entry itself is resolved per
    /// operation, matching how the keyring crate models handles.
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Ok(Entry::new(&self.service, &self.account)?)
    }
}

impl SecretStore for KeyringStore {
    fn set(&self, value: &str) -> Result<()> {
        self.entry()?.set_password(value)?;
        Ok(())
    }

    fn get(&self) -> Result<Option<SecretString>> {
        match self.entry()?.get_password() {
            Ok(password) => Ok(Some(SecretString::from(password))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(HostError::Credential(format!(
                "Cannot access system keychain. Make sure your keyring is unlocked. ({e})"
            ))),
        }
    }

    fn delete(&self) -> Result<()> {
        self.entry()?.delete_credential()?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        if cfg!(target_os = "macos") {
            "macos-keychain"
        } else if cfg!(target_os = "linux") {
            "secret-service"
        } else {
            "platform-default"
        }
    }
}
