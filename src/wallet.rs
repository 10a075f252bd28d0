use std::{fmt::Debug, sync::Arc};

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::credential::{Credential, CredentialId};

/// Access to the credentials held by the wallet.
///
/// DCQL queries are executed against a snapshot of the store: the store is
/// enumerated once per Credential Query and every listed credential is then
/// looked up.
#[async_trait]
pub trait CredentialStore: Debug + Sync {
    /// List the identifiers of every stored credential, in a stable order.
    async fn list_credentials(&self) -> Result<Vec<CredentialId>>;

    /// Get a credential from the store. Returns `None` if it no longer exists.
    async fn lookup_credential(&self, id: &str) -> Result<Option<Credential>>;
}

/// A local in-memory credential store, credentials are listed in insertion order.
///
/// # Warning
/// This in-memory store should only be used for test purposes, credentials
/// are not persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    store: Arc<Mutex<Vec<Credential>>>,
}

impl MemoryCredentialStore {
    pub fn new(credentials: impl IntoIterator<Item = Credential>) -> Result<Self> {
        let store = Self::default();
        for credential in credentials {
            store.add(credential)?;
        }
        Ok(store)
    }

    pub fn add(&self, credential: Credential) -> Result<()> {
        let mut store = self.store.try_lock()?;
        if store.iter().any(|c| c.id() == credential.id()) {
            bail!("credential {} already exists", credential.id())
        }
        store.push(credential);
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<Credential> {
        let mut store = self.store.try_lock()?;
        let Some(index) = store.iter().position(|c| c.id() == id) else {
            bail!("credential not found")
        };
        Ok(store.remove(index))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn list_credentials(&self) -> Result<Vec<CredentialId>> {
        Ok(self
            .store
            .try_lock()?
            .iter()
            .map(|c| c.id().to_owned())
            .collect())
    }

    async fn lookup_credential(&self, id: &str) -> Result<Option<Credential>> {
        Ok(self.store.try_lock()?.iter().find(|c| c.id() == id).cloned())
    }
}
