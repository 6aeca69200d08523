//! Remembered-session port
//!
//! Controllers never touch ambient persisted state; the remembered identity
//! lives behind this injected port instead.

use std::sync::Mutex;

use super::identity::Identity;
use crate::error::{Error, Result};

/// Storage for the identity remembered between runs
pub trait SessionCache: Send + Sync {
    /// Remembered identity, if any
    fn get(&self) -> Result<Option<Identity>>;

    /// Remember an identity, replacing any previous one
    fn set(&self, identity: &Identity) -> Result<()>;

    /// Forget the remembered identity
    fn clear(&self) -> Result<()>;
}

/// Process-local session cache
#[derive(Debug, Default)]
pub struct InMemorySessionCache {
    slot: Mutex<Option<Identity>>,
}

impl InMemorySessionCache {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Identity>>> {
        self.slot
            .lock()
            .map_err(|_| Error::Other("session cache lock poisoned".to_string()))
    }
}

impl SessionCache for InMemorySessionCache {
    fn get(&self) -> Result<Option<Identity>> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, identity: &Identity) -> Result<()> {
        *self.lock()? = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
