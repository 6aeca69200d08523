//! Signed-in identity and the provider that announces sign-in/sign-out
//!
//! The provider is modelled as a `tokio::sync::watch` channel: every
//! subscriber sees the latest identity and is woken on each transition.
//! Dropping (or calling [`IdentitySubscription::unsubscribe`] on) a
//! subscription releases it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

use super::session::SessionCache;
use crate::error::{Error, Result};

/// A signed-in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Opaque identifier, the value recorded in project contributor lists
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            email: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name printed on certificates: the display name, else the local part
    /// of the email address. `None` when neither is usable.
    pub fn recipient_name(&self) -> Option<String> {
        if let Some(name) = self.display_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return Some(name.to_string());
        }
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .map(str::trim)
            .filter(|local| !local.is_empty())
            .map(str::to_string)
    }
}

/// A live, cancelable feed of identity transitions
#[derive(Debug)]
pub struct IdentitySubscription {
    receiver: watch::Receiver<Option<Identity>>,
}

impl IdentitySubscription {
    pub fn new(receiver: watch::Receiver<Option<Identity>>) -> Self {
        Self { receiver }
    }

    /// The identity as of the latest notification
    pub fn current(&self) -> Option<Identity> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next sign-in/sign-out transition.
    ///
    /// Returns `None` once the provider has gone away.
    pub async fn changed(&mut self) -> Option<Option<Identity>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Release the subscription
    pub fn unsubscribe(self) {
        drop(self);
    }
}

/// Source of the current identity
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Identity currently signed in, if any
    fn current(&self) -> Option<Identity>;

    /// Subscribe to sign-in/sign-out transitions
    fn subscribe(&self) -> IdentitySubscription;

    /// Sign in as the given identity
    async fn sign_in(&self, identity: Identity) -> Result<Identity>;

    /// Sign out the current identity
    async fn sign_out(&self) -> Result<()>;
}

/// Identity provider that remembers the signed-in user in a [`SessionCache`]
pub struct LocalIdentityProvider {
    sender: watch::Sender<Option<Identity>>,
    cache: Arc<dyn SessionCache>,
}

impl LocalIdentityProvider {
    /// Create a provider, restoring any remembered identity from the cache
    pub fn new(cache: Arc<dyn SessionCache>) -> Result<Self> {
        let remembered = cache.get()?;
        let (sender, _) = watch::channel(remembered);
        Ok(Self { sender, cache })
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn current(&self) -> Option<Identity> {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> IdentitySubscription {
        IdentitySubscription::new(self.sender.subscribe())
    }

    async fn sign_in(&self, identity: Identity) -> Result<Identity> {
        if identity.id.trim().is_empty() {
            return Err(Error::InvalidInput("identity id must not be empty".to_string()));
        }

        self.cache.set(&identity)?;
        self.sender.send_replace(Some(identity.clone()));
        info!(identity_id = %identity.id, "Signed in");
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        self.cache.clear()?;
        if let Some(previous) = self.sender.send_replace(None) {
            info!(identity_id = %previous.id, "Signed out");
        }
        Ok(())
    }
}
