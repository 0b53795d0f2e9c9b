// market-client/src/slots.rs

//! Per-resource request cancellation
//!
//! Starting a fetch cancels the previous in-flight fetch of the same
//! [`ResourceKind`]; fetches of other kinds are left alone.

use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{ClientError, ClientResult};

/// Resources fetched into the portal store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Apps,
    UserApps,
    Tags,
    Groups,
    User,
    /// Favourite toggles
    Favourite,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apps => "apps",
            Self::UserApps => "user-apps",
            Self::Tags => "tags",
            Self::Groups => "user-groups",
            Self::User => "user-info",
            Self::Favourite => "favourite",
        }
    }
}

/// One cancellation slot per resource kind
#[derive(Debug, Default)]
pub struct RequestSlots {
    slots: Mutex<HashMap<ResourceKind, CancellationToken>>,
}

impl RequestSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the in-flight request of `kind` (if any) and hand out a fresh token
    pub fn start(&self, kind: ResourceKind) -> CancellationToken {
        let token = CancellationToken::new();
        if let Some(previous) = self.slots.lock().insert(kind, token.clone()) {
            if !previous.is_cancelled() {
                tracing::debug!(resource = kind.name(), "Cancelling superseded request");
            }
            previous.cancel();
        }
        token
    }

    /// Cancel the in-flight request of `kind`, if any
    pub fn cancel(&self, kind: ResourceKind) {
        if let Some(token) = self.slots.lock().remove(&kind) {
            token.cancel();
        }
    }

    pub fn cancel_all(&self) {
        for (_, token) in self.slots.lock().drain() {
            token.cancel();
        }
    }

    /// Run `fut` in a fresh slot of `kind`
    ///
    /// Resolves to [`ClientError::Cancelled`] when a newer request of the same
    /// kind starts before `fut` completes.
    pub async fn run<T, F>(&self, kind: ResourceKind, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let token = self.start(kind);
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(ClientError::Cancelled),
            result = fut => {
                // Completed, but a newer request already took the slot
                if token.is_cancelled() {
                    return Err(ClientError::Cancelled);
                }
                result
            }
        }
    }
}
