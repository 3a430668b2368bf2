use std::{
    net::SocketAddr,
    sync::{Mutex, PoisonError},
};

use tokio::sync::{watch, RwLock};

use crate::resolver::ResolveError;

/// A private copy of the endpoint list taken by one caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Number of successful resolutions published so far, zero before the first.
    pub generation: u64,
    pub endpoints: Vec<SocketAddr>,
}

/// State shared by the resolve loop (sole writer) and every acquiring caller.
///
/// "Resolve needed" and "resolve done" live on separate watch channels so a
/// caller waiting for the first resolution never contends with the loop
/// waiting for work.
pub(crate) struct SharedState {
    endpoints: RwLock<Snapshot>,
    resolve_error: Mutex<Option<ResolveError>>,
    resolve_needed: watch::Sender<bool>,
    resolve_done: watch::Sender<bool>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            endpoints: RwLock::new(Snapshot::default()),
            resolve_error: Mutex::new(None),
            // A fresh connector has nothing resolved yet.
            resolve_needed: watch::channel(true).0,
            resolve_done: watch::channel(false).0,
        }
    }

    /// Copy the current endpoints, releasing the read lock before returning.
    pub async fn snapshot(&self) -> Snapshot {
        self.endpoints.read().await.clone()
    }

    /// Replace the endpoint list as a whole.
    pub async fn publish(&self, endpoints: Vec<SocketAddr>) -> u64 {
        let mut guard = self.endpoints.write().await;
        guard.generation += 1;
        guard.endpoints = endpoints;
        guard.generation
    }

    pub fn resolve_error(&self) -> Option<ResolveError> {
        self.resolve_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_resolve_error(&self, error: Option<ResolveError>) {
        *self
            .resolve_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = error;
    }

    pub fn notify_resolve_needed(&self) {
        self.resolve_needed.send_replace(true);
    }

    pub fn clear_resolve_needed(&self) {
        self.resolve_needed.send_replace(false);
    }

    pub fn subscribe_resolve_needed(&self) -> watch::Receiver<bool> {
        self.resolve_needed.subscribe()
    }

    /// Mark the first resolution as done. Never reverts.
    pub fn notify_resolve_done(&self) {
        self.resolve_done
            .send_if_modified(|done| !std::mem::replace(done, true));
    }

    pub fn is_resolve_done(&self) -> bool {
        *self.resolve_done.borrow()
    }

    pub fn subscribe_resolve_done(&self) -> watch::Receiver<bool> {
        self.resolve_done.subscribe()
    }
}
