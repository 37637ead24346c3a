// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;
use crate::lister::{ConnectionError, Credentials, DirectoryLister, DirectorySession, ListingError};
use crate::notifier::NotificationHandler;

/// Build a name set from string slices
pub fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[derive(Default)]
struct ShareState {
    files: Mutex<BTreeSet<String>>,
    pending_failures: AtomicUsize,
    list_calls: AtomicUsize,
    reject_logins: AtomicBool,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

/// In-memory remote directory whose contents tests change at will
#[derive(Clone, Default)]
pub struct FakeShare {
    state: Arc<ShareState>,
}

impl FakeShare {
    pub fn new(files: &[&str]) -> Self {
        let share = Self::default();
        share.set_files(files);
        share
    }

    pub fn set_files(&self, files: &[&str]) {
        *self.state.files.lock() = names(files);
    }

    /// Make the next `count` listings fail
    pub fn fail_next(&self, count: usize) {
        self.state.pending_failures.store(count, Ordering::SeqCst);
    }

    pub fn reject_logins(&self) {
        self.state.reject_logins.store(true, Ordering::SeqCst);
    }

    pub fn list_calls(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    /// Block every later listing until a permit is added to the returned semaphore
    pub fn install_gate(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.state.gate.lock() = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl DirectoryLister for FakeShare {
    async fn connect(
        &self,
        target: &Url,
        credentials: &Credentials,
    ) -> Result<Arc<dyn DirectorySession>, ConnectionError> {
        if self.state.reject_logins.load(Ordering::SeqCst) {
            return Err(ConnectionError::AccessDenied {
                target: target.to_string(),
                user: credentials.principal(),
            });
        }

        Ok(Arc::new(FakeSession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct FakeSession {
    state: Arc<ShareState>,
}

#[async_trait]
impl DirectorySession for FakeSession {
    async fn list(&self) -> Result<BTreeSet<String>, ListingError> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.state.gate.lock().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let failing = self
            .state
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ListingError::Io(std::io::Error::other("simulated outage")));
        }

        Ok(self.state.files.lock().clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Created(String),
    Deleted(String),
}

/// Handler that remembers every callback in order
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<Recorded>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Recorded::Created(name) => Some(name.clone()),
                Recorded::Deleted(_) => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Recorded::Deleted(name) => Some(name.clone()),
                Recorded::Created(_) => None,
            })
            .collect()
    }
}

impl NotificationHandler for RecordingHandler {
    fn on_create(&self, name: &str) {
        self.events.lock().push(Recorded::Created(name.to_string()));
    }

    fn on_delete(&self, name: &str) {
        self.events.lock().push(Recorded::Deleted(name.to_string()));
    }
}
