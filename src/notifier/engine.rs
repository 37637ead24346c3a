// SPDX-License-Identifier: GPL-3.0-only
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use url::Url;
use crate::lister::{Credentials, DirectoryLister, DirectorySession, ListingError};
use crate::notifier::diff::{diff, Changes};
use crate::notifier::error::NotifierError;
use crate::notifier::state::LifecycleState;
use crate::notifier::traits::NotificationHandler;
use crate::utils::{parse_target, PathFormatError};

/// Collects the construction inputs of a [`Notifier`]
#[derive(Default)]
pub struct NotifierBuilder {
    target: Option<String>,
    credentials: Option<Credentials>,
    handler: Option<Arc<dyn NotificationHandler>>,
}

impl NotifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory to watch, e.g. `smb://host/share/dir/`
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn handler(mut self, handler: Arc<dyn NotificationHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Validate the inputs, open a session and take the initial listing.
    ///
    /// Nothing runs in the background until [`Notifier::start`] is called.
    pub async fn connect(self, lister: &dyn DirectoryLister) -> Result<Notifier, NotifierError> {
        let credentials = self
            .credentials
            .ok_or(NotifierError::InvalidArgument("credentials are required"))?;
        if credentials.is_empty() {
            return Err(NotifierError::InvalidArgument("credentials must name a user"));
        }

        let handler = self
            .handler
            .ok_or(NotifierError::InvalidArgument("a notification handler is required"))?;

        let raw = self.target.ok_or(PathFormatError::Missing)?;
        let target = parse_target(&raw)?;

        let session = lister.connect(&target, &credentials).await?;
        let initial = session.list().await?;

        info!(
            url = %target,
            user = %credentials.principal(),
            files = initial.len(),
            "Notifier connected"
        );

        Ok(Notifier {
            target,
            credentials: RwLock::new(credentials),
            shared: Arc::new(Shared {
                session,
                known: tokio::sync::Mutex::new(initial),
                handler: RwLock::new(handler),
                state: Mutex::new(LifecycleState::Created),
            }),
            task: Mutex::new(None),
        })
    }
}

/// State shared between the caller-facing handle and the poll loop
struct Shared {
    session: Arc<dyn DirectorySession>,
    // Held for a whole tick so only one tick mutates the set at a time
    known: tokio::sync::Mutex<BTreeSet<String>>,
    handler: RwLock<Arc<dyn NotificationHandler>>,
    state: Mutex<LifecycleState>,
}

impl Shared {
    fn is_running(&self) -> bool {
        *self.state.lock() == LifecycleState::Running
    }

    async fn tick(&self) -> Result<Changes, ListingError> {
        let mut known = self.known.lock().await;
        let handler = Arc::clone(&*self.handler.read());

        let listing = self.session.list().await?;
        let changes = diff(&known, &listing);
        *known = listing;

        for name in &changes.removed {
            handler.on_delete(name);
        }
        for name in &changes.added {
            handler.on_create(name);
        }

        Ok(changes)
    }
}

async fn poll_loop(shared: Arc<Shared>, target: Url, interval: Duration) {
    info!(url = %target, interval_ms = interval.as_millis() as u64, "Poll loop started");

    while shared.is_running() {
        match shared.tick().await {
            Ok(changes) if !changes.is_empty() => {
                debug!(
                    url = %target,
                    removed = changes.removed.len(),
                    added = changes.added.len(),
                    "Dispatched directory changes"
                );
            }
            Ok(_) => {}
            Err(e) => {
                error!(url = %target, error = %e, "Failed to list watched directory");
            }
        }

        tokio::time::sleep(interval).await;
    }

    info!(url = %target, "Poll loop stopped");
}

/// Watches one remote directory by polling its listing.
///
/// Created by [`NotifierBuilder::connect`]. A notifier runs at most one poll
/// loop, and once stopped it can never be started again. Dropping the
/// notifier stops it.
pub struct Notifier {
    target: Url,
    credentials: RwLock<Credentials>,
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Notifier {
    pub fn builder() -> NotifierBuilder {
        NotifierBuilder::new()
    }

    /// Launch the background poll loop, ticking every `interval`.
    ///
    /// Returns `Ok(false)` without doing anything if the loop is already
    /// running. Must be called from within a Tokio runtime.
    pub fn start(&self, interval: Duration) -> Result<bool, NotifierError> {
        let runtime = {
            let mut state = self.shared.state.lock();
            match *state {
                LifecycleState::Stopped => {
                    return Err(NotifierError::IllegalState("cannot restart a stopped notifier"));
                }
                LifecycleState::Running => {
                    debug!(url = %self.target, "Notifier already running");
                    return Ok(false);
                }
                LifecycleState::Created => {}
            }

            let runtime = Handle::try_current().map_err(|_| NotifierError::Runtime)?;
            *state = LifecycleState::Running;
            runtime
        };

        let handle = runtime.spawn(poll_loop(
            Arc::clone(&self.shared),
            self.target.clone(),
            interval,
        ));
        *self.task.lock() = Some(handle);

        Ok(true)
    }

    /// Stop polling for good. The loop exits at its next iteration boundary.
    pub fn stop(&self) {
        let previous = std::mem::replace(&mut *self.shared.state.lock(), LifecycleState::Stopped);
        if previous != LifecycleState::Stopped {
            info!(url = %self.target, from = %previous, "Stopping notifier");
        }
    }

    /// Wait for the poll loop to exit. Returns at once if it was never started.
    pub async fn join(&self) {
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(url = %self.target, error = %e, "Poll loop ended abnormally");
            }
        }
    }

    /// Like [`Notifier::join`], but gives up after `limit`.
    ///
    /// Returns `false` if the loop is still stuck in a tick, e.g. on a
    /// listing that never completes. The loop is left detached.
    pub async fn join_timeout(&self, limit: Duration) -> bool {
        tokio::time::timeout(limit, self.join()).await.is_ok()
    }

    /// Run a single tick right now: list, diff and dispatch.
    ///
    /// Serialized with the background loop, so the two never diff
    /// concurrently.
    pub async fn poll_once(&self) -> Result<Changes, NotifierError> {
        Ok(self.shared.tick().await?)
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    pub fn state(&self) -> LifecycleState {
        *self.shared.state.lock()
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Directory contents as of the last completed tick
    pub async fn known_files(&self) -> BTreeSet<String> {
        self.shared.known.lock().await.clone()
    }

    pub fn handler(&self) -> Arc<dyn NotificationHandler> {
        Arc::clone(&*self.shared.handler.read())
    }

    /// Replace the handler. A tick already in progress keeps the old one.
    pub fn set_handler(&self, handler: Arc<dyn NotificationHandler>) {
        *self.shared.handler.write() = handler;
    }

    pub fn authentication(&self) -> Credentials {
        self.credentials.read().clone()
    }

    /// Record new credentials.
    ///
    /// The session opened at construction is kept for the notifier's whole
    /// life, so this does not re-authenticate.
    pub fn set_authentication(&self, credentials: Credentials) {
        *self.credentials.write() = credentials;
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.stop();
    }
}
