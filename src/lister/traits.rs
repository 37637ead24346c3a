// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use crate::lister::credentials::Credentials;

#[derive(thiserror::Error, Debug)]
pub enum ConnectionError {
    #[error("Remote directory not found: {0}")]
    NotFound(String),

    #[error("Remote target is not a directory: {0}")]
    NotADirectory(String),

    #[error("Access denied to {target} for user {user}")]
    AccessDenied { target: String, user: String },

    #[error("Timed out after {after:?} connecting to {target}")]
    Timeout { target: String, after: Duration },

    #[error("Unable to resolve {0} to a mounted share")]
    Unresolvable(String),

    #[error("I/O error while connecting: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ListingError {
    #[error("Remote directory is unreachable: {}", .0.display())]
    Unreachable(PathBuf),

    #[error("Listing timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error while listing: {0}")]
    Io(#[from] std::io::Error),
}

/// An authenticated handle on one remote directory
#[async_trait]
pub trait DirectorySession: Send + Sync {
    /// Fetch the current entry names of the directory
    async fn list(&self) -> Result<BTreeSet<String>, ListingError>;
}

#[async_trait]
pub trait DirectoryLister: Send + Sync {
    /// Open a session on `target` using `credentials`
    async fn connect(
        &self,
        target: &Url,
        credentials: &Credentials,
    ) -> Result<Arc<dyn DirectorySession>, ConnectionError>;
}
