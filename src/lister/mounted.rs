// SPDX-License-Identifier: GPL-3.0-only
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;
use crate::lister::credentials::Credentials;
use crate::lister::traits::{ConnectionError, DirectoryLister, DirectorySession, ListingError};

/// Default bound on a single remote call
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Lists shares that the operating system has already mounted.
///
/// `smb://host/share/dir/` resolves to `<mount_root>/host/share/dir/` and
/// `file:///some/dir/` to `/some/dir/`. Authentication is enforced by the
/// mount itself; a permission failure is reported as access denied for the
/// supplied principal. Every filesystem call is bounded by a timeout, since a
/// stale mount blocks forever.
pub struct MountedShareLister {
    mount_root: PathBuf,
    call_timeout: Duration,
}

impl MountedShareLister {
    pub fn new(mount_root: impl Into<PathBuf>) -> Self {
        Self {
            mount_root: mount_root.into(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Map a target URL onto the local filesystem
    pub fn resolve(&self, target: &Url) -> Result<PathBuf, ConnectionError> {
        let unresolvable = || ConnectionError::Unresolvable(target.to_string());

        match target.scheme() {
            "file" => target.to_file_path().map_err(|_| unresolvable()),
            "smb" => {
                let host = target.host_str().ok_or_else(unresolvable)?;

                // Round-trip through a file URL so percent-escapes are decoded
                let mut local = Url::parse("file:///").map_err(|_| unresolvable())?;
                local.set_path(&format!("/{}{}", host, target.path()));
                let absolute = local.to_file_path().map_err(|_| unresolvable())?;
                let relative = absolute.strip_prefix("/").map_err(|_| unresolvable())?;

                // An escaped '/' can smuggle '..' past URL normalization
                let escapes = relative
                    .components()
                    .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
                if escapes {
                    warn!(url = %target, "Rejected share path escaping the mount root");
                    return Err(unresolvable());
                }

                let resolved = self.mount_root.join(relative);
                if !resolved.starts_with(&self.mount_root) {
                    return Err(unresolvable());
                }

                Ok(resolved)
            }
            _ => Err(unresolvable()),
        }
    }
}

/// Run `call`, giving up after `limit`
async fn bounded<T>(limit: Duration, call: impl Future<Output = T>) -> Option<T> {
    tokio::time::timeout(limit, call).await.ok()
}

#[async_trait]
impl DirectoryLister for MountedShareLister {
    async fn connect(
        &self,
        target: &Url,
        credentials: &Credentials,
    ) -> Result<Arc<dyn DirectorySession>, ConnectionError> {
        let path = self.resolve(target)?;
        let denied = || ConnectionError::AccessDenied {
            target: target.to_string(),
            user: credentials.principal(),
        };
        let timed_out = || ConnectionError::Timeout {
            target: target.to_string(),
            after: self.call_timeout,
        };

        let metadata = match bounded(self.call_timeout, tokio::fs::metadata(&path))
            .await
            .ok_or_else(timed_out)?
        {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConnectionError::NotFound(target.to_string()));
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => return Err(denied()),
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_dir() {
            return Err(ConnectionError::NotADirectory(target.to_string()));
        }

        // Opening the directory is the closest thing to a login on a mount
        let opened = bounded(self.call_timeout, tokio::fs::read_dir(&path))
            .await
            .ok_or_else(timed_out)?;
        if let Err(e) = opened {
            return Err(match e.kind() {
                ErrorKind::PermissionDenied => denied(),
                _ => e.into(),
            });
        }

        info!(
            url = %target,
            path = %path.display(),
            user = %credentials.principal(),
            "Connected to mounted share"
        );

        Ok(Arc::new(MountedSession {
            path,
            call_timeout: self.call_timeout,
        }))
    }
}

struct MountedSession {
    path: PathBuf,
    call_timeout: Duration,
}

impl MountedSession {
    async fn read_names(&self) -> Result<BTreeSet<String>, ListingError> {
        let mut entries = match tokio::fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ListingError::Unreachable(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = BTreeSet::new();
        while let Some(entry) = entries.next_entry().await? {
            match entry.file_name().into_string() {
                Ok(name) => {
                    names.insert(name);
                }
                Err(raw) => {
                    warn!(path = %self.path.display(), name = ?raw, "Skipping entry with non UTF-8 name");
                }
            }
        }

        Ok(names)
    }
}

#[async_trait]
impl DirectorySession for MountedSession {
    async fn list(&self) -> Result<BTreeSet<String>, ListingError> {
        let names = bounded(self.call_timeout, self.read_names())
            .await
            .ok_or(ListingError::Timeout(self.call_timeout))??;

        debug!(path = %self.path.display(), count = names.len(), "Listed directory");
        Ok(names)
    }
}
