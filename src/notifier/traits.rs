// SPDX-License-Identifier: GPL-3.0-only

/// Callbacks for changes detected in the watched directory.
///
/// Both methods run inline on the poll loop, so they must return promptly:
/// a slow handler delays the next tick.
pub trait NotificationHandler: Send + Sync {
    /// A file appeared. `name` is relative to the watched directory.
    fn on_create(&self, name: &str);

    /// A file disappeared. `name` is relative to the watched directory.
    fn on_delete(&self, name: &str);
}
