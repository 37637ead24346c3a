// SPDX-License-Identifier: GPL-3.0-only
//! Polling notifier for file creation and deletion in a remote (SMB) directory.
//!
//! A [`Notifier`] snapshots the directory when it connects, then a background
//! loop lists it at a fixed interval and reports every name that appeared or
//! disappeared to a [`NotificationHandler`].

pub mod cli;
pub mod config;
pub mod lister;
pub mod logging;
pub mod notifier;
pub mod utils;

#[cfg(test)]
mod test_helpers;

pub use lister::{Credentials, DirectoryLister, DirectorySession, MountedShareLister};
pub use notifier::{
    CallbackHandler, Changes, ConsoleHandler, LifecycleState, NotificationHandler, Notifier,
    NotifierBuilder, NotifierError,
};
