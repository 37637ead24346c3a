// SPDX-License-Identifier: GPL-3.0-only
pub mod traits;
pub mod handlers;
pub mod diff;
pub mod state;
pub mod error;
pub mod engine;

pub use traits::NotificationHandler;
pub use handlers::{CallbackHandler, ConsoleHandler};
pub use diff::{diff, Changes};
pub use state::LifecycleState;
pub use error::NotifierError;
pub use engine::{Notifier, NotifierBuilder};
