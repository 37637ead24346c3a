// SPDX-License-Identifier: GPL-3.0-only
pub mod traits;
pub mod credentials;
pub mod mounted;

pub use traits::{ConnectionError, DirectoryLister, DirectorySession, ListingError};
pub use credentials::Credentials;
pub use mounted::MountedShareLister;
