// SPDX-License-Identifier: GPL-3.0-only
pub mod target_url;

pub use target_url::{parse_target, PathFormatError};
