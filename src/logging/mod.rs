// SPDX-License-Identifier: GPL-3.0-only
mod setup;

pub use setup::setup_logging;
