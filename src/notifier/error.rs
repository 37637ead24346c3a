// SPDX-License-Identifier: GPL-3.0-only
use crate::lister::{ConnectionError, ListingError};
use crate::utils::PathFormatError;

#[derive(thiserror::Error, Debug)]
pub enum NotifierError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Invalid target path: {0}")]
    PathFormat(#[from] PathFormatError),

    #[error("Connection failed: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Listing failed: {0}")]
    Listing(#[from] ListingError),

    #[error("Illegal state: {0}")]
    IllegalState(&'static str),

    #[error("No Tokio runtime available to run the poll loop")]
    Runtime,
}
