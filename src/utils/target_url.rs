// SPDX-License-Identifier: GPL-3.0-only
use url::Url;

/// Maximum allowed URL length
const MAX_URL_LENGTH: usize = 2048;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathFormatError {
    #[error("No target directory given")]
    Missing,

    #[error("Target URL exceeds maximum length of {} characters", MAX_URL_LENGTH)]
    TooLong,

    #[error("Malformed target URL {input:?}: {reason}")]
    Malformed { input: String, reason: String },

    #[error("Unsupported URL scheme: {0} (only smb and file are allowed)")]
    UnsupportedScheme(String),

    #[error("SMB URL must name a host: {0}")]
    MissingHost(String),

    #[error("Directory URL must end with '/': {0}")]
    NotADirectory(String),
}

/// Parse and validate the directory to watch
///
/// Accepts `smb://host/share/dir/` and `file:///dir/`. Directory URLs must
/// end with a slash.
pub fn parse_target(raw: &str) -> Result<Url, PathFormatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathFormatError::Missing);
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(PathFormatError::TooLong);
    }

    let url = Url::parse(trimmed).map_err(|e| PathFormatError::Malformed {
        input: trimmed.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "smb" => {
            if url.host_str().is_none_or(str::is_empty) {
                return Err(PathFormatError::MissingHost(trimmed.to_string()));
            }
        }
        "file" => {}
        scheme => return Err(PathFormatError::UnsupportedScheme(scheme.to_string())),
    }

    if !url.path().ends_with('/') {
        return Err(PathFormatError::NotADirectory(trimmed.to_string()));
    }

    Ok(url)
}
