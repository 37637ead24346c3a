// SPDX-License-Identifier: GPL-3.0-only
use clap::error::ErrorKind;
use clap::Parser;
use crate::lister::Credentials;

const USAGE: &str = "Usage: smb-notifier \"<smb url>\" \"<domain>\" \"<login name>\" \"<password>\"";

/// Print a line for every file created in or deleted from an SMB directory
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "smb-notifier", version, about)]
pub struct Cli {
    /// Directory to watch, e.g. smb://host/share/dir/ (must end with '/')
    pub url: String,

    /// Authentication domain or workgroup
    pub domain: String,

    /// Login name
    pub username: String,

    /// Password
    pub password: String,

    /// Poll interval in milliseconds, overriding the configuration
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,
}

impl Cli {
    /// Parse the process arguments. Exits with status 1 and the usage line
    /// when arguments are missing or invalid.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
            Err(e) => {
                eprintln!("{e}");
                println!("{USAGE}");
                std::process::exit(1);
            }
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.domain, &self.username, &self.password)
    }
}
