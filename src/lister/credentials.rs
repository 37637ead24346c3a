// SPDX-License-Identifier: GPL-3.0-only
use std::fmt;

/// NTLM-style identity used to open a session on a share
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub domain: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        domain: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse the `DOMAIN;user:password` user-info form.
    ///
    /// Both the domain and the password are optional, so `user` and
    /// `user:password` are accepted as well.
    pub fn parse(user_info: &str) -> Self {
        let (domain, rest) = match user_info.split_once(';') {
            Some((domain, rest)) => (domain, rest),
            None => ("", user_info),
        };
        let (username, password) = rest.split_once(':').unwrap_or((rest, ""));

        Self::new(domain, username, password)
    }

    pub fn is_empty(&self) -> bool {
        self.username.trim().is_empty()
    }

    /// `DOMAIN\user`, or just `user` without a domain
    pub fn principal(&self) -> String {
        if self.domain.is_empty() {
            self.username.clone()
        } else {
            format!("{}\\{}", self.domain, self.username)
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
