// mailbox-lib, a Rust library for IMAP mailbox access.
// Copyright (C) 2022  soywod <clement.douin@posteo.net>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Mailbox config module.
//!
//! This module contains the representation of the mailbox
//! configuration: where the IMAP server lives, how to authenticate
//! and how listings are paginated. The configuration is read once
//! and never mutated afterwards.

use serde::Deserialize;
use std::{env, fmt, path::PathBuf, result, str::FromStr, time::Duration};
use thiserror::Error;

use crate::process;

pub const DEFAULT_ENV_PREFIX: &str = "MAILBOX";
pub const DEFAULT_PAGE_SIZE: usize = 3;
pub const DEFAULT_FOLDER: &str = "INBOX";

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot find environment variable {0}")]
    GetEnvVarError(String),
    #[error("cannot parse environment variable {0}: invalid value {1:?}")]
    ParseEnvVarError(String, String),
    #[error("cannot get mailbox password")]
    GetPasswdError(#[source] process::Error),
    #[error("cannot get mailbox password: password is empty")]
    GetPasswdEmptyError,
    #[error("cannot get mailbox password: no password nor password command defined")]
    GetPasswdUndefinedError,
    #[error("cannot expand downloads directory {1}")]
    ExpandDownloadsDirError(#[source] shellexpand::LookupError<env::VarError>, String),
}

pub type Result<T> = result::Result<T, Error>;

/// Represents the mailbox configuration.
#[derive(Default, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MailboxConfig {
    /// Represents the IMAP server host.
    pub host: String,
    /// Represents the IMAP server port.
    pub port: u16,
    /// Enables implicit TLS. Defaults to `true`.
    pub ssl: Option<bool>,
    /// Enables StartTLS.
    pub starttls: Option<bool>,
    /// Trusts any certificate.
    pub insecure: Option<bool>,
    /// Represents the IMAP server login.
    pub login: String,
    /// Represents the IMAP server password.
    pub passwd: Option<String>,
    /// Represents the command used to retrieve the password. Only
    /// the first line of its output is used.
    pub passwd_cmd: Option<String>,

    /// Represents the amount of emails per page.
    pub page_size: Option<usize>,
    /// Represents the folder used when none is given.
    pub default_folder: Option<String>,
    /// Emails with an identifier lower or equal to this watermark
    /// are considered already seen and skipped from listings.
    pub last_id: Option<u32>,
    /// Represents the directory attachments are saved in.
    pub downloads_dir: Option<PathBuf>,
    /// Represents the socket read and write timeout, in seconds.
    pub timeout: Option<u64>,
}

impl fmt::Debug for MailboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailboxConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("ssl", &self.ssl)
            .field("starttls", &self.starttls)
            .field("insecure", &self.insecure)
            .field("login", &self.login)
            .field("passwd", &self.passwd.as_ref().map(|_| "<redacted>"))
            .field("passwd_cmd", &self.passwd_cmd)
            .field("page_size", &self.page_size)
            .field("default_folder", &self.default_folder)
            .field("last_id", &self.last_id)
            .field("downloads_dir", &self.downloads_dir)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl MailboxConfig {
    /// Builds the configuration from the `MAILBOX_*` environment
    /// variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_prefixed(DEFAULT_ENV_PREFIX)
    }

    /// Builds the configuration from the environment variables
    /// starting with the given prefix, for example `MAILBOX_TEST`
    /// for `MAILBOX_TEST_HOST`, `MAILBOX_TEST_PORT` etc.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self> {
        Self::from_lookup(prefix, |key| env::var(key).ok())
    }

    /// Builds the configuration using the given lookup function to
    /// resolve variables. Empty values are considered undefined.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            let key = format!("{}_{}", prefix, key);
            match lookup(&key) {
                Some(val) if !val.trim().is_empty() => Some((key, val.trim().to_owned())),
                _ => None,
            }
        };
        let required = |key: &str| {
            var(key)
                .map(|(_, val)| val)
                .ok_or_else(|| Error::GetEnvVarError(format!("{}_{}", prefix, key)))
        };

        let port = parse_var(format!("{}_PORT", prefix), required("PORT")?)?;

        Ok(Self {
            host: required("HOST")?,
            port,
            ssl: parse_opt_var(var("SSL"))?,
            starttls: parse_opt_var(var("STARTTLS"))?,
            insecure: parse_opt_var(var("INSECURE"))?,
            login: required("LOGIN")?,
            passwd: var("PASSWORD").map(|(_, val)| val),
            passwd_cmd: var("PASSWD_CMD").map(|(_, val)| val),
            page_size: parse_opt_var(var("COUNT_MAIL"))?,
            default_folder: var("FOLDER").map(|(_, val)| val),
            last_id: parse_opt_var(var("LAST_ID"))?,
            downloads_dir: var("DOWNLOADS_DIR").map(|(_, val)| PathBuf::from(val)),
            timeout: parse_opt_var(var("TIMEOUT"))?,
        })
    }

    /// Gets the IMAP server password, either the plain one or the
    /// first line of the password command output.
    pub fn passwd(&self) -> Result<String> {
        if let Some(passwd) = self.passwd.as_ref() {
            return Ok(passwd.to_owned());
        }

        let cmd = self
            .passwd_cmd
            .as_ref()
            .ok_or(Error::GetPasswdUndefinedError)?;
        let passwd = process::run(cmd).map_err(Error::GetPasswdError)?;
        let passwd = passwd
            .lines()
            .next()
            .filter(|line| !line.is_empty())
            .ok_or(Error::GetPasswdEmptyError)?;

        Ok(passwd.to_owned())
    }

    /// Gets the SSL option.
    pub fn ssl(&self) -> bool {
        self.ssl.unwrap_or(true)
    }

    /// Gets the StartTLS option.
    pub fn starttls(&self) -> bool {
        self.starttls.unwrap_or_default()
    }

    /// Gets the insecure option.
    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or_default()
    }

    /// Gets the page size, never lower than 1.
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    pub fn default_folder(&self) -> &str {
        self.default_folder
            .as_deref()
            .filter(|folder| !folder.is_empty())
            .unwrap_or(DEFAULT_FOLDER)
    }

    pub fn last_id(&self) -> u32 {
        self.last_id.unwrap_or_default()
    }

    /// Gets the downloads directory with `~` and environment
    /// variables expanded. Defaults to the current directory.
    pub fn downloads_dir(&self) -> Result<PathBuf> {
        match self.downloads_dir.as_ref() {
            None => Ok(PathBuf::from(".")),
            Some(dir) => {
                let dir = dir.to_string_lossy();
                let expanded = shellexpand::full(&dir)
                    .map_err(|err| Error::ExpandDownloadsDirError(err, dir.to_string()))?;
                Ok(PathBuf::from(expanded.as_ref()))
            }
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

fn parse_var<T: FromStr>(key: String, val: String) -> Result<T> {
    val.parse().map_err(|_| Error::ParseEnvVarError(key, val))
}

fn parse_opt_var<T: FromStr>(var: Option<(String, String)>) -> Result<Option<T>> {
    var.map(|(key, val)| parse_var(key, val)).transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, val)| (key.to_string(), val.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn from_lookup_with_minimal_vars() {
        let config = MailboxConfig::from_lookup(
            "MAILBOX",
            lookup(&[
                ("MAILBOX_HOST", "imap.localhost"),
                ("MAILBOX_PORT", "993"),
                ("MAILBOX_LOGIN", "alice@localhost"),
                ("MAILBOX_PASSWORD", "secret"),
            ]),
        )
        .unwrap();

        assert_eq!("imap.localhost", config.host);
        assert_eq!(993, config.port);
        assert_eq!("alice@localhost", config.login);
        assert_eq!("secret", config.passwd().unwrap());
        assert!(config.ssl());
        assert!(!config.starttls());
        assert_eq!(DEFAULT_PAGE_SIZE, config.page_size());
        assert_eq!("INBOX", config.default_folder());
        assert_eq!(0, config.last_id());
        assert_eq!(None, config.timeout());
        assert_eq!(PathBuf::from("."), config.downloads_dir().unwrap());
    }

    #[test]
    fn from_lookup_with_custom_prefix() {
        let config = MailboxConfig::from_lookup(
            "MAILBOX_TEST",
            lookup(&[
                ("MAILBOX_TEST_HOST", "localhost"),
                ("MAILBOX_TEST_PORT", "3143"),
                ("MAILBOX_TEST_LOGIN", "bob@localhost"),
                ("MAILBOX_TEST_SSL", "false"),
                ("MAILBOX_TEST_COUNT_MAIL", "10"),
                ("MAILBOX_TEST_FOLDER", "Archives"),
                ("MAILBOX_TEST_LAST_ID", "42"),
                ("MAILBOX_TEST_TIMEOUT", "30"),
            ]),
        )
        .unwrap();

        assert!(!config.ssl());
        assert_eq!(10, config.page_size());
        assert_eq!("Archives", config.default_folder());
        assert_eq!(42, config.last_id());
        assert_eq!(Some(Duration::from_secs(30)), config.timeout());
    }

    #[test]
    fn from_lookup_missing_host() {
        let err = MailboxConfig::from_lookup(
            "MAILBOX",
            lookup(&[("MAILBOX_PORT", "993"), ("MAILBOX_LOGIN", "alice")]),
        )
        .unwrap_err();

        assert!(matches!(err, Error::GetEnvVarError(key) if key == "MAILBOX_HOST"));
    }

    #[test]
    fn from_lookup_invalid_port() {
        let err = MailboxConfig::from_lookup(
            "MAILBOX",
            lookup(&[
                ("MAILBOX_HOST", "localhost"),
                ("MAILBOX_PORT", "imaps"),
                ("MAILBOX_LOGIN", "alice"),
            ]),
        )
        .unwrap_err();

        assert!(
            matches!(err, Error::ParseEnvVarError(key, val) if key == "MAILBOX_PORT" && val == "imaps")
        );
    }

    #[test]
    fn page_size_is_never_zero() {
        let config = MailboxConfig {
            page_size: Some(0),
            ..MailboxConfig::default()
        };

        assert_eq!(1, config.page_size());
    }

    #[test]
    fn passwd_undefined() {
        let config = MailboxConfig::default();

        assert!(matches!(
            config.passwd(),
            Err(Error::GetPasswdUndefinedError)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn passwd_from_cmd() {
        let config = MailboxConfig {
            passwd_cmd: Some("printf 'password\\nignored'".into()),
            ..MailboxConfig::default()
        };

        assert_eq!("password", config.passwd().unwrap());
    }

    #[test]
    fn debug_hides_passwd() {
        let config = MailboxConfig {
            passwd: Some("secret".into()),
            ..MailboxConfig::default()
        };

        assert!(!format!("{:?}", config).contains("secret"));
    }
}
