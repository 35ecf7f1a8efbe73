//! IMAP backend module.
//!
//! This module contains the [`crate::Connect`] and
//! [`crate::Session`] implementations backed by the `imap` crate.

mod backend;

pub use self::backend::{Error, ImapConnector, ImapSession, ImapSessionStream, Result};
