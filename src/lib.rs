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

//! Library to list, paginate and read the emails of an IMAP
//! mailbox.
//!
//! Every public operation of [`Mailbox`] opens its own session,
//! selects the folder, runs and then releases the session, whatever
//! the outcome.

pub(crate) mod process;

pub mod config;
pub use config::MailboxConfig;

pub mod backend;
#[cfg(feature = "imap-backend")]
pub use backend::{ImapConnector, ImapSession};
pub use backend::{Connect, Session, SessionGuard};

pub mod domain;
pub use domain::*;

pub mod mailbox;
pub use mailbox::{Error, Mailbox, Result};
