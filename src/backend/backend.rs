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

//! Backend module.
//!
//! This module exposes the traits describing what the mailbox
//! expects from a mail server. They can be used to plug custom
//! server implementations.

use std::{error, result};
use thiserror::Error;

use crate::{Folders, Ids};

pub type BoxedError = Box<dyn error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot connect to mail server {1}")]
    ConnectionRefused(#[source] BoxedError, String),
    #[error("cannot find folder {0}")]
    FolderNotFound(String),
    #[error("cannot select folder {1}")]
    SelectFolderError(#[source] BoxedError, String),
    #[error("cannot list folders")]
    ListFoldersError(#[source] BoxedError),
    #[error("cannot search emails in folder {1}")]
    SearchEmailsError(#[source] BoxedError, String),
    #[error("cannot fetch email {1}")]
    FetchEmailError(#[source] BoxedError, String),
    #[error("cannot close folder")]
    CloseFolderError(#[source] BoxedError),
    #[error("cannot logout from mail server")]
    LogoutError(#[source] BoxedError),
}

pub type Result<T> = result::Result<T, Error>;

/// Live, authenticated connection to a mail server.
///
/// A session is owned by a single operation and never shared. Use
/// [`crate::SessionGuard`] to make sure it is released.
pub trait Session {
    fn list_folders(&mut self) -> Result<Folders>;

    /// Selects the given folder. Fails with [`Error::FolderNotFound`]
    /// when the server rejects the folder.
    fn select_folder(&mut self, folder: &str) -> Result<()>;

    /// Returns the identifiers of all the emails of the selected
    /// folder, in ascending order.
    fn search_ids(&mut self) -> Result<Ids>;

    /// Fetches the raw headers of the given email, `None` if the
    /// identifier does not resolve to any email. Fetching never marks
    /// the email as seen.
    fn fetch_headers(&mut self, id: &str) -> Result<Option<Vec<u8>>>;

    /// Fetches the raw email, `None` if the identifier does not
    /// resolve to any email. Fetching never marks the email as seen.
    fn fetch_email(&mut self, id: &str) -> Result<Option<Vec<u8>>>;

    fn close(&mut self) -> Result<()>;
    fn logout(&mut self) -> Result<()>;
}

/// Opens authenticated sessions.
pub trait Connect {
    type Session: Session;

    /// Connects and authenticates. Fails with
    /// [`Error::ConnectionRefused`].
    fn connect(&self) -> Result<Self::Session>;
}
