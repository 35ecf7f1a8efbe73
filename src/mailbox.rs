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

//! Mailbox module.
//!
//! This module contains the mailbox client. Each operation opens its
//! own session and releases it before returning, so results are
//! always fully materialized.

use log::{debug, trace, warn};
use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
    result,
};
use thiserror::Error;

use crate::{
    backend, config, email, id::is_newer_than, Attachment, Connect, Email, Envelope, Envelopes,
    Folders, Ids, MailboxConfig, PageWindow, Session, SessionGuard,
};

#[cfg(feature = "imap-backend")]
use crate::ImapConnector;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot run operation: missing {0}")]
    MissingArgument(&'static str),
    #[error("cannot run operation: invalid email id {0:?}")]
    InvalidId(String),
    #[error("cannot find email {0}")]
    EmailNotFound(String),
    #[error("cannot find attachment {1} in email {0}")]
    AttachmentNotFound(String, String),
    #[error("cannot save attachment: invalid filename {0:?}")]
    InvalidAttachmentFilename(String),
    #[error("cannot write attachment at {1}")]
    WriteAttachmentError(#[source] io::Error, PathBuf),

    #[error(transparent)]
    BackendError(#[from] backend::Error),
    #[error(transparent)]
    EmailError(#[from] email::Error),
    #[error(transparent)]
    ConfigError(#[from] config::Error),
}

pub type Result<T> = result::Result<T, Error>;

/// Client of a mailbox, generic over the way sessions are opened.
pub struct Mailbox<'a, C: Connect> {
    config: Cow<'a, MailboxConfig>,
    connector: C,
}

#[cfg(feature = "imap-backend")]
impl<'a> Mailbox<'a, ImapConnector<'a>> {
    /// Builds a mailbox connecting to the IMAP server described by
    /// the given configuration.
    pub fn from_config(config: Cow<'a, MailboxConfig>) -> Self {
        let connector = ImapConnector::new(config.clone());
        Self { config, connector }
    }
}

impl<'a, C: Connect> Mailbox<'a, C> {
    pub fn new(config: Cow<'a, MailboxConfig>, connector: C) -> Self {
        Self { config, connector }
    }

    pub fn config(&self) -> &MailboxConfig {
        &self.config
    }

    fn folder<'b>(&'b self, folder: Option<&'b str>) -> &'b str {
        folder
            .filter(|folder| !folder.is_empty())
            .unwrap_or_else(|| self.config.default_folder())
    }

    /// Opens a session and selects the given folder. The session is
    /// released when the returned guard goes out of scope.
    fn open(&self, folder: &str) -> Result<SessionGuard<C::Session>> {
        let mut session = SessionGuard::open(&self.connector)?;
        session.select(folder)?;
        Ok(session)
    }

    pub fn list_folders(&self) -> Result<Folders> {
        let mut session = SessionGuard::open(&self.connector)?;
        let folders = session.list_folders()?;
        debug!("found {} folder(s)", folders.len());
        Ok(folders)
    }

    /// Lists the identifiers of all the emails of the folder, oldest
    /// first. An empty folder gives an empty list.
    pub fn list_ids(&self, folder: Option<&str>) -> Result<Ids> {
        let folder = self.folder(folder);
        debug!("folder: {}", folder);

        let mut session = self.open(folder)?;
        let ids = session.search_ids()?;
        debug!("found {} email(s)", ids.len());
        trace!("ids: {:?}", ids);

        Ok(ids)
    }

    /// Lists the envelopes of the given page, newest page first.
    ///
    /// Emails with an identifier lower or equal to the configured
    /// `last-id` watermark are skipped. An email that cannot be
    /// fetched or decoded is logged and skipped, it does not abort
    /// the listing.
    pub fn list_envelopes(&self, folder: Option<&str>, page: usize) -> Result<Envelopes> {
        let folder = self.folder(folder);
        debug!("folder: {}", folder);
        debug!("page: {}", page);

        let mut session = self.open(folder)?;
        let ids = session.search_ids()?;

        let window = PageWindow::new(page, ids.len(), self.config.page_size());
        debug!("page window over {} email(s): {:?}", ids.len(), window);

        let last_id = self.config.last_id();
        let mut envelopes = Envelopes::default();

        for id in window
            .apply(ids.as_slice())
            .iter()
            .filter(|id| is_newer_than(id, last_id))
        {
            match fetch_envelope(&mut *session, id) {
                Ok(envelope) => envelopes.push(envelope),
                Err(err) => warn!("skipping email {}: {}", id, err),
            }
        }

        debug!("found {} envelope(s)", envelopes.len());
        trace!("envelopes: {:?}", envelopes);
        Ok(envelopes)
    }

    /// Gets the email matching the given identifier, fully decoded.
    /// The identifier must be a single UID.
    pub fn get_email(&self, folder: Option<&str>, id: &str) -> Result<Email> {
        check_id(id)?;

        let folder = self.folder(folder);
        debug!("folder: {}", folder);
        debug!("id: {}", id);

        let mut session = self.open(folder)?;
        let raw = session
            .fetch_email(id)?
            .ok_or_else(|| Error::EmailNotFound(id.to_owned()))?;
        drop(session);

        Ok(Email::from_raw(id, &raw)?)
    }

    /// Gets the first part of the email having the given filename,
    /// with its body decoded.
    pub fn get_attachment(
        &self,
        folder: Option<&str>,
        id: &str,
        filename: &str,
    ) -> Result<Attachment> {
        check_id(id)?;
        if filename.is_empty() {
            return Err(Error::MissingArgument("attachment filename"));
        }

        let folder = self.folder(folder);
        debug!("folder: {}", folder);
        debug!("id: {}", id);
        debug!("filename: {}", filename);

        let mut session = self.open(folder)?;
        let raw = session
            .fetch_email(id)?
            .ok_or_else(|| Error::EmailNotFound(id.to_owned()))?;
        drop(session);

        let parsed = email::parse(id, &raw)?;
        let attachment = Attachment::find(id, &parsed, filename)?
            .ok_or_else(|| Error::AttachmentNotFound(id.to_owned(), filename.to_owned()))?;
        debug!("found attachment {} ({})", attachment.filename, attachment.mime);

        Ok(attachment)
    }

    /// Saves the first part of the email having the given filename in
    /// the downloads directory, under that filename. Returns the path
    /// of the written file. Nothing is written if the attachment
    /// cannot be found.
    pub fn save_attachment(
        &self,
        folder: Option<&str>,
        id: &str,
        filename: &str,
    ) -> Result<PathBuf> {
        let attachment = self.get_attachment(folder, id, filename)?;

        // only the last component is kept, the attachment is never
        // written outside of the downloads directory
        let basename = Path::new(filename)
            .file_name()
            .ok_or_else(|| Error::InvalidAttachmentFilename(filename.to_owned()))?;

        let path = self.config.downloads_dir()?.join(basename);
        debug!("saving attachment at {:?}", path);
        fs::write(&path, &attachment.body)
            .map_err(|err| Error::WriteAttachmentError(err, path.clone()))?;

        Ok(path)
    }
}

/// Ensures the identifier is a single UID, so that sequence sets
/// like `*` or `1:*` never reach the server.
fn check_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::MissingArgument("email id"));
    }
    if !id.bytes().all(|byte| byte.is_ascii_digit()) || id.parse::<u32>().is_err() {
        return Err(Error::InvalidId(id.to_owned()));
    }
    Ok(())
}

fn fetch_envelope<S: Session>(session: &mut S, id: &str) -> Result<Envelope> {
    let raw = session
        .fetch_headers(id)?
        .ok_or_else(|| Error::EmailNotFound(id.to_owned()))?;
    Ok(Envelope::from_raw(id, &raw)?)
}
