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

//! IMAP backend module.
//!
//! This module contains the definition of the IMAP connector and the
//! IMAP session.

use log::{debug, log_enabled, trace, Level};
use native_tls::{TlsConnector, TlsStream};
use std::{
    borrow::Cow,
    io::{self, Read, Write},
    net::TcpStream,
    result,
};
use thiserror::Error;
use utf7_imap::{decode_utf7_imap as decode_utf7, encode_utf7_imap as encode_utf7};

use crate::{backend, config, Connect, Folder, Folders, Ids, MailboxConfig, Session};

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot create tls connector")]
    CreateTlsConnectorError(#[source] native_tls::Error),
    #[error("cannot connect to imap server")]
    ConnectImapServerError(#[source] imap::Error),
    #[error("cannot login to imap server")]
    LoginImapServerError(#[source] imap::Error),

    #[error(transparent)]
    ConfigError(#[from] config::Error),
}

pub type Result<T> = result::Result<T, Error>;

pub enum ImapSessionStream {
    Tls(TlsStream<TcpStream>),
    Tcp(TcpStream),
}

impl Read for ImapSessionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tls(stream) => stream.read(buf),
            Self::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for ImapSessionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tls(stream) => stream.write(buf),
            Self::Tcp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tls(stream) => stream.flush(),
            Self::Tcp(stream) => stream.flush(),
        }
    }
}

pub type ImapSession = imap::Session<ImapSessionStream>;

/// Opens IMAP sessions using the given mailbox configuration.
pub struct ImapConnector<'a> {
    config: Cow<'a, MailboxConfig>,
}

impl<'a> ImapConnector<'a> {
    pub fn new(config: Cow<'a, MailboxConfig>) -> Self {
        Self { config }
    }

    fn create_session(&self) -> Result<ImapSession> {
        let config = &self.config;

        let builder = TlsConnector::builder()
            .danger_accept_invalid_certs(config.insecure())
            .danger_accept_invalid_hostnames(config.insecure())
            .build()
            .map_err(Error::CreateTlsConnectorError)?;

        let mut client_builder = imap::ClientBuilder::new(&config.host, config.port);
        if config.starttls() {
            client_builder.starttls();
        }

        let timeout = config.timeout();
        let client = if config.ssl() || config.starttls() {
            client_builder.connect(|domain, tcp| {
                tcp.set_read_timeout(timeout)?;
                tcp.set_write_timeout(timeout)?;
                let connector = TlsConnector::connect(&builder, domain, tcp)?;
                Ok(ImapSessionStream::Tls(connector))
            })
        } else {
            client_builder.connect(|_, tcp| {
                tcp.set_read_timeout(timeout)?;
                tcp.set_write_timeout(timeout)?;
                Ok(ImapSessionStream::Tcp(tcp))
            })
        }
        .map_err(Error::ConnectImapServerError)?;

        let mut session = client
            .login(&config.login, &config.passwd()?)
            .map_err(|res| Error::LoginImapServerError(res.0))?;
        session.debug = log_enabled!(Level::Trace);

        Ok(session)
    }
}

impl Connect for ImapConnector<'_> {
    type Session = ImapSession;

    fn connect(&self) -> backend::Result<Self::Session> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        debug!("connecting to {} as {}", addr, self.config.login);

        self.create_session()
            .map_err(|err| backend::Error::ConnectionRefused(Box::new(err), addr))
    }
}

impl Session for ImapSession {
    fn list_folders(&mut self) -> backend::Result<Folders> {
        let names = self
            .list(Some(""), Some("*"))
            .map_err(|err| backend::Error::ListFoldersError(Box::new(err)))?;
        let folders = Folders::from_iter(names.iter().map(|name| Folder {
            delim: name.delimiter().unwrap_or_default().into(),
            name: decode_utf7(name.name().into()),
            desc: name
                .attributes()
                .iter()
                .map(|attr| format!("{:?}", attr))
                .collect::<Vec<_>>()
                .join(", "),
        }));

        trace!("imap folders: {:?}", folders);
        Ok(folders)
    }

    fn select_folder(&mut self, folder: &str) -> backend::Result<()> {
        let encoded = encode_utf7(folder.to_owned());
        debug!("utf7 encoded folder: {:?}", encoded);

        match self.select(&encoded) {
            Ok(mbox) => {
                debug!("folder {} has {} email(s)", folder, mbox.exists);
                Ok(())
            }
            Err(imap::Error::No(_)) => Err(backend::Error::FolderNotFound(folder.to_owned())),
            Err(err) => Err(backend::Error::SelectFolderError(
                Box::new(err),
                folder.to_owned(),
            )),
        }
    }

    fn search_ids(&mut self) -> backend::Result<Ids> {
        let mut uids: Vec<u32> = self
            .uid_search("ALL")
            .map_err(|err| backend::Error::SearchEmailsError(Box::new(err), "ALL".into()))?
            .into_iter()
            .collect();
        uids.sort_unstable();
        trace!("uids: {:?}", uids);

        Ok(Ids::from_iter(uids.into_iter().map(|uid| uid.to_string())))
    }

    fn fetch_headers(&mut self, id: &str) -> backend::Result<Option<Vec<u8>>> {
        let fetches = self
            .uid_fetch(id, "BODY.PEEK[HEADER]")
            .map_err(|err| backend::Error::FetchEmailError(Box::new(err), id.to_owned()))?;
        let headers = fetches
            .iter()
            .find_map(|fetch| fetch.header().map(<[u8]>::to_vec));

        Ok(headers)
    }

    fn fetch_email(&mut self, id: &str) -> backend::Result<Option<Vec<u8>>> {
        let fetches = self
            .uid_fetch(id, "BODY.PEEK[]")
            .map_err(|err| backend::Error::FetchEmailError(Box::new(err), id.to_owned()))?;
        let email = fetches
            .iter()
            .find_map(|fetch| fetch.body().map(<[u8]>::to_vec));

        Ok(email)
    }

    fn close(&mut self) -> backend::Result<()> {
        imap::Session::close(self).map_err(|err| backend::Error::CloseFolderError(Box::new(err)))
    }

    fn logout(&mut self) -> backend::Result<()> {
        imap::Session::logout(self).map_err(|err| backend::Error::LogoutError(Box::new(err)))
    }
}
