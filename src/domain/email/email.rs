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

use log::trace;
use mailparse::{MailHeaderMap, MailParseError, ParsedMail};
use serde::Serialize;
use std::result;
use thiserror::Error;

use crate::email::{is_attachment, part_filename, PartsIterator};

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot decode email {1}")]
    DecodeFailure(#[source] MailParseError, String),
    #[error("cannot decode part {2} of email {1}")]
    DecodePartError(#[source] MailParseError, String, String),
}

pub type Result<T> = result::Result<T, Error>;

/// Representation of a fully decoded email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Email {
    pub id: String,
    pub subject: String,
    pub from: String,
    /// Filenames of the parts declared as attachment.
    pub attachments: Vec<String>,
    /// Text plain parts that are not attachments, joined by a blank
    /// line.
    pub text_plain: Option<String>,
    /// Text HTML parts, joined by a blank line.
    pub text_html: Option<String>,
}

impl Email {
    pub fn from_raw(id: &str, raw: &[u8]) -> Result<Self> {
        let parsed = parse(id, raw)?;
        Self::from_parsed_mail(id, &parsed)
    }

    pub fn from_parsed_mail(id: &str, parsed: &ParsedMail) -> Result<Self> {
        let headers = parsed.get_headers();
        let mut email = Self {
            id: id.to_owned(),
            subject: headers.get_first_value("Subject").unwrap_or_default(),
            from: headers.get_first_value("From").unwrap_or_default(),
            ..Self::default()
        };

        for part in PartsIterator::new(parsed) {
            let attachment = is_attachment(part);

            if attachment {
                if let Some(filename) = part_filename(part) {
                    email.attachments.push(filename);
                }
                continue;
            }

            let body = match part.ctype.mimetype.as_str() {
                "text/plain" => &mut email.text_plain,
                "text/html" => &mut email.text_html,
                _ => continue,
            };

            let content = part.get_body().map_err(|err| {
                Error::DecodePartError(err, id.to_owned(), part.ctype.mimetype.clone())
            })?;

            match body {
                Some(body) => {
                    body.truncate(body.trim_end().len());
                    body.push_str("\n\n");
                    body.push_str(&content);
                }
                None => *body = Some(content),
            }
        }

        trace!("email: {:?}", email);
        Ok(email)
    }
}

/// Parses the raw email, mapping failures to
/// [`Error::DecodeFailure`].
pub fn parse<'a>(id: &str, raw: &'a [u8]) -> Result<ParsedMail<'a>> {
    mailparse::parse_mail(raw).map_err(|err| Error::DecodeFailure(err, id.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_email() {
        let email = Email::from_raw(
            "1",
            b"From: alice@localhost\nTo: bob@localhost\nSubject: Plain message\n\nCeci est un message.",
        )
        .unwrap();

        assert_eq!("1", email.id);
        assert_eq!("Plain message", email.subject);
        assert_eq!("alice@localhost", email.from);
        assert_eq!(Some("Ceci est un message."), email.text_plain.as_deref());
        assert_eq!(None, email.text_html);
        assert!(email.attachments.is_empty());
    }

    #[test]
    fn encoded_headers() {
        let email = Email::from_raw(
            "2",
            concat!(
                "From: =?UTF-8?Q?Ren=C3=A9?= <rene@localhost>\n",
                "Subject: =?UTF-8?B?Q2Fmw6kgZXQgY3JvaXNzYW50cw==?=\n",
                "\n",
                "Bonjour",
            )
            .as_bytes(),
        )
        .unwrap();

        assert_eq!("Café et croissants", email.subject);
        assert_eq!("René <rene@localhost>", email.from);
    }

    #[test]
    fn multipart_email() {
        let email = Email::from_raw(
            "3",
            r#"From: alice@localhost
Subject: Report
Content-Type: multipart/mixed; boundary=boundary

--boundary
Content-Type: text/plain

Hello!
--boundary
Content-Type: text/html

<p>Hello!</p>
--boundary
Content-Type: text/plain
Content-Disposition: attachment; filename="notes.txt"

Not a body.
--boundary
Content-Type: text/plain

How are you?
--boundary
Content-Type: application/pdf
Content-Disposition: attachment; filename="report.pdf"
Content-Transfer-Encoding: base64

SGVsbG8sIHdvcmxkIQ==
--boundary--"#
                .as_bytes(),
        )
        .unwrap();

        assert_eq!("Report", email.subject);
        assert_eq!(vec!["notes.txt", "report.pdf"], email.attachments);
        assert_eq!(
            Some("Hello!\n\nHow are you?\n"),
            email.text_plain.as_deref()
        );
        assert_eq!(Some("<p>Hello!</p>\n"), email.text_html.as_deref());
    }
}
