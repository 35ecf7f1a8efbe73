use mailparse::ParsedMail;
use serde::Serialize;

use crate::email::{part_filename, Error, PartsIterator, Result};

/// Represents a decoded email part carrying a filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub mime: String,
    #[serde(skip)]
    pub body: Vec<u8>,
}

impl Attachment {
    /// Finds the first part of the email with the given filename and
    /// decodes its body.
    pub fn find(id: &str, parsed: &ParsedMail, filename: &str) -> Result<Option<Self>> {
        let part = PartsIterator::new(parsed)
            .find(|part| part_filename(part).as_deref() == Some(filename));

        match part {
            None => Ok(None),
            Some(part) => {
                let body = part
                    .get_body_raw()
                    .map_err(|err| Error::DecodePartError(err, id.to_owned(), filename.to_owned()))?;

                Ok(Some(Self {
                    filename: filename.to_owned(),
                    mime: part.ctype.mimetype.clone(),
                    body,
                }))
            }
        }
    }
}
