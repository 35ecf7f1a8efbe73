use mailparse::MailHeaderMap;
use serde::Serialize;

use crate::email;

/// Represents the email envelope. The envelope is just an email
/// subset built from headers only, and is mostly used for listings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Envelope {
    /// Represents the identifier.
    pub id: String,
    /// Represents the Subject header.
    pub subject: String,
    /// Represents the From header.
    pub from: String,
}

impl Envelope {
    /// Builds the envelope from raw headers. Header values are decoded
    /// by mailparse, as UTF-8 or Latin-1 when they are not valid UTF-8.
    pub fn from_raw(id: &str, raw: &[u8]) -> email::Result<Self> {
        let (headers, _) = mailparse::parse_headers(raw)
            .map_err(|err| email::Error::DecodeFailure(err, id.to_owned()))?;

        Ok(Self {
            id: id.to_owned(),
            subject: headers.get_first_value("Subject").unwrap_or_default(),
            from: headers.get_first_value("From").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Envelope;

    #[test]
    fn from_raw_headers() {
        let envelope = Envelope::from_raw(
            "12",
            b"From: Alice <alice@localhost>\r\nSubject: =?ISO-8859-1?Q?caf=E9?=\r\n\r\n",
        )
        .unwrap();

        assert_eq!(
            Envelope {
                id: "12".into(),
                subject: "café".into(),
                from: "Alice <alice@localhost>".into(),
            },
            envelope
        );
    }

    #[test]
    fn from_raw_latin1_headers() {
        let envelope = Envelope::from_raw("13", b"Subject: caf\xe9\r\n\r\n").unwrap();

        assert_eq!("café", envelope.subject);
        assert_eq!("", envelope.from);
    }
}
