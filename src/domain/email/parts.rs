use mailparse::{DispositionType, ParsedMail};
use std::collections::VecDeque;

/// Walks all the parts of a parsed email, the root part included,
/// breadth first.
#[derive(Debug)]
pub struct PartsIterator<'a> {
    queue: VecDeque<&'a ParsedMail<'a>>,
}

impl<'a> PartsIterator<'a> {
    pub fn new(part: &'a ParsedMail<'a>) -> Self {
        Self {
            queue: VecDeque::from([part]),
        }
    }
}

impl<'a> Iterator for PartsIterator<'a> {
    type Item = &'a ParsedMail<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let part = self.queue.pop_front()?;
        self.queue.extend(part.subparts.iter());
        Some(part)
    }
}

/// Returns `true` if the part is declared as attachment by its
/// Content-Disposition header.
pub fn is_attachment(part: &ParsedMail) -> bool {
    part.get_content_disposition().disposition == DispositionType::Attachment
}

/// Gets the filename of the part, from the Content-Disposition
/// `filename` parameter or the Content-Type `name` parameter.
pub fn part_filename(part: &ParsedMail) -> Option<String> {
    part.get_content_disposition()
        .params
        .get("filename")
        .or_else(|| part.ctype.params.get("name"))
        .filter(|filename| !filename.is_empty())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTIPART: &str = r#"MIME-Version: 1.0
From: from@localhost
To: to@localhost
Subject: subject
Content-Type: multipart/mixed; boundary=boundary

--boundary
Content-Type: multipart/alternative; boundary=alternative

--alternative
Content-Type: text/plain

Hello!
--alternative
Content-Type: text/html

<h1>Hello!</h1>
--alternative--

--boundary
Content-Type: application/pdf; name="report.pdf"
Content-Disposition: attachment; filename="report.pdf"
Content-Transfer-Encoding: base64

SGVsbG8sIHdvcmxkIQ==
--boundary--"#;

    #[test]
    fn single_part() {
        let email = mailparse::parse_mail(b"Subject: subject\n\nHello!").unwrap();
        let parts = PartsIterator::new(&email).collect::<Vec<_>>();

        assert_eq!(1, parts.len());
        assert_eq!("text/plain", parts[0].ctype.mimetype);
    }

    #[test]
    fn nested_parts_breadth_first() {
        let email = mailparse::parse_mail(MULTIPART.as_bytes()).unwrap();
        let mimetypes = PartsIterator::new(&email)
            .map(|part| part.ctype.mimetype.as_str())
            .collect::<Vec<_>>();

        assert_eq!(
            vec![
                "multipart/mixed",
                "multipart/alternative",
                "application/pdf",
                "text/plain",
                "text/html",
            ],
            mimetypes
        );
    }

    #[test]
    fn attachment_filename() {
        let email = mailparse::parse_mail(MULTIPART.as_bytes()).unwrap();
        let attachments = PartsIterator::new(&email)
            .filter(|part| is_attachment(part))
            .filter_map(part_filename)
            .collect::<Vec<_>>();

        assert_eq!(vec![String::from("report.pdf")], attachments);
    }
}
