#[cfg(feature = "imap-backend")]
use log::LevelFilter;
#[cfg(feature = "imap-backend")]
use std::borrow::Cow;

#[cfg(feature = "imap-backend")]
use mailbox_lib::{backend, Error, Mailbox, MailboxConfig};

/// Runs against the IMAP server described by the `MAILBOX_TEST_*`
/// environment variables, for example:
///
/// ```sh
/// MAILBOX_TEST_HOST=localhost MAILBOX_TEST_PORT=3143 MAILBOX_TEST_SSL=false \
/// MAILBOX_TEST_LOGIN=bob@localhost MAILBOX_TEST_PASSWORD=password cargo test
/// ```
#[cfg(feature = "imap-backend")]
#[test]
fn test_imap_backend() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .try_init();

    let config = match MailboxConfig::from_env_prefixed("MAILBOX_TEST") {
        Ok(config) => config,
        Err(err) => {
            eprintln!("skipping imap backend test: {}", err);
            return;
        }
    };
    let page_size = config.page_size();
    let mailbox = Mailbox::from_config(Cow::Owned(config));

    // checking that the inbox can be found
    let folders = mailbox.list_folders().unwrap();
    assert!(folders.find("INBOX").is_some());

    // checking that identifiers are listed in ascending order
    let ids = mailbox.list_ids(None).unwrap();
    let uids = ids
        .iter()
        .map(|id| id.parse::<u32>().unwrap())
        .collect::<Vec<_>>();
    assert!(uids.windows(2).all(|pair| pair[0] < pair[1]));

    // checking that the first page contains the newest envelopes
    let envelopes = mailbox.list_envelopes(None, 0).unwrap();
    assert!(envelopes.len() <= page_size);
    if let Some(envelope) = envelopes.last() {
        assert_eq!(ids.last(), Some(&envelope.id));

        let email = mailbox.get_email(None, &envelope.id).unwrap();
        assert_eq!(envelope.subject, email.subject);
    }

    // checking that unknown folders are reported
    let err = mailbox.list_ids(Some("NoFolder")).unwrap_err();
    assert!(matches!(
        err,
        Error::BackendError(backend::Error::FolderNotFound(_))
    ));
}
