mod backend;
mod session;

#[cfg(feature = "imap-backend")]
pub mod imap;

pub use self::backend::{BoxedError, Connect, Error, Result, Session};
pub use self::session::SessionGuard;
#[cfg(feature = "imap-backend")]
pub use self::imap::{ImapConnector, ImapSession, ImapSessionStream};
