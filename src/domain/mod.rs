pub mod email;
pub use email::{Attachment, Email, PartsIterator};

pub mod envelope;
pub use envelope::{Envelope, Envelopes};

pub mod folder;
pub use folder::{Folder, Folders};

pub mod id;
pub use id::Ids;

pub mod page;
pub use page::PageWindow;
