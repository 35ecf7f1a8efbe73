pub mod envelope;
pub use envelope::Envelope;

pub mod envelopes;
pub use envelopes::Envelopes;
