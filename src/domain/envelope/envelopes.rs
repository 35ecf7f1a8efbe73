use serde::Serialize;
use std::ops;

use crate::Envelope;

/// Represents the list of envelopes.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Envelopes {
    pub envelopes: Vec<Envelope>,
}

impl ops::Deref for Envelopes {
    type Target = Vec<Envelope>;

    fn deref(&self) -> &Self::Target {
        &self.envelopes
    }
}

impl ops::DerefMut for Envelopes {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.envelopes
    }
}

impl FromIterator<Envelope> for Envelopes {
    fn from_iter<T: IntoIterator<Item = Envelope>>(iter: T) -> Self {
        Self {
            envelopes: iter.into_iter().collect(),
        }
    }
}
