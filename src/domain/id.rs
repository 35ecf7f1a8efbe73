use serde::Serialize;
use std::ops;

/// Represents the ordered list of email identifiers of a folder,
/// oldest first.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Ids(pub Vec<String>);

impl ops::Deref for Ids {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<String> for Ids {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Returns `true` if the given identifier is strictly greater than
/// the watermark. Non numeric identifiers are never filtered out.
pub fn is_newer_than(id: &str, watermark: u32) -> bool {
    id.parse::<u32>()
        .map(|id| id > watermark)
        .unwrap_or(true)
}
