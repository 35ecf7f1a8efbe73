//! Folder module.
//!
//! This module contains the representation of the mailbox folders.

use serde::Serialize;
use std::{fmt, ops};

/// Represents a folder of the mailbox.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Folder {
    /// Represents the folder hierarchy delimiter.
    pub delim: String,
    /// Represents the folder name, UTF-7 decoded.
    pub name: String,
    /// Represents the folder attributes, comma separated.
    pub desc: String,
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Represents the list of folders.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Folders(pub Vec<Folder>);

impl Folders {
    pub fn find(&self, name: &str) -> Option<&Folder> {
        self.iter()
            .find(|folder| folder.name.eq_ignore_ascii_case(name))
    }
}

impl ops::Deref for Folders {
    type Target = Vec<Folder>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Folder> for Folders {
    fn from_iter<T: IntoIterator<Item = Folder>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
