// mailbox-lib, a Rust library for IMAP mailbox access.
// Copyright (C) 2022  soywod <clement.douin@posteo.net>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Page module.
//!
//! Listings are paginated backward: page 0 contains the newest
//! emails, page 1 the ones right before, and so on.

/// Represents the boundaries of a page inside an ordered list of
/// identifiers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Index of the first identifier of the page.
    pub start: usize,
    /// Amount of trailing identifiers excluded from the page, `None`
    /// when the page goes up to the newest identifier.
    pub end: Option<usize>,
}

impl PageWindow {
    /// Computes the window of the given page over `total`
    /// identifiers. A zero page size is treated as 1.
    pub fn new(page: usize, total: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);

        if page == 0 {
            return Self {
                start: total.saturating_sub(page_size),
                end: None,
            };
        }

        let start = total.saturating_sub(page_size.saturating_mul(page));
        let mut span = page_size.saturating_mul(page - 1);
        if span > total {
            span = total.saturating_sub(page_size);
        }

        Self {
            start,
            end: Some(span).filter(|span| *span > 0),
        }
    }

    /// Returns the part of the given items covered by the window.
    /// Out of range boundaries give an empty or shorter slice.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = items.len().saturating_sub(self.end.unwrap_or_default());
        let start = self.start.min(end);
        &items[start..end]
    }
}
