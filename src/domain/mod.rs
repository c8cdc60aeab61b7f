//! Strongly typed identifiers for catalog records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a movie row.
///
/// Keeps movie ids from being mixed up with country/genre/actor/language ids,
/// which share the same `i32` representation in the database.
///
/// ```rust
/// use theater::domain::MovieId;
///
/// let id = MovieId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(i32);

impl MovieId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MovieId> for i32 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl From<i32> for MovieId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// A page request that has already passed validation.
///
/// `number` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl PageRequest {
    /// Rows to skip. Saturates instead of overflowing on absurd page numbers.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    /// Whether this page lies past the last page for `total_items`.
    #[must_use]
    pub const fn is_past_end(&self, total_items: u64) -> bool {
        self.number > self.total_pages(total_items)
    }

    /// Number of pages needed to hold `total_items`.
    #[must_use]
    pub const fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.size)
    }
}
