//! Pagination metadata returned alongside windowed results.

use serde::{Deserialize, Serialize};

/// Window position and size within a larger sequence.
///
/// For the library listing `limit` is the number of songs returned; for
/// lyrics it is the number of verses. `total` always counts every item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of items in the window.
    pub limit: u64,
    /// Number of items skipped before the window.
    pub offset: u64,
    /// Number of items available.
    pub total: u64,
}

impl Pagination {
    /// Creates a new descriptor.
    pub fn new(limit: u64, offset: u64, total: u64) -> Self {
        Self {
            limit,
            offset,
            total,
        }
    }

    /// Returns true if items remain after this window.
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total
    }
}
