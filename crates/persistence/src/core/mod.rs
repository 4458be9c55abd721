//! Core storage traits.
//!
//! - [`SongStorage`] - catalog reads and writes consumed by the HTTP layer

mod storage;

pub use storage::SongStorage;
