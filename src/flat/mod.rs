// src/flat/mod.rs
//! Fixed header plus trailing elements, stored in one buffer.
//!
//! How a record holds its bytes is internal; only the adoption mode is
//! chosen by callers.
//!
//! ```compile_fail
//! use daq_dataformats::flat::RecordStorage;
//! ```
mod storage;
mod record;

pub use storage::{BufferAdoptionMode, OwnedBuffer};
pub(crate) use storage::RecordStorage;
pub use record::{FlatRecord, RecordHeader};
