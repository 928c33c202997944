// src/lib.rs
//! # daq-dataformats
//!
//! Flat, self-describing binary records for trigger-driven detector readout.
//!
//! Every record is a fixed-size header followed by a run-time number of
//! fixed-size trailing elements, stored contiguously in one buffer, so the
//! whole thing can be handed to a socket, file or shared-memory segment as
//! a single byte slice.
//!
//! ## Features
//!
//! - **Zero-copy**: wrap a caller's buffer read-only or writable, or copy it
//!   into an owned, aligned buffer
//! - **Checked**: every element and error-bit access is bounds checked, and
//!   external buffers are validated before use
//! - **Typed**: header fields are read and written at fixed offsets through
//!   typed accessors, with no pointer casts
//!
//! ## Quick Start
//!
//! ```rust
//! use daq_dataformats::*;
//!
//! fn main() -> Result<()> {
//!     let components = vec![
//!         ComponentRequest::new(GeoID::new(1, 0), 1000, 2000),
//!         ComponentRequest::new(GeoID::new(1, 1), 1000, 2000),
//!     ];
//!
//!     let mut header = TriggerRecordHeader::new(&components)?;
//!     header.set_trigger_number(42)?;
//!     header.set_run_number(7)?;
//!
//!     // Ship the raw bytes somewhere, then read them back without copying
//!     let bytes = header.to_bytes();
//!     let view = TriggerRecordHeader::wrap(&bytes, BufferAdoptionMode::ReadOnly)?;
//!     assert_eq!(view.trigger_number(), 42);
//!     assert_eq!(view.at(1)?.component, GeoID::new(1, 1));
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Assembling a trigger record
//!
//! ```rust
//! use daq_dataformats::*;
//!
//! fn main() -> Result<()> {
//!     let request = ComponentRequest::new(GeoID::new(2, 5), 0, 64);
//!     let mut record = TriggerRecord::new(&[request])?;
//!
//!     let mut fragment = Fragment::new(&[0u8; 64])?;
//!     fragment.set_link_id(request.component)?;
//!     record.add_fragment(fragment);
//!
//!     let parsed = TriggerRecord::from_bytes(&record.to_bytes())?;
//!     assert_eq!(parsed.fragments().len(), 1);
//!     Ok(())
//! }
//! ```

// Modules
pub mod error;
pub mod types;
pub mod component;
pub mod flat;
pub mod trigger;
pub mod fragment;

mod utils;

// Re-export commonly used types at the crate root for convenience
pub use error::{DataFormatError, Result};

// Type exports
pub use types::{
    ErrorBits,
    FragmentSize,
    FragmentType,
    RunNumber,
    Timestamp,
    TimestampDiff,
    TriggerNumber,
    TriggerType,
    TypeDefaults,
};

// Component exports
pub use component::{
    GeoID,
    ComponentRequest,
};

// Flat record exports
pub use flat::{
    BufferAdoptionMode,
    FlatRecord,
    OwnedBuffer,
    RecordHeader,
};

// Trigger exports
pub use trigger::{
    TriggerRecord,
    TriggerRecordHeader,
    TriggerRecordHeaderData,
};

// Fragment exports
pub use fragment::{
    Fragment,
    FragmentHeader,
};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use daq_dataformats::prelude::*;
    //! ```

    pub use crate::error::{DataFormatError, Result};
    pub use crate::component::{ComponentRequest, GeoID};
    pub use crate::flat::BufferAdoptionMode;
    pub use crate::fragment::Fragment;
    pub use crate::trigger::{TriggerRecord, TriggerRecordHeader};
    pub use crate::types::ErrorBits;
}

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");
