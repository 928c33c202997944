// src/fragment/mod.rs
mod header;
mod record;

pub use header::FragmentHeader;
pub use record::Fragment;
