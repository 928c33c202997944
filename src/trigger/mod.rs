// src/trigger/mod.rs
mod header_data;
mod header;
mod record;

pub use header_data::TriggerRecordHeaderData;
pub use header::TriggerRecordHeader;
pub use record::TriggerRecord;
