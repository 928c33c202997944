// src/component/component_request.rs
use super::GeoID;
use crate::types::{Timestamp, TimestampDiff, TypeDefaults};
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// Readout window requested from a single detector component.
///
/// The window is positioned relative to the trigger timestamp:
///
/// ```text
/// <=======|===>
/// ^ ts - offset
///         ^ ts
///             ^ ts - offset + width
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct ComponentRequest {
    pub component: GeoID,
    /// Subtracted from the trigger timestamp; may itself be negative
    pub window_offset: TimestampDiff,
    pub window_width: TimestampDiff,
}

impl ComponentRequest {
    pub fn new(component: GeoID, window_offset: TimestampDiff, window_width: TimestampDiff) -> Self {
        ComponentRequest {
            component,
            window_offset,
            window_width,
        }
    }

    /// First timestamp of the window, or `None` if it falls outside `u64`
    pub fn window_start(&self, trigger_timestamp: Timestamp) -> Option<Timestamp> {
        let start = i128::from(trigger_timestamp) - i128::from(self.window_offset);
        Timestamp::try_from(start).ok()
    }

    /// Timestamp one past the end of the window, or `None` if it falls outside `u64`
    pub fn window_end(&self, trigger_timestamp: Timestamp) -> Option<Timestamp> {
        let end = i128::from(trigger_timestamp) - i128::from(self.window_offset)
            + i128::from(self.window_width);
        Timestamp::try_from(end).ok()
    }
}

impl Default for ComponentRequest {
    fn default() -> Self {
        ComponentRequest {
            component: GeoID::default(),
            window_offset: TypeDefaults::INVALID_TIMESTAMP_DIFF,
            window_width: TypeDefaults::INVALID_TIMESTAMP_DIFF,
        }
    }
}

impl fmt::Display for ComponentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, offset: {}, width: {}",
            self.component, self.window_offset, self.window_width
        )
    }
}
