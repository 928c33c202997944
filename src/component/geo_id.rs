// src/component/geo_id.rs
use crate::error::{DataFormatError, Result};
use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::str::FromStr;

/// Logical coordinate of a detector readout link.
///
/// Ordering is lexicographic on `(apa_number, link_number)`, so a `GeoID`
/// can key a `BTreeMap` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct GeoID {
    pub apa_number: u32,
    pub link_number: u32,
}

impl GeoID {
    pub const INVALID_APA_NUMBER: u32 = u32::MAX;
    pub const INVALID_LINK_NUMBER: u32 = u32::MAX;

    pub fn new(apa_number: u32, link_number: u32) -> Self {
        GeoID { apa_number, link_number }
    }

    /// True unless either coordinate still holds its sentinel
    pub fn is_valid(&self) -> bool {
        self.apa_number != Self::INVALID_APA_NUMBER && self.link_number != Self::INVALID_LINK_NUMBER
    }
}

impl Default for GeoID {
    fn default() -> Self {
        GeoID {
            apa_number: Self::INVALID_APA_NUMBER,
            link_number: Self::INVALID_LINK_NUMBER,
        }
    }
}

impl fmt::Display for GeoID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "APA: {}, link: {}", self.apa_number, self.link_number)
    }
}

impl FromStr for GeoID {
    type Err = DataFormatError;

    /// Parses the `Display` form, e.g. `"APA: 3, link: 7"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DataFormatError::InvalidGeoId(s.to_string());

        let rest = s.trim().strip_prefix("APA:").ok_or_else(invalid)?;
        let (apa, link) = rest.split_once(',').ok_or_else(invalid)?;
        let link = link.trim().strip_prefix("link:").ok_or_else(invalid)?;

        let apa_number = apa.trim().parse::<u32>().map_err(|_| invalid())?;
        let link_number = link.trim().parse::<u32>().map_err(|_| invalid())?;

        Ok(GeoID { apa_number, link_number })
    }
}
