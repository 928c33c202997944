// src/utils/field.rs
use crate::component::GeoID;
use byteorder::{ByteOrder, NativeEndian};

/// Scalar header field stored in native byte order at a fixed offset.
pub(crate) trait Field: Copy {
    const SIZE: usize;

    fn decode(bytes: &[u8]) -> Self;
    fn encode(self, bytes: &mut [u8]);
}

impl Field for u16 {
    const SIZE: usize = 2;

    fn decode(bytes: &[u8]) -> Self {
        NativeEndian::read_u16(bytes)
    }

    fn encode(self, bytes: &mut [u8]) {
        NativeEndian::write_u16(bytes, self)
    }
}

impl Field for u32 {
    const SIZE: usize = 4;

    fn decode(bytes: &[u8]) -> Self {
        NativeEndian::read_u32(bytes)
    }

    fn encode(self, bytes: &mut [u8]) {
        NativeEndian::write_u32(bytes, self)
    }
}

impl Field for u64 {
    const SIZE: usize = 8;

    fn decode(bytes: &[u8]) -> Self {
        NativeEndian::read_u64(bytes)
    }

    fn encode(self, bytes: &mut [u8]) {
        NativeEndian::write_u64(bytes, self)
    }
}

impl Field for i64 {
    const SIZE: usize = 8;

    fn decode(bytes: &[u8]) -> Self {
        NativeEndian::read_i64(bytes)
    }

    fn encode(self, bytes: &mut [u8]) {
        NativeEndian::write_i64(bytes, self)
    }
}

// Two consecutive u32s, matching the repr(C) layout of GeoID
impl Field for GeoID {
    const SIZE: usize = 8;

    fn decode(bytes: &[u8]) -> Self {
        GeoID {
            apa_number: NativeEndian::read_u32(&bytes[0..4]),
            link_number: NativeEndian::read_u32(&bytes[4..8]),
        }
    }

    fn encode(self, bytes: &mut [u8]) {
        NativeEndian::write_u32(&mut bytes[0..4], self.apa_number);
        NativeEndian::write_u32(&mut bytes[4..8], self.link_number);
    }
}

/// Callers guarantee `offset + T::SIZE <= bytes.len()`.
pub(crate) fn read_field<T: Field>(bytes: &[u8], offset: usize) -> T {
    T::decode(&bytes[offset..offset + T::SIZE])
}

pub(crate) fn write_field<T: Field>(bytes: &mut [u8], offset: usize, value: T) {
    value.encode(&mut bytes[offset..offset + T::SIZE])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_order_matches_to_ne_bytes() {
        let mut bytes = [0u8; 16];
        write_field(&mut bytes, 4, 0x1122_3344u32);
        assert_eq!(bytes[4..8], 0x1122_3344u32.to_ne_bytes());
        assert_eq!(read_field::<u32>(&bytes, 4), 0x1122_3344);

        write_field(&mut bytes, 8, -2i64);
        assert_eq!(read_field::<i64>(&bytes, 8), -2);
    }

    #[test]
    fn test_geo_id_field_matches_pod_image() {
        let id = GeoID::new(7, 9);
        let mut bytes = [0u8; 8];
        write_field(&mut bytes, 0, id);
        assert_eq!(&bytes[..], bytemuck::bytes_of(&id));
        assert_eq!(read_field::<GeoID>(&bytes, 0), id);
    }
}
