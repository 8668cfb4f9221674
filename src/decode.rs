use thiserror::Error;

use crate::record::RecordType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Record was too short")]
    UnexpectedEnd,

    #[error("Cannot read {width} bytes at offset {offset} from a buffer of {len} bytes")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("Escape sentinel at position {position} is not followed by an escaped byte")]
    MalformedEscape { position: usize },

    #[error("Record length mismatch. Found {value}, expected {expected}")]
    Length { value: u16, expected: usize },

    #[error("CRC16 checksum mismatch. Found {value:#06x}, expected {expected:#06x}")]
    Checksum { value: u16, expected: u16 },

    #[error("Unknown record type {0:#06x}")]
    UnknownRecordType(u16),

    #[error("Unknown field {signature:#04x} in {record_type:?} record")]
    UnknownField {
        record_type: RecordType,
        signature: u8,
    },

    #[error("Field {signature:#04x} is {size} bytes long, expected {expected}")]
    FieldSize {
        signature: u8,
        size: usize,
        expected: usize,
    },
}

/// A type that can be reconstructed (decoded) from a raw sequence of bytes.
///
/// The input slice is advanced by the number of bytes consumed.
pub trait Decode {
    /// Attempts to decode `Self` from the beginning of the provided byte slice.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input is malformed or too short.
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError>
    where
        Self: Sized;
}

impl Decode for () {
    fn decode(_data: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(())
    }
}

macro_rules! impl_decode_for_primitive {
    ($($t:ty),*) => {
        $(
            impl Decode for $t {
                fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
                    let (bytes, rest) = data
                        .split_first_chunk::<{ std::mem::size_of::<$t>() }>()
                        .ok_or(DecodeError::UnexpectedEnd)?;
                    *data = rest;
                    Ok(Self::from_le_bytes(*bytes))
                }
            }
        )*
    };
}

impl_decode_for_primitive!(u8, u16, u32, u64, i8, i16, i32, i64, f32);

impl<const N: usize> Decode for [u8; N] {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        let (bytes, rest) = data
            .split_first_chunk::<N>()
            .ok_or(DecodeError::UnexpectedEnd)?;
        *data = rest;
        Ok(*bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::{Decode, DecodeError};

    #[test]
    fn advances_input() {
        let mut data: &[u8] = &[0x07, 0xDA, 0x26, 0x04];

        assert_eq!(u16::decode(&mut data), Ok(0xDA07));
        assert_eq!(u8::decode(&mut data), Ok(0x26));
        assert_eq!(data, &[0x04]);
    }

    #[test]
    fn too_short() {
        let mut data: &[u8] = &[0x88, 0x13, 0x00];

        assert_eq!(u32::decode(&mut data), Err(DecodeError::UnexpectedEnd));
        // Nothing is consumed on failure
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn float() {
        let mut data: &[u8] = &[0x00, 0x00, 0x61, 0x44];
        assert_eq!(f32::decode(&mut data), Ok(900.0));
    }
}
