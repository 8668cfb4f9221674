//! Typed field values and the numeric codec behind them.
//!
//! A field on the wire is `signature (u8) ++ size (u8) ++ value (size bytes)`. The signature
//! only has meaning within a given record type, and the wire type of each known signature is
//! fixed by the schema in [`record`](crate::record).

use crate::{
    decode::{Decode, DecodeError},
    encode::{Encode, EncodeError},
};

/// The representation of a field value on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WireType {
    U8,
    U16,
    U32,
    U64,
    F32,
}

impl WireType {
    /// Number of bytes a value of this type takes on the wire.
    pub const fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
            Self::U64 => 8,
        }
    }
}

/// A single decoded (or to be encoded) field value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
}

impl FieldValue {
    pub const fn wire_type(&self) -> WireType {
        match self {
            Self::U8(_) => WireType::U8,
            Self::U16(_) => WireType::U16,
            Self::U32(_) => WireType::U32,
            Self::U64(_) => WireType::U64,
            Self::F32(_) => WireType::F32,
        }
    }

    /// Decodes a value of the given wire type from the front of `data`.
    pub fn decode_as(wire_type: WireType, data: &mut &[u8]) -> Result<Self, DecodeError> {
        Ok(match wire_type {
            WireType::U8 => Self::U8(u8::decode(data)?),
            WireType::U16 => Self::U16(u16::decode(data)?),
            WireType::U32 => Self::U32(u32::decode(data)?),
            WireType::U64 => Self::U64(u64::decode(data)?),
            WireType::F32 => Self::F32(f32::decode(data)?),
        })
    }

    /// Writes this value into `buffer` at `offset`, returning the offset just past it.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::OutOfBounds`] if the value does not fit before the end of the
    /// buffer. The buffer is left untouched in that case.
    pub fn write_at(&self, buffer: &mut [u8], offset: usize) -> Result<usize, EncodeError> {
        let width = self.wire_type().width();
        let end = offset
            .checked_add(width)
            .filter(|&end| end <= buffer.len())
            .ok_or(EncodeError::OutOfBounds {
                offset,
                width,
                len: buffer.len(),
            })?;

        self.encode(&mut buffer[offset..end]);
        Ok(end)
    }

    /// Reads a value of the given wire type from `buffer` at `offset`, returning it along
    /// with the offset just past it.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::OutOfBounds`] if the buffer ends before the value does.
    pub fn read_at(
        wire_type: WireType,
        buffer: &[u8],
        offset: usize,
    ) -> Result<(Self, usize), DecodeError> {
        let width = wire_type.width();
        let out_of_bounds = DecodeError::OutOfBounds {
            offset,
            width,
            len: buffer.len(),
        };

        let end = offset
            .checked_add(width)
            .filter(|&end| end <= buffer.len())
            .ok_or(out_of_bounds)?;

        let value = Self::decode_as(wire_type, &mut &buffer[offset..end])?;
        Ok((value, end))
    }
}

impl Encode for FieldValue {
    fn size(&self) -> usize {
        self.wire_type().width()
    }

    fn encode(&self, data: &mut [u8]) {
        match self {
            Self::U8(v) => v.encode(data),
            Self::U16(v) => v.encode(data),
            Self::U32(v) => v.encode(data),
            Self::U64(v) => v.encode(data),
            Self::F32(v) => v.encode(data),
        }
    }
}

macro_rules! impl_from_native {
    ($($t:ty => $variant:ident),*) => {
        $(
            impl From<$t> for FieldValue {
                fn from(value: $t) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_native!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, f32 => F32);

#[cfg(test)]
mod tests {
    use super::{FieldValue, WireType};
    use crate::{decode::DecodeError, encode::EncodeError};

    #[test]
    fn round_trip() {
        let values = [
            FieldValue::U8(0),
            FieldValue::U8(u8::MAX),
            FieldValue::U16(5658),
            FieldValue::U16(u16::MAX),
            FieldValue::U32(5000),
            FieldValue::U32(u32::MAX),
            FieldValue::U64(1_700_000_000_000_000),
            FieldValue::F32(900.0),
            FieldValue::F32(-0.125),
        ];

        let mut buf = [0u8; 32];
        for value in values {
            let end = value.write_at(&mut buf, 3).unwrap();
            assert_eq!(end, 3 + value.wire_type().width());

            let (read, read_end) = FieldValue::read_at(value.wire_type(), &buf, 3).unwrap();
            assert_eq!(read, value);
            assert_eq!(read_end, end);
        }
    }

    #[test]
    fn sequential_offsets() {
        let mut buf = [0u8; 7];
        let offset = FieldValue::U8(3).write_at(&mut buf, 0).unwrap();
        let offset = FieldValue::U16(51).write_at(&mut buf, offset).unwrap();
        let offset = FieldValue::F32(900.0).write_at(&mut buf, offset).unwrap();

        assert_eq!(offset, 7);
        assert_eq!(buf, [0x03, 0x33, 0x00, 0x00, 0x00, 0x61, 0x44]);
    }

    #[test]
    fn write_out_of_bounds() {
        let mut buf = [0u8; 4];

        assert_eq!(
            FieldValue::U32(1).write_at(&mut buf, 1),
            Err(EncodeError::OutOfBounds {
                offset: 1,
                width: 4,
                len: 4
            })
        );
        assert_eq!(buf, [0; 4]);
        assert!(FieldValue::U8(1).write_at(&mut buf, usize::MAX).is_err());
    }

    #[test]
    fn read_out_of_bounds() {
        let buf = [0u8; 9];

        assert_eq!(
            FieldValue::read_at(WireType::U64, &buf, 2),
            Err(DecodeError::OutOfBounds {
                offset: 2,
                width: 8,
                len: 9
            })
        );
        assert!(FieldValue::read_at(WireType::U8, &buf, 9).is_err());
        assert!(FieldValue::read_at(WireType::U8, &buf, 8).is_ok());
    }
}
