use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Cannot write {width} bytes at offset {offset} into a buffer of {len} bytes")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("No channel named {0:?} in the channel table")]
    InvalidChannelName(String),

    #[error("Slot index {0} is out of range, expected 1 through 8")]
    InvalidSlot(u8),

    #[error("Record of {0} bytes does not fit in a u16 length field")]
    RecordTooLong(usize),
}

/// A type that can be encoded into a sequence of bytes.
pub trait Encode {
    /// Returns the number of bytes this value will take when encoded.
    fn size(&self) -> usize;

    /// Encodes this instance into the provided byte slice.
    ///
    /// # Panics
    ///
    /// Panics if `data` is shorter than [`Encode::size`].
    fn encode(&self, data: &mut [u8]);
}

macro_rules! impl_encode_for_primitive {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn size(&self) -> usize {
                    std::mem::size_of::<Self>()
                }

                fn encode(&self, data: &mut [u8]) {
                    data[..std::mem::size_of::<Self>()].copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

// LapRF is little endian across the board, floats included.
impl_encode_for_primitive!(u8, u16, u32, u64, i8, i16, i32, i64, f32);

impl Encode for () {
    fn size(&self) -> usize {
        0
    }
    fn encode(&self, _data: &mut [u8]) {}
}

impl Encode for &[u8] {
    fn size(&self) -> usize {
        self.len()
    }

    fn encode(&self, data: &mut [u8]) {
        data[..self.len()].copy_from_slice(self);
    }
}

impl<const N: usize> Encode for [u8; N] {
    fn size(&self) -> usize {
        N
    }

    fn encode(&self, data: &mut [u8]) {
        data[..N].copy_from_slice(self);
    }
}

impl Encode for Vec<u8> {
    fn size(&self) -> usize {
        self.len()
    }

    fn encode(&self, data: &mut [u8]) {
        self.as_slice().encode(data)
    }
}
