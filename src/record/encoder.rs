use log::trace;

use super::{RecordType, HEADER_SIZE};
use crate::{
    crc::{CRC_OFFSET, LAPRF_CRC16},
    encode::{Encode, EncodeError},
    escape::escape_into,
    field::FieldValue,
    EOR, SOR,
};

/// Builds a single outgoing record.
///
/// Fields are appended in order, then [`finish`](Self::finish) fills in the length and
/// checksum, escapes the record and returns the bytes ready to be written to the timer.
///
/// ```
/// use laprf::record::{schema::settings, RecordEncoder, RecordType};
///
/// let mut encoder = RecordEncoder::new(RecordType::Settings);
/// encoder.encode_field(settings::MIN_LAP_TIME, 5000u32);
/// let frame = encoder.finish().unwrap();
///
/// assert_eq!(frame.first(), Some(&laprf::SOR));
/// assert_eq!(frame.last(), Some(&laprf::EOR));
/// ```
///
/// `finish` consumes the encoder, so a finished record cannot be written to again:
///
/// ```compile_fail
/// use laprf::record::{schema::settings, RecordEncoder, RecordType};
///
/// let mut encoder = RecordEncoder::new(RecordType::Settings);
/// let frame = encoder.finish();
/// encoder.encode_field(settings::MIN_LAP_TIME, 5000u32);
/// ```
#[derive(Debug, Clone)]
pub struct RecordEncoder {
    record_type: RecordType,
    data: Vec<u8>,
}

impl RecordEncoder {
    /// Starts a new record of the given type.
    pub fn new(record_type: RecordType) -> Self {
        let mut data = Vec::with_capacity(32);

        data.push(SOR);
        // Length and checksum are filled in by `finish`.
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&u16::from(record_type).to_le_bytes());
        debug_assert_eq!(data.len(), HEADER_SIZE + 1);

        Self { record_type, data }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Appends raw encoded bytes to the record.
    pub fn write(&mut self, value: impl Encode) -> &mut Self {
        let start = self.data.len();
        self.data.resize(start + value.size(), 0);
        value.encode(&mut self.data[start..]);
        self
    }

    /// Appends a field with the given signature. The size byte is derived from the value's
    /// wire type.
    pub fn encode_field(&mut self, signature: u8, value: impl Into<FieldValue>) -> &mut Self {
        let value = value.into();
        let size = value.wire_type().width() as u8;

        self.write(signature).write(size).write(value)
    }

    /// Completes the record and returns its escaped, framed bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::RecordTooLong`] if the record does not fit the 16-bit length
    /// field.
    pub fn finish(mut self) -> Result<Vec<u8>, EncodeError> {
        self.data.push(EOR);

        let length = u16::try_from(self.data.len())
            .map_err(|_| EncodeError::RecordTooLong(self.data.len()))?;
        length.encode(&mut self.data[1..]);

        // The checksum field is still zero, as the checksum requires.
        let crc = LAPRF_CRC16.checksum(&self.data);
        crc.encode(&mut self.data[1 + CRC_OFFSET..]);

        let mut frame = Vec::with_capacity(self.data.len() + 8);
        frame.push(SOR);
        escape_into(&self.data[1..self.data.len() - 1], &mut frame);
        frame.push(EOR);

        trace!("Encoded {:?} record: {:x?}", self.record_type, frame);
        Ok(frame)
    }
}
