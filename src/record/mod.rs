//! LapRF records.
//!
//! # Encoding
//!
//! Every record has the following unescaped layout. Everything between `SOR` and `EOR` is
//! escaped on the wire (see [`escape`](crate::escape)).
//!
//! | Field         | Size | Description |
//! |---------------|------|-------------|
//! | `sor`         | 1    | Must be [`SOR`](crate::SOR). |
//! | `length`      | 2    | Unescaped length of the whole record, markers included. |
//! | `crc`         | 2    | [`LAPRF_CRC16`](crate::crc::LAPRF_CRC16) of the whole record with this field zeroed. |
//! | `record_type` | 2    | A [`RecordType`]. |
//! | `fields`      | n    | Any number of `signature (1) ++ size (1) ++ value (size)` fields. |
//! | `eor`         | 1    | Must be [`EOR`](crate::EOR). |
//!
//! The *payload* of a record is the unescaped bytes strictly between the markers, as
//! produced by [`frame::split`].

use log::{debug, trace, warn};

use crate::{
    checks::RecordChecks,
    crc::record_checksum,
    decode::{Decode, DecodeError},
    field::FieldValue,
    frame,
};

mod encoder;
mod rf_setup;
pub mod schema;
mod settings;
mod status;
mod timing;

pub use encoder::RecordEncoder;
pub use rf_setup::RfSetup;
pub use settings::Settings;
pub use status::{Rssi, SlotRssi, StateControl, Status};
pub use timing::{Passing, Time};

/// Size of the payload header: length, crc and record type.
pub(crate) const HEADER_SIZE: usize = 6;

/// Identifies the kind of a record.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum RecordType {
    /// Periodic signal strength statistics for one slot.
    Rssi = 0xDA01,
    /// Receiver configuration of one slot.
    RfSetup = 0xDA02,
    StateControl = 0xDA04,
    /// Timer-wide settings.
    Settings = 0xDA07,
    Descriptor = 0xDA08,
    /// A transponder passed the gate.
    Passing = 0xDA09,
    /// Periodic timer status.
    Status = 0xDA0A,
    /// The timer's real time clock.
    Time = 0xDA0C,
    Error = 0xFFFF,
}

impl RecordType {
    pub const ALL: [Self; 9] = [
        Self::Rssi,
        Self::RfSetup,
        Self::StateControl,
        Self::Settings,
        Self::Descriptor,
        Self::Passing,
        Self::Status,
        Self::Time,
        Self::Error,
    ];
}

impl From<RecordType> for u16 {
    fn from(record_type: RecordType) -> Self {
        record_type as u16
    }
}

impl TryFrom<u16> for RecordType {
    type Error = DecodeError;

    fn try_from(tag: u16) -> Result<Self, DecodeError> {
        Self::ALL
            .into_iter()
            .find(|record_type| u16::from(*record_type) == tag)
            .ok_or(DecodeError::UnknownRecordType(tag))
    }
}

impl Decode for RecordType {
    fn decode(data: &mut &[u8]) -> Result<Self, DecodeError> {
        Self::try_from(u16::decode(data)?)
    }
}

/// A field kept as raw bytes because the record type has no schema for it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawField {
    pub signature: u8,
    pub data: Vec<u8>,
}

/// Records in a structured form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodedRecord {
    Rssi(Rssi),
    RfSetup(RfSetup),
    StateControl(StateControl),
    Settings(Settings),
    Descriptor(Vec<RawField>),
    Passing(Passing),
    Status(Status),
    Time(Time),
    Error(Vec<RawField>),
}

/// Implemented by each structured record to take the fields of its schema.
pub(crate) trait ApplyField {
    fn apply(&mut self, signature: u8, value: FieldValue);
}

impl DecodedRecord {
    fn empty(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Rssi => Self::Rssi(Rssi::default()),
            RecordType::RfSetup => Self::RfSetup(RfSetup::default()),
            RecordType::StateControl => Self::StateControl(StateControl::default()),
            RecordType::Settings => Self::Settings(Settings::default()),
            RecordType::Descriptor => Self::Descriptor(Vec::new()),
            RecordType::Passing => Self::Passing(Passing::default()),
            RecordType::Status => Self::Status(Status::default()),
            RecordType::Time => Self::Time(Time::default()),
            RecordType::Error => Self::Error(Vec::new()),
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            Self::Rssi(_) => RecordType::Rssi,
            Self::RfSetup(_) => RecordType::RfSetup,
            Self::StateControl(_) => RecordType::StateControl,
            Self::Settings(_) => RecordType::Settings,
            Self::Descriptor(_) => RecordType::Descriptor,
            Self::Passing(_) => RecordType::Passing,
            Self::Status(_) => RecordType::Status,
            Self::Time(_) => RecordType::Time,
            Self::Error(_) => RecordType::Error,
        }
    }

    fn apply(&mut self, signature: u8, value: FieldValue) {
        match self {
            Self::Rssi(record) => record.apply(signature, value),
            Self::RfSetup(record) => record.apply(signature, value),
            Self::StateControl(record) => record.apply(signature, value),
            Self::Settings(record) => record.apply(signature, value),
            Self::Passing(record) => record.apply(signature, value),
            Self::Status(record) => record.apply(signature, value),
            Self::Time(record) => record.apply(signature, value),
            Self::Descriptor(_) | Self::Error(_) => {}
        }
    }

    /// Returns the raw field list for record types without a schema.
    fn raw_fields(&mut self) -> Option<&mut Vec<RawField>> {
        match self {
            Self::Descriptor(fields) | Self::Error(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Decodes record payloads into [`DecodedRecord`]s.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordDecoder {
    checks: RecordChecks,
}

impl RecordDecoder {
    pub const fn new(checks: RecordChecks) -> Self {
        Self { checks }
    }

    pub const fn checks(&self) -> RecordChecks {
        self.checks
    }

    /// Decodes one de-escaped record payload.
    ///
    /// Returns `Ok(None)` for a valid record that carries no fields at all.
    ///
    /// # Errors
    ///
    /// Fails if the payload is truncated, its length or checksum do not match (subject to
    /// [`RecordChecks`]), its record type is unknown, or a known field has the wrong size.
    pub fn decode(&self, payload: &[u8]) -> Result<Option<DecodedRecord>, DecodeError> {
        trace!("Decoding record: {:x?}", payload);

        let mut data = payload;
        let length = u16::decode(&mut data)?;
        let crc = u16::decode(&mut data)?;
        let tag = u16::decode(&mut data)?;

        // The length on the wire includes both markers.
        let expected_length = payload.len() + 2;
        if self.checks.contains(RecordChecks::LENGTH) && usize::from(length) != expected_length {
            return Err(DecodeError::Length {
                value: length,
                expected: expected_length,
            });
        }

        if self.checks.contains(RecordChecks::CHECKSUM) {
            let expected = record_checksum(payload);
            if crc != expected {
                return Err(DecodeError::Checksum {
                    value: crc,
                    expected,
                });
            }
        }

        let record_type = RecordType::try_from(tag)?;
        let mut record = DecodedRecord::empty(record_type);

        if data.is_empty() {
            return Ok(None);
        }

        while !data.is_empty() {
            let signature = u8::decode(&mut data)?;
            let size = usize::from(u8::decode(&mut data)?);
            let (mut value_data, rest) = data
                .split_at_checked(size)
                .ok_or(DecodeError::UnexpectedEnd)?;
            data = rest;

            if let Some(wire_type) = schema::wire_type(record_type, signature) {
                if size != wire_type.width() {
                    return Err(DecodeError::FieldSize {
                        signature,
                        size,
                        expected: wire_type.width(),
                    });
                }

                let value = FieldValue::decode_as(wire_type, &mut value_data)?;
                record.apply(signature, value);
            } else if let Some(fields) = record.raw_fields() {
                fields.push(RawField {
                    signature,
                    data: value_data.to_vec(),
                });
            } else if self.checks.contains(RecordChecks::UNKNOWN_FIELDS) {
                return Err(DecodeError::UnknownField {
                    record_type,
                    signature,
                });
            } else {
                debug!(
                    "Skipping unknown field {:#04x} ({} bytes) in {:?} record",
                    signature, size, record_type
                );
            }
        }

        Ok(Some(record))
    }

    /// Decodes every record in a raw byte stream, in stream order.
    ///
    /// Records that fail to decode are yielded as errors without affecting the records
    /// around them. Records without fields are skipped.
    pub fn decode_stream<'a>(
        &self,
        data: &'a [u8],
    ) -> impl Iterator<Item = Result<DecodedRecord, DecodeError>> + 'a {
        let decoder = *self;

        frame::split(data).filter_map(move |payload| {
            match payload.and_then(|payload| decoder.decode(&payload)) {
                Ok(record) => record.map(Ok),
                Err(err) => {
                    warn!("Dropping corrupt record: {}", err);
                    Some(Err(err))
                }
            }
        })
    }
}

/// Decodes one de-escaped record payload with the default checks.
///
/// See [`RecordDecoder::decode`].
pub fn decode(payload: &[u8]) -> Result<Option<DecodedRecord>, DecodeError> {
    RecordDecoder::default().decode(payload)
}

/// Decodes every record in a raw byte stream with the default checks.
///
/// See [`RecordDecoder::decode_stream`].
pub fn decode_stream(
    data: &[u8],
) -> impl Iterator<Item = Result<DecodedRecord, DecodeError>> + '_ {
    RecordDecoder::default().decode_stream(data)
}

#[cfg(test)]
mod tests {
    use super::{
        decode, decode_stream, schema, DecodedRecord, RawField, RecordDecoder, RecordEncoder,
        RecordType, RfSetup, Settings, HEADER_SIZE,
    };
    use crate::{
        checks::RecordChecks, commands, decode::DecodeError, escape::unescape, frame, EOR, ESC,
        SOR,
    };

    /// Strips the markers off a single encoded record and unescapes it.
    fn payload(frame: &[u8]) -> Vec<u8> {
        assert_eq!(frame.first(), Some(&SOR));
        assert_eq!(frame.last(), Some(&EOR));
        unescape(&frame[1..frame.len() - 1]).unwrap()
    }

    fn min_lap_time(record: DecodedRecord) -> Option<u32> {
        match record {
            DecodedRecord::Settings(settings) => settings.min_lap_time,
            other => panic!("expected settings, got {other:?}"),
        }
    }

    #[test]
    fn record_type_tags() {
        for record_type in RecordType::ALL {
            assert_eq!(RecordType::try_from(u16::from(record_type)), Ok(record_type));
        }
        assert_eq!(
            RecordType::try_from(0xDA03),
            Err(DecodeError::UnknownRecordType(0xDA03))
        );
    }

    #[test]
    fn min_lap_time_pipeline() {
        let stream = commands::set_min_lap_time(5000).unwrap();

        let records: Vec<_> = decode_stream(&stream).collect();
        assert_eq!(records.len(), 1);

        let record = records.into_iter().next().unwrap().unwrap();
        assert_eq!(record.record_type(), RecordType::Settings);
        assert_eq!(min_lap_time(record), Some(5000));
    }

    #[test]
    fn rf_setup_response() {
        let mut encoder = RecordEncoder::new(RecordType::RfSetup);
        encoder
            .encode_field(schema::rf_setup::SLOT_INDEX, 3u8)
            .encode_field(schema::rf_setup::ENABLED, 1u16)
            .encode_field(schema::rf_setup::CHANNEL, 1u16)
            .encode_field(schema::rf_setup::BAND, 2u16)
            .encode_field(schema::rf_setup::THRESHOLD, 900.0f32)
            .encode_field(schema::rf_setup::GAIN, 51u16)
            .encode_field(schema::rf_setup::FREQUENCY, 5658u16);
        let frame = encoder.finish().unwrap();

        let setup = match decode(&payload(&frame)).unwrap().unwrap() {
            DecodedRecord::RfSetup(setup) => setup,
            other => panic!("expected an rf setup record, got {other:?}"),
        };

        assert_eq!(
            setup,
            RfSetup {
                slot_index: Some(3),
                enabled: Some(true),
                channel: Some(1),
                band: Some(2),
                threshold: Some(900.0),
                gain: Some(51),
                frequency: Some(5658),
            }
        );
        assert_eq!(setup.channel_name(), Some("R1"));
    }

    #[test]
    fn corrupt_record_is_isolated() {
        let first = commands::set_min_lap_time(5000).unwrap();
        let mut garbled = commands::set_min_lap_time(6000).unwrap();
        let third = commands::set_min_lap_time(7000).unwrap();

        // The last value byte sits right before EOR and is 0x00 for all of these.
        let index = garbled.len() - 2;
        assert_eq!(garbled[index], 0x00);
        garbled[index] ^= 0x01;

        let mut stream = first;
        stream.extend(garbled);
        stream.extend(third);

        let records: Vec<_> = decode_stream(&stream).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(min_lap_time(records[0].clone().unwrap()), Some(5000));
        assert!(matches!(records[1], Err(DecodeError::Checksum { .. })));
        assert_eq!(min_lap_time(records[2].clone().unwrap()), Some(7000));
    }

    #[test]
    fn dangling_escape_is_isolated() {
        let first = commands::set_min_lap_time(5000).unwrap();
        let mut garbled = commands::set_min_lap_time(6000).unwrap();
        let third = commands::set_min_lap_time(7000).unwrap();

        let index = garbled.len() - 2;
        garbled[index] = ESC;

        let mut stream = first;
        stream.extend(garbled);
        stream.extend(third);

        let records: Vec<_> = decode_stream(&stream).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(min_lap_time(records[0].clone().unwrap()), Some(5000));
        assert!(matches!(records[1], Err(DecodeError::MalformedEscape { .. })));
        assert_eq!(min_lap_time(records[2].clone().unwrap()), Some(7000));
    }

    #[test]
    fn every_bit_flip_is_detected() {
        let frame = commands::set_rf_setup(&commands::RfSetupCommand {
            slot_index: 3,
            channel_name: "R1",
            gain: 51,
            threshold: 900.0,
            enabled: true,
        })
        .unwrap();
        let payload = payload(&frame);
        assert!(decode(&payload).unwrap().is_some());

        for index in 0..payload.len() {
            for bit in 0..8 {
                let mut corrupted = payload.clone();
                corrupted[index] ^= 1 << bit;

                let result = decode(&corrupted);
                if index < 2 {
                    assert!(matches!(result, Err(DecodeError::Length { .. })));
                } else {
                    assert!(
                        matches!(result, Err(DecodeError::Checksum { .. })),
                        "flip of bit {bit} in byte {index} gave {result:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn checks_can_be_disabled() {
        let mut payload = payload(&commands::set_min_lap_time(5000).unwrap());
        payload[2] ^= 0xFF;

        let lenient = RecordDecoder::new(RecordChecks::LENGTH);
        assert!(decode(&payload).is_err());
        assert_eq!(
            min_lap_time(lenient.decode(&payload).unwrap().unwrap()),
            Some(5000)
        );
    }

    #[test]
    fn truncated_payload() {
        assert_eq!(decode(&[0x0E, 0x00, 0x00]), Err(DecodeError::UnexpectedEnd));

        let payload = payload(&commands::set_min_lap_time(5000).unwrap());
        let decoder = RecordDecoder::new(RecordChecks::empty());
        assert_eq!(
            decoder.decode(&payload[..payload.len() - 1]),
            Err(DecodeError::UnexpectedEnd)
        );
        assert_eq!(
            decoder.decode(&payload[..HEADER_SIZE + 1]),
            Err(DecodeError::UnexpectedEnd)
        );
    }

    #[test]
    fn unknown_record_type() {
        let mut encoder = RecordEncoder::new(RecordType::Settings);
        encoder.encode_field(schema::settings::MIN_LAP_TIME, 5000u32);
        let mut payload = payload(&encoder.finish().unwrap());
        payload[4] = 0x03;

        let decoder = RecordDecoder::new(RecordChecks::LENGTH);
        assert_eq!(
            decoder.decode(&payload),
            Err(DecodeError::UnknownRecordType(0xDA03))
        );
    }

    #[test]
    fn empty_record() {
        let frame = RecordEncoder::new(RecordType::Settings).finish().unwrap();
        assert_eq!(decode(&payload(&frame)), Ok(None));
        assert_eq!(decode_stream(&frame).count(), 0);
    }

    #[test]
    fn unknown_fields() {
        let mut encoder = RecordEncoder::new(RecordType::Settings);
        encoder
            .encode_field(0x7F, 0xABCDu16)
            .encode_field(schema::settings::MIN_LAP_TIME, 5000u32);
        let payload = payload(&encoder.finish().unwrap());

        assert_eq!(
            decode(&payload),
            Ok(Some(DecodedRecord::Settings(Settings {
                min_lap_time: Some(5000),
                ..Default::default()
            })))
        );

        let strict = RecordDecoder::new(RecordChecks::all());
        assert_eq!(
            strict.decode(&payload),
            Err(DecodeError::UnknownField {
                record_type: RecordType::Settings,
                signature: 0x7F
            })
        );
    }

    #[test]
    fn wrong_field_size() {
        // The "get" request sends the min lap time field as a single zero byte.
        let payload = payload(&commands::get_min_lap_time().unwrap());

        assert_eq!(
            decode(&payload),
            Err(DecodeError::FieldSize {
                signature: schema::settings::MIN_LAP_TIME,
                size: 1,
                expected: 4
            })
        );
    }

    #[test]
    fn raw_fields() {
        let mut encoder = RecordEncoder::new(RecordType::Error);
        encoder.encode_field(0x10, 0x0102u16);
        let frame = encoder.finish().unwrap();

        let records: Vec<_> = decode_stream(&frame).collect();
        assert_eq!(
            records,
            vec![Ok(DecodedRecord::Error(vec![RawField {
                signature: 0x10,
                data: vec![0x02, 0x01]
            }]))]
        );
    }

    #[test]
    fn stream_order_is_preserved() {
        let mut stream = Vec::new();
        for ms in [1000, 2000, 3000, 4000] {
            stream.extend(commands::set_min_lap_time(ms).unwrap());
        }

        let times: Vec<_> = decode_stream(&stream)
            .map(|record| min_lap_time(record.unwrap()).unwrap())
            .collect();
        assert_eq!(times, [1000, 2000, 3000, 4000]);
    }

    #[test]
    fn splitter_and_decoder_agree() {
        let mut stream = commands::get_rf_setup(None).unwrap();
        stream.extend(commands::set_status_interval(0x5A5B).unwrap());

        let payloads: Vec<_> = frame::split(&stream).collect();
        assert_eq!(payloads.len(), 2);

        let DecodedRecord::Settings(settings) =
            decode(payloads[1].as_ref().unwrap()).unwrap().unwrap()
        else {
            panic!("expected settings");
        };
        assert_eq!(settings.status_interval, Some(0x5A5B));
    }
}
