//! Codec for the ImmersionRC LapRF race timing protocol. Not affiliated with ImmersionRC.
//!
//! This crate is structured around two key traits: [`Encode`](encode::Encode) and [`Decode`](decode::Decode).
//! These traits are used to write values into records sent to the timer and to read values out of
//! records received from it.
//!
//! Outgoing records are built with a [`RecordEncoder`](record::RecordEncoder), which produces a
//! complete, escaped and checksummed frame. The [`commands`] module wraps the encoder in one-line
//! builders for the common requests.
//!
//! Incoming bytes are split into records by the [`frame`] module and turned into
//! [`DecodedRecord`](record::DecodedRecord)s by the [`RecordDecoder`](record::RecordDecoder).
//! A corrupt record never takes the rest of the stream down with it:
//!
//! ```
//! use laprf::{commands, record};
//!
//! let mut stream = commands::set_min_lap_time(5000).unwrap();
//! stream.extend_from_slice(&[0x00, 0x5A, 0x13]); // line noise and a truncated record
//!
//! let records: Vec<_> = record::decode_stream(&stream).collect();
//! assert_eq!(records.len(), 1);
//! ```

pub mod channel;
pub mod checks;
pub mod commands;
pub mod crc;
pub mod decode;
pub mod encode;
pub mod escape;
pub mod field;
pub mod frame;
pub mod record;

/// Start of record marker.
pub const SOR: u8 = 0x5A;

/// End of record marker.
pub const EOR: u8 = 0x5B;

/// Escape sentinel. The byte following it has been shifted by [`ESC_OFFSET`].
pub const ESC: u8 = 0x5C;

/// Amount added to a reserved byte when it is escaped.
pub const ESC_OFFSET: u8 = 0x40;
