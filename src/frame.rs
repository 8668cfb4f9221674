//! Locating records inside a raw byte stream.
//!
//! A LapRF byte stream is a sequence of `SOR, escaped(body), EOR` records with arbitrary
//! noise in between. [`split`] pulls every complete record out of a buffer, and
//! [`FrameBuffer`] does the same for data arriving in arbitrary chunks.

use bytes::{Buf, BytesMut};
use log::{debug, trace, warn};

use crate::{decode::DecodeError, escape::unescape, EOR, SOR};

/// Upper bound on the buffered tail of an unterminated record.
///
/// The length field is a `u16` and escaping at most doubles the body, so nothing longer than
/// this can ever turn into a valid record.
pub const MAX_ESCAPED_RECORD_LEN: usize = 2 * u16::MAX as usize;

enum Scan {
    /// A complete record, `SOR` at `start` and `EOR` at `end`.
    Complete { start: usize, end: usize },
    /// A record was started at `start` but never terminated.
    Partial { start: usize },
    /// No record start at all.
    Empty,
}

/// Finds the first complete record in `data`.
///
/// Escaping only ever produces `ESC` followed by a shifted byte, so a raw marker inside a
/// record is always a real marker, even right after an `ESC`.
fn scan(data: &[u8]) -> Scan {
    let mut start = None;

    for (i, &byte) in data.iter().enumerate() {
        match byte {
            SOR => {
                if let Some(previous) = start {
                    debug!(
                        "Dropping {} bytes of a truncated record, resyncing at SOR",
                        i - previous
                    );
                }
                start = Some(i);
            }
            EOR => {
                if let Some(start) = start {
                    return Scan::Complete { start, end: i };
                }
            }
            _ => {}
        }
    }

    match start {
        Some(start) => Scan::Partial { start },
        None => Scan::Empty,
    }
}

/// Splits a buffer into the de-escaped payloads of the records it contains.
///
/// Each item is the unescaped bytes strictly between a record's `SOR` and `EOR` markers, or a
/// [`DecodeError::MalformedEscape`] if that record's escaping is broken. Bytes outside of any
/// record are discarded, and a trailing record without an `EOR` is not yielded. Use
/// [`Frames::remainder`] or a [`FrameBuffer`] to keep it.
pub fn split(data: &[u8]) -> Frames<'_> {
    Frames { data, position: 0 }
}

/// Iterator over the records in a buffer. Created by [`split`].
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Frames<'a> {
    /// Returns the bytes that have not been consumed by a complete record.
    ///
    /// Once the iterator is exhausted this is the unterminated tail (starting at its `SOR`),
    /// or an empty slice if the buffer ended outside of a record.
    pub fn remainder(&self) -> &'a [u8] {
        &self.data[self.position..]
    }
}

impl Iterator for Frames<'_> {
    type Item = Result<Vec<u8>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.data[self.position..];

        match scan(rest) {
            Scan::Complete { start, end } => {
                self.position += end + 1;

                let body = &rest[start + 1..end];
                trace!("Found record: {:x?}", body);
                Some(unescape(body))
            }
            Scan::Partial { start } => {
                self.position += start;
                None
            }
            Scan::Empty => {
                self.position = self.data.len();
                None
            }
        }
    }
}

impl std::iter::FusedIterator for Frames<'_> {}

/// Accumulates bytes from a stream and extracts complete records as they arrive.
///
/// ```
/// use laprf::{commands, frame::FrameBuffer};
///
/// let frame = commands::get_rtc_time().unwrap();
/// let (head, tail) = frame.split_at(4);
///
/// let mut buffer = FrameBuffer::new();
/// assert!(buffer.push(head).is_empty());
/// assert_eq!(buffer.push(tail).len(), 1);
/// assert!(buffer.is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct FrameBuffer {
    /// Held-back bytes. While a record is open this starts at its `SOR`.
    buffer: BytesMut,
    /// Whether `buffer` holds the start of a record.
    open: bool,
    /// Bytes of `buffer` already searched for markers.
    scanned: usize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `data` and returns the payload of every record completed by it.
    ///
    /// An unterminated record is kept for the next push. Noise outside of records is dropped.
    /// Every byte is searched for markers once, however the stream is chunked.
    pub fn push(&mut self, data: &[u8]) -> Vec<Result<Vec<u8>, DecodeError>> {
        self.buffer.extend_from_slice(data);

        let mut payloads = Vec::new();

        loop {
            let marker = self.buffer[self.scanned..]
                .iter()
                .position(|&byte| byte == SOR || (self.open && byte == EOR))
                .map(|i| i + self.scanned);

            match marker {
                Some(i) if self.buffer[i] == EOR => {
                    let record = self.buffer.split_to(i + 1);
                    let body = &record[1..i];
                    trace!("Found record: {:x?}", body);
                    payloads.push(unescape(body));

                    self.open = false;
                    self.scanned = 0;
                }
                Some(i) => {
                    if self.open {
                        debug!("Dropping {} bytes of a truncated record, resyncing at SOR", i);
                    }
                    self.buffer.advance(i);
                    self.open = true;
                    self.scanned = 1;
                }
                None if self.open => {
                    self.scanned = self.buffer.len();
                    break;
                }
                None => {
                    self.buffer.clear();
                    self.scanned = 0;
                    break;
                }
            }
        }

        if self.buffer.len() > MAX_ESCAPED_RECORD_LEN {
            warn!(
                "Discarding {} buffered bytes without an end of record marker",
                self.buffer.len()
            );
            self.clear();
        }

        payloads
    }

    /// Number of bytes held back as part of an unterminated record.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drops any partially received record.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.open = false;
        self.scanned = 0;
    }
}
