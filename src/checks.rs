//! Record decoding checks
use bitflags::bitflags;

bitflags! {
    /// Validation a [`RecordDecoder`](crate::record::RecordDecoder) applies to each payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RecordChecks: u8 {
        /// Rejects a record whose `length` header differs from its received size plus the
        /// two markers.
        const LENGTH = 0b00000001;
        /// Recomputes the CRC-16/ARC over the record and rejects it on a mismatch.
        const CHECKSUM = 0b00000010;
        /// Fails on a signature the record type's schema does not know. Without it such
        /// fields are skipped.
        const UNKNOWN_FIELDS = 0b00000100;
    }
}

impl Default for RecordChecks {
    /// Length and checksum validation, tolerating unknown fields.
    fn default() -> Self {
        Self::LENGTH | Self::CHECKSUM
    }
}
