use crc::Crc;

use crate::{EOR, SOR};

/// [CRC16 error-detecting algorithm](https://en.wikipedia.org/wiki/Cyclic_redundancy_check)
/// used by LapRF records.
///
/// The timer uses the reflected `0x8005` polynomial with a zero seed, which is CRC-16/ARC.
/// Every single-bit error is detected; bursts longer than 16 bits slip through with
/// probability 2^-16.
pub const LAPRF_CRC16: Crc<u16> = Crc::<u16>::new(&crc::CRC_16_ARC);

/// Offset of the checksum within an unescaped record payload (after `SOR` and the length).
pub(crate) const CRC_OFFSET: usize = 2;

/// Computes the checksum of a record from its unescaped payload, the bytes strictly between
/// `SOR` and `EOR`.
///
/// The checksum covers the whole record including both markers, with its own two bytes
/// treated as zero.
pub(crate) fn record_checksum(payload: &[u8]) -> u16 {
    debug_assert!(payload.len() >= CRC_OFFSET + 2);

    let mut digest = LAPRF_CRC16.digest();
    digest.update(&[SOR]);
    digest.update(&payload[..CRC_OFFSET]);
    digest.update(&[0, 0]);
    digest.update(&payload[CRC_OFFSET + 2..]);
    digest.update(&[EOR]);
    digest.finalize()
}

#[cfg(test)]
mod tests {
    use super::{record_checksum, LAPRF_CRC16};

    #[test]
    fn check_value() {
        assert_eq!(LAPRF_CRC16.checksum(b"123456789"), 0xBB3D);
    }

    #[test]
    fn ignores_stored_checksum() {
        let payload = [0x0E, 0x00, 0x00, 0x00, 0x07, 0xDA, 0x26, 0x04, 0x88, 0x13, 0x00, 0x00];
        let mut stored = payload;
        stored[2] = 0xAB;
        stored[3] = 0xCD;

        assert_eq!(record_checksum(&payload), record_checksum(&stored));

        let mut record = vec![0x5A];
        record.extend_from_slice(&payload);
        record.push(0x5B);
        assert_eq!(record_checksum(&payload), LAPRF_CRC16.checksum(&record));
    }
}
