//! Byte stuffing for record bodies.
//!
//! Every byte between the `SOR` and `EOR` markers that equals [`SOR`], [`EOR`] or [`ESC`] is
//! transmitted as `ESC, byte + ESC_OFFSET`, so a marker on the wire is always a real marker.

use crate::{decode::DecodeError, EOR, ESC, ESC_OFFSET, SOR};

const fn is_reserved(byte: u8) -> bool {
    matches!(byte, SOR | EOR | ESC)
}

/// Appends the escaped form of `data` to `out`.
pub fn escape_into(data: &[u8], out: &mut Vec<u8>) {
    out.reserve(data.len());

    for &byte in data {
        if is_reserved(byte) {
            out.push(ESC);
            out.push(byte + ESC_OFFSET);
        } else {
            out.push(byte);
        }
    }
}

/// Escapes every reserved byte in `data`.
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut escaped = Vec::with_capacity(data.len());
    escape_into(data, &mut escaped);
    escaped
}

/// Reverses [`escape`].
///
/// # Errors
///
/// Returns [`DecodeError::MalformedEscape`] if an escape sentinel is the last byte of the
/// input, or is followed by a byte that is not an escaped reserved byte.
pub fn unescape(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut unescaped = Vec::with_capacity(data.len());
    let mut bytes = data.iter().copied().enumerate();

    while let Some((position, byte)) = bytes.next() {
        if byte != ESC {
            unescaped.push(byte);
            continue;
        }

        match bytes.next() {
            Some((_, escaped)) if is_reserved(escaped.wrapping_sub(ESC_OFFSET)) => {
                unescaped.push(escaped - ESC_OFFSET)
            }
            _ => return Err(DecodeError::MalformedEscape { position }),
        }
    }

    Ok(unescaped)
}

#[cfg(test)]
mod tests {
    use super::{escape, unescape};
    use crate::{decode::DecodeError, EOR, ESC, SOR};

    #[test]
    fn reserved_bytes() {
        assert_eq!(
            escape(&[0x01, SOR, EOR, ESC, 0x02]),
            [0x01, 0x5C, 0x9A, 0x5C, 0x9B, 0x5C, 0x9C, 0x02]
        );
    }

    #[test]
    fn every_byte_round_trips() {
        let data: Vec<u8> = (0..=u8::MAX).chain((0..=u8::MAX).rev()).collect();
        let escaped = escape(&data);

        assert_eq!(escaped.len(), data.len() + 6);
        assert!(!escaped.contains(&SOR));
        assert!(!escaped.contains(&EOR));
        assert_eq!(unescape(&escaped).unwrap(), data);
    }

    #[test]
    fn plain_input_is_untouched() {
        let data = [0x0E, 0x00, 0x07, 0xDA, 0x26, 0x04];
        assert_eq!(escape(&data), data);
        assert_eq!(unescape(&data).unwrap(), data);
    }

    #[test]
    fn dangling_sentinel() {
        assert_eq!(
            unescape(&[0x01, 0x02, ESC]),
            Err(DecodeError::MalformedEscape { position: 2 })
        );
    }

    #[test]
    fn invalid_escape_code() {
        assert_eq!(
            unescape(&[ESC, 0x01]),
            Err(DecodeError::MalformedEscape { position: 0 })
        );
        assert_eq!(
            unescape(&[0x00, ESC, ESC]),
            Err(DecodeError::MalformedEscape { position: 1 })
        );
    }
}
