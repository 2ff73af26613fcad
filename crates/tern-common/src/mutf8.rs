//! Modified UTF-8 decoding.
//!
//! Modified UTF-8 is the encoding managed runtimes use for string constants:
//! NUL is written as the two-byte sequence `C0 80`, and supplementary
//! characters are written as two three-byte surrogates instead of one
//! four-byte sequence. Every sequence therefore decodes to exactly one
//! UTF-16 unit.

use crate::error::{DecodeError, Result};

/// Decode exactly `utf16_length` UTF-16 units from the start of `bytes`.
///
/// Bytes after the last decoded unit are ignored.
pub fn decode_with_length(bytes: &[u8], utf16_length: usize) -> Result<Vec<u16>> {
    // Every unit takes at least one byte.
    let mut units = Vec::with_capacity(utf16_length.min(bytes.len()));
    let mut offset = 0;
    while units.len() < utf16_length {
        let (unit, width) = decode_unit(bytes, offset)?;
        units.push(unit);
        offset += width;
    }
    Ok(units)
}

/// Decode `bytes` up to the first `0x00` byte, or to the end of the slice.
pub fn decode_nul_terminated(bytes: &[u8]) -> Result<Vec<u16>> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let bytes = &bytes[..end];

    let mut units = Vec::with_capacity(bytes.len());
    let mut offset = 0;
    while offset < bytes.len() {
        let (unit, width) = decode_unit(bytes, offset)?;
        units.push(unit);
        offset += width;
    }
    Ok(units)
}

/// Decode one sequence starting at `offset`, returning the unit and the
/// number of bytes consumed.
fn decode_unit(bytes: &[u8], offset: usize) -> Result<(u16, usize)> {
    let lead = *bytes.get(offset).ok_or(DecodeError::Truncated { offset })?;
    match lead {
        0x00..=0x7F => Ok((u16::from(lead), 1)),
        0xC0..=0xDF => {
            let b1 = continuation(bytes, offset + 1)?;
            Ok(((u16::from(lead & 0x1F) << 6) | b1, 2))
        }
        0xE0..=0xEF => {
            let b1 = continuation(bytes, offset + 1)?;
            let b2 = continuation(bytes, offset + 2)?;
            Ok(((u16::from(lead & 0x0F) << 12) | (b1 << 6) | b2, 3))
        }
        byte => Err(DecodeError::InvalidLeadByte { byte, offset }),
    }
}

fn continuation(bytes: &[u8], offset: usize) -> Result<u16> {
    let byte = *bytes.get(offset).ok_or(DecodeError::Truncated { offset })?;
    if byte & 0xC0 != 0x80 {
        return Err(DecodeError::InvalidContinuation { byte, offset });
    }
    Ok(u16::from(byte & 0x3F))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii() {
        let units = decode_nul_terminated(b"intern\0garbage").unwrap();
        assert_eq!(units, "intern".encode_utf16().collect::<Vec<_>>());
    }

    #[test]
    fn test_encoded_nul_is_not_a_terminator() {
        // "a\0b" in modified UTF-8
        let units = decode_nul_terminated(&[b'a', 0xC0, 0x80, b'b', 0x00]).unwrap();
        assert_eq!(units, vec![0x61, 0x00, 0x62]);
    }

    #[test]
    fn test_surrogate_pair_takes_six_bytes() {
        // U+1F600 as two encoded surrogates: D83D DE00
        let bytes = [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80];
        let units = decode_with_length(&bytes, 2).unwrap();
        assert_eq!(units, vec![0xD83D, 0xDE00]);
        assert_eq!(String::from_utf16(&units).unwrap(), "\u{1F600}");
    }

    #[test]
    fn test_length_prefix_ignores_trailing_bytes() {
        let units = decode_with_length("héllo".as_bytes(), 2).unwrap();
        assert_eq!(units, vec![0x68, 0xE9]);
    }

    #[test]
    fn test_truncated() {
        assert_eq!(
            decode_with_length(b"ab", 3),
            Err(DecodeError::Truncated { offset: 2 })
        );
        assert_eq!(
            decode_nul_terminated(&[b'x', 0xE2, 0x82]),
            Err(DecodeError::Truncated { offset: 3 })
        );
    }

    #[test]
    fn test_declared_length_beyond_input() {
        assert_eq!(
            decode_with_length(b"abc", usize::MAX),
            Err(DecodeError::Truncated { offset: 3 })
        );
        assert_eq!(
            decode_with_length(b"abc", u32::MAX as usize),
            Err(DecodeError::Truncated { offset: 3 })
        );
    }

    #[test]
    fn test_invalid_bytes() {
        assert_eq!(
            decode_nul_terminated(&[0x80]),
            Err(DecodeError::InvalidLeadByte { byte: 0x80, offset: 0 })
        );
        assert_eq!(
            decode_nul_terminated(&[0xF0, 0x9F, 0x98, 0x80]),
            Err(DecodeError::InvalidLeadByte { byte: 0xF0, offset: 0 })
        );
        assert_eq!(
            decode_nul_terminated(&[0xC3, 0x41]),
            Err(DecodeError::InvalidContinuation { byte: 0x41, offset: 1 })
        );
    }
}
