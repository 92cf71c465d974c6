//! Packed binary-coded decimal
//!
//! Two decimal digits per byte, first digit in the high nibble:
//!
//! ```text
//! "20240131"  ->  [0x20, 0x24, 0x01, 0x31]
//! ```

use tracing::trace;

use crate::error::{Error, Result};

/// Pack `digits` into `dest`
///
/// `digits` must hold exactly `2 * dest.len()` ASCII decimal digits.
/// `dest` is left untouched when the input is rejected.
///
/// # Examples
///
/// ```
/// use heft_core::bcd;
///
/// let mut buf = [0u8; 2];
/// bcd::encode("0840", &mut buf).unwrap();
/// assert_eq!(buf, [0x08, 0x40]);
/// ```
pub fn encode(digits: &str, dest: &mut [u8]) -> Result<()> {
    let expected = dest.len() * 2;
    let raw = digits.as_bytes();
    
    if raw.len() != expected || !raw.iter().all(u8::is_ascii_digit) {
        return Err(Error::InvalidBcdInput {
            expected,
            input: digits.to_owned(),
        });
    }
    
    for (byte, pair) in dest.iter_mut().zip(raw.chunks_exact(2)) {
        *byte = ((pair[0] - b'0') << 4) | (pair[1] - b'0');
    }
    
    trace!(digits = digits, packed_len = dest.len(), "Packed BCD");
    
    Ok(())
}

/// Pack `digits` into a new `N`-byte array
pub fn encode_array<const N: usize>(digits: &str) -> Result<[u8; N]> {
    let mut out = [0u8; N];
    encode(digits, &mut out)?;
    Ok(out)
}

/// Unpack BCD bytes back into their decimal digits
///
/// # Errors
///
/// Returns [`Error::InvalidBcdByte`] if either nibble of a byte is above 9.
pub fn decode(packed: &[u8]) -> Result<String> {
    let mut digits = String::with_capacity(packed.len() * 2);
    
    for (offset, &byte) in packed.iter().enumerate() {
        let (hi, lo) = (byte >> 4, byte & 0x0F);
        if hi > 9 || lo > 9 {
            return Err(Error::InvalidBcdByte { byte, offset });
        }
        digits.push(char::from(b'0' + hi));
        digits.push(char::from(b'0' + lo));
    }
    
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    
    #[test]
    fn test_encode_currency() {
        let mut buf = [0u8; 2];
        encode("0978", &mut buf).unwrap();
        assert_eq!(buf, [0x09, 0x78]);
    }
    
    #[test]
    fn test_encode_timestamp() {
        let packed: [u8; 7] = encode_array("20240131235959").unwrap();
        assert_eq!(packed, [0x20, 0x24, 0x01, 0x31, 0x23, 0x59, 0x59]);
    }
    
    #[test]
    fn test_encode_wrong_length() {
        let mut buf = [0xAA; 2];
        
        assert!(matches!(encode("084", &mut buf), Err(Error::InvalidBcdInput { expected: 4, .. })));
        assert!(encode("08400", &mut buf).is_err());
        
        // Rejected input leaves the destination alone
        assert_eq!(buf, [0xAA, 0xAA]);
    }
    
    #[test]
    fn test_encode_non_digit() {
        let mut buf = [0u8; 2];
        assert!(encode("08A0", &mut buf).is_err());
        assert!(encode("08 0", &mut buf).is_err());
    }
    
    #[test]
    fn test_encode_empty() {
        let mut buf = [0u8; 0];
        encode("", &mut buf).unwrap();
    }
    
    #[test]
    fn test_decode_rejects_hex_nibbles() {
        let result = decode(&[0x12, 0x3A]);
        assert!(matches!(result, Err(Error::InvalidBcdByte { byte: 0x3A, offset: 1 })));
    }
    
    proptest! {
        #[test]
        fn prop_round_trip(digits in "([0-9]{2}){0,32}") {
            let mut buf = vec![0u8; digits.len() / 2];
            encode(&digits, &mut buf).unwrap();
            prop_assert_eq!(decode(&buf).unwrap(), digits);
        }
        
        #[test]
        fn prop_odd_digit_count_rejected(digits in "[0-9]([0-9]{2}){0,16}") {
            let mut buf = vec![0u8; digits.len() / 2];
            prop_assert!(encode(&digits, &mut buf).is_err());
        }
    }
}
