//! Bit expansion for capture bytes
//!
//! The capture is a raw byte dump of the sampled line level, one sample per
//! bit, MSB first within each byte. Expansion gives the flat sample sequence
//! the run-length encoder works on.

/// Expand a byte buffer into individual samples, MSB first.
/// Output length is always `8 * bytes.len()`; each element is 0 or 1.
pub fn expand_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Pack a sample sequence back into bytes, MSB first.
/// The inverse of [`expand_bits`]; used for hex diagnostics of rejected
/// frames and by tests. Length must be a multiple of 8.
pub fn pack_bits(bits: &[u8]) -> Vec<u8> {
    debug_assert!(bits.len() % 8 == 0);
    bits.chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_msb_first() {
        assert_eq!(expand_bits(&[0xA5]), vec![1, 0, 1, 0, 0, 1, 0, 1]);
        assert_eq!(expand_bits(&[0x80, 0x01]).len(), 16);
        assert_eq!(expand_bits(&[0x80])[0], 1);
        assert_eq!(expand_bits(&[0x01])[7], 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(expand_bits(&[]).is_empty());
        assert!(pack_bits(&[]).is_empty());
    }

    #[test]
    fn test_expand_pack_round_trip() {
        let buffers: [&[u8]; 4] = [
            &[],
            &[0x00],
            &[0xFF, 0x00, 0xA5, 0x5A],
            &[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0],
        ];
        for buf in buffers {
            let bits = expand_bits(buf);
            assert_eq!(bits.len(), buf.len() * 8);
            assert_eq!(pack_bits(&bits), buf);
        }
    }
}
