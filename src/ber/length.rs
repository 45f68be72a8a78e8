//! BER length encoding.
//!
//! Length encoding follows X.690 Section 8.1.3:
//! - Short form: Single byte, bit 8=0, value 0-127
//! - Long form: Initial byte (bit 8=1, bits 7-1=count), followed by length bytes

/// Encode a length value (returns bytes in reverse order for prepending).
///
/// Uses short form for lengths <= 127, long form otherwise.
pub fn encode_length(len: usize) -> ([u8; 5], usize) {
    let mut buf = [0u8; 5];

    if len <= 127 {
        buf[0] = len as u8;
        (buf, 1)
    } else if len <= 0xFF {
        buf[0] = len as u8;
        buf[1] = 0x81;
        (buf, 2)
    } else if len <= 0xFFFF {
        buf[0] = len as u8;
        buf[1] = (len >> 8) as u8;
        buf[2] = 0x82;
        (buf, 3)
    } else if len <= 0xFFFFFF {
        buf[0] = len as u8;
        buf[1] = (len >> 8) as u8;
        buf[2] = (len >> 16) as u8;
        buf[3] = 0x83;
        (buf, 4)
    } else {
        buf[0] = len as u8;
        buf[1] = (len >> 8) as u8;
        buf[2] = (len >> 16) as u8;
        buf[3] = (len >> 24) as u8;
        buf[4] = 0x84;
        (buf, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward(len: usize) -> Vec<u8> {
        let (bytes, count) = encode_length(len);
        bytes[..count].iter().rev().copied().collect()
    }

    #[test]
    fn test_short_form() {
        assert_eq!(forward(0), vec![0x00]);
        assert_eq!(forward(127), vec![0x7F]);
    }

    #[test]
    fn test_long_form() {
        assert_eq!(forward(128), vec![0x81, 0x80]);
        assert_eq!(forward(255), vec![0x81, 0xFF]);
        assert_eq!(forward(256), vec![0x82, 0x01, 0x00]);
        assert_eq!(forward(0x01_0000), vec![0x83, 0x01, 0x00, 0x00]);
    }
}
