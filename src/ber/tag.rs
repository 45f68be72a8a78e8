//! BER tag definitions for SNMP.
//!
//! Tag encoding follows X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific, 11=Private)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number (0-30, or 31 for long form)

/// Tag class bits (bits 7-6)
pub mod class {
    pub const UNIVERSAL: u8 = 0x00;
    pub const APPLICATION: u8 = 0x40;
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
}

/// Constructed bit (bit 5)
pub const CONSTRUCTED: u8 = 0x20;

/// Universal tags (class bits 00)
pub mod universal {
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x30; // Constructed
}

/// Application tags (class bits 01) - SNMP-specific types
pub mod application {
    /// IpAddress, also SNMPv1 NetworkAddress
    pub const IP_ADDRESS: u8 = 0x40;
    pub const TIMETICKS: u8 = 0x43;
}

/// PDU tags (context-specific, constructed)
pub mod pdu {
    use super::CONSTRUCTED;
    use super::class::CONTEXT_SPECIFIC;

    pub const TRAP_V1: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x04; // 0xA4
}

/// Check if a tag indicates a constructed type
#[inline]
pub const fn is_constructed(tag: u8) -> bool {
    tag & CONSTRUCTED != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructed_tags() {
        assert_eq!(pdu::TRAP_V1, 0xA4);
        assert!(is_constructed(pdu::TRAP_V1));
        assert!(is_constructed(universal::SEQUENCE));
        assert!(!is_constructed(universal::OCTET_STRING));
        assert_eq!(application::IP_ADDRESS & 0xC0, class::APPLICATION);
        assert_eq!(universal::INTEGER & 0xC0, class::UNIVERSAL);
    }
}
