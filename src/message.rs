//! Community-based SNMP message format (v1).
//!
//! `SEQUENCE { version INTEGER, community OCTET STRING, pdu PDU }`

use crate::ber::EncodeBuf;
use crate::pdu::TrapV1Pdu;
use crate::version::Version;
use bytes::Bytes;

/// Largest datagram the client will hand to the transport.
///
/// IPv4 UDP payload ceiling; receivers usually accept far less, but a
/// definition this large is a mistake rather than a test case.
pub const MAX_MESSAGE_SIZE: usize = 65_507;

/// SNMPv1 trap message.
#[derive(Debug, Clone)]
pub struct TrapMessage {
    /// SNMP version (always V1)
    pub version: Version,
    /// Community string for authentication
    pub community: Bytes,
    /// Protocol data unit
    pub pdu: TrapV1Pdu,
}

impl TrapMessage {
    /// Create a V1 trap message.
    pub fn v1(community: impl Into<Bytes>, pdu: TrapV1Pdu) -> Self {
        Self {
            version: Version::V1,
            community: community.into(),
            pdu,
        }
    }

    /// Encode to BER.
    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::new();

        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i32());
        });

        buf.finish()
    }
}
