//! Variable binding (VarBind) type.
//!
//! A VarBind pairs an OID with a value. Trap definitions only carry text, so
//! every value goes out as an OCTET STRING.

use crate::ber::EncodeBuf;
use crate::oid::Oid;
use bytes::Bytes;

/// Variable binding - an OID with an OCTET STRING value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBind {
    /// The object identifier.
    pub oid: Oid,
    /// The value bytes.
    pub value: Bytes,
}

impl VarBind {
    /// Create a new VarBind.
    pub fn new(oid: Oid, value: impl Into<Bytes>) -> Self {
        Self {
            oid,
            value: value.into(),
        }
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            buf.push_octet_string(&self.value);
            buf.push_oid(&self.oid);
        });
    }
}

impl std::fmt::Display for VarBind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.oid, String::from_utf8_lossy(&self.value))
    }
}

/// Encode a list of VarBinds.
pub fn encode_varbind_list(buf: &mut EncodeBuf, varbinds: &[VarBind]) {
    buf.push_sequence(|buf| {
        // Encode in reverse order since we're using reverse buffer
        for vb in varbinds.iter().rev() {
            vb.encode(buf);
        }
    });
}
