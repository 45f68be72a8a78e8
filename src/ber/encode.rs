//! BER encoding into a back-to-front buffer.
//!
//! A TLV's length is only known once its content is written, so the buffer
//! grows from the end of the message towards the start: content first, then
//! length, then tag. [`EncodeBuf::finish`] flips it into wire order.

use super::length::encode_length;
use super::tag;
use crate::oid::Oid;
use bytes::Bytes;

/// Back-to-front BER writer.
///
/// Because every push lands in front of what is already there, the fields of
/// a SEQUENCE must be pushed last field first.
pub struct EncodeBuf {
    /// Encoded bytes in reverse wire order.
    rev: Vec<u8>,
}

impl EncodeBuf {
    /// Create a buffer sized for a typical trap.
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    /// Create a buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rev: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.rev.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.rev.is_empty()
    }

    /// Write `content` so it reads forwards once the buffer is flipped.
    fn prepend(&mut self, content: &[u8]) {
        self.rev.extend(content.iter().rev());
    }

    /// Write a length and tag in front of the last `content_len` bytes.
    fn prepend_header(&mut self, tag: u8, content_len: usize) {
        let (len_bytes, count) = encode_length(content_len);
        // Already reversed by encode_length
        self.rev.extend_from_slice(&len_bytes[..count]);
        self.rev.push(tag);
    }

    fn push_primitive(&mut self, tag: u8, content: &[u8]) {
        self.prepend(content);
        self.prepend_header(tag, content.len());
    }

    /// Wrap whatever `f` writes in a constructed TLV with `tag`.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let before = self.len();
        f(self);
        let content_len = self.len() - before;
        self.prepend_header(tag, content_len);
    }

    /// Wrap whatever `f` writes in a SEQUENCE.
    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    /// INTEGER, minimal two's complement.
    pub fn push_integer(&mut self, value: i32) {
        let bytes = value.to_be_bytes();
        self.push_primitive(tag::universal::INTEGER, &bytes[redundant_sign_bytes(value)..]);
    }

    /// Unsigned 32-bit value under an application tag (TimeTicks and friends).
    ///
    /// Encoded as a non-negative INTEGER, so values with the top bit set get
    /// a leading zero byte.
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        let widened = u64::from(value).to_be_bytes();
        // Significant bits plus a clear sign bit, rounded up to whole bytes
        let len = (40 - value.leading_zeros() as usize) / 8;
        self.push_primitive(tag, &widened[widened.len() - len..]);
    }

    /// OCTET STRING.
    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_primitive(tag::universal::OCTET_STRING, data);
    }

    /// OBJECT IDENTIFIER.
    pub fn push_oid(&mut self, oid: &Oid) {
        self.push_primitive(tag::universal::OBJECT_IDENTIFIER, &oid.to_ber_smallvec());
    }

    /// IpAddress, which is also how the v1 NetworkAddress goes on the wire.
    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_primitive(tag::application::IP_ADDRESS, &addr);
    }

    /// Flip into wire order.
    pub fn finish(mut self) -> Bytes {
        self.rev.reverse();
        Bytes::from(self.rev)
    }
}

impl Default for EncodeBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading bytes of `value.to_be_bytes()` that only repeat the sign.
///
/// A byte is redundant when it is all sign bits and the next byte's top bit
/// carries the same sign. At least one byte is always kept.
fn redundant_sign_bytes(value: i32) -> usize {
    let sign_bits = if value < 0 {
        value.leading_ones()
    } else {
        value.leading_zeros()
    };
    // One sign bit must stay in the first kept byte
    ((sign_bits as usize - 1) / 8).min(3)
}
