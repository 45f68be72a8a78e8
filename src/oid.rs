//! Object Identifier (OID) type.
//!
//! OIDs are stored as `SmallVec<[u32; 16]>` to avoid heap allocation for common OIDs.
//! Only the encoding direction is needed here: trap definitions carry OIDs as
//! dotted text and are turned into BER on the way out.

use crate::error::{Error, OidErrorKind, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs (subidentifiers) allowed in an OID.
///
/// Per RFC 2578 Section 3.5: "there are at most 128 sub-identifiers in a value".
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
///
/// Stored as a sequence of arc values (u32). Uses SmallVec to avoid
/// heap allocation for OIDs with 16 or fewer arcs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    /// Create an empty OID.
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// # Examples
    ///
    /// ```
    /// use async_trapgen::oid::Oid;
    ///
    /// let oid = Oid::new(vec![1, 3, 6, 1, 4, 1]);
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 4, 1]);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    /// Create an OID from a slice of arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse an OID from dotted notation (e.g., "1.3.6.1.4.1.9").
    ///
    /// A leading dot is accepted (".1.3.6.1" is common in MIB tooling output).
    /// This does not check arc constraints; see [`parse_encodable`](Self::parse_encodable).
    ///
    /// # Examples
    ///
    /// ```
    /// use async_trapgen::oid::Oid;
    ///
    /// let oid = Oid::parse(".1.3.6.1.4.1.9").unwrap();
    /// assert_eq!(oid.to_string(), "1.3.6.1.4.1.9");
    ///
    /// assert!(Oid::parse("1.3.six").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs = SmallVec::new();

        for part in s.split('.') {
            if part.is_empty() {
                continue;
            }

            let arc: u32 = part.parse().map_err(|_| {
                Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s.to_string())
            })?;

            arcs.push(arc);
        }

        Ok(Self { arcs })
    }

    /// Parse an OID and check it can go on the wire.
    ///
    /// Rejects empty input, OIDs with fewer than two arcs, and anything
    /// [`validate_all`](Self::validate_all) rejects.
    pub fn parse_encodable(s: &str) -> Result<Self> {
        let oid = Self::parse(s)?;
        if oid.is_empty() {
            return Err(Error::invalid_oid_with_input(OidErrorKind::Empty, s));
        }
        if oid.len() < 2 {
            return Err(Error::invalid_oid_with_input(OidErrorKind::TooShort, s));
        }
        oid.validate_all().map_err(|e| match e {
            Error::InvalidOid { kind, .. } => Error::invalid_oid_with_input(kind, s),
            other => other,
        })?;
        Ok(oid)
    }

    /// Get the arc values.
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    /// Get the number of arcs.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Check if the OID is empty.
    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Validate OID arcs per X.690 Section 8.19.4.
    ///
    /// - arc1 must be 0, 1, or 2
    /// - arc2 must be <= 39 when arc1 is 0 or 1
    /// - arc2 can be any value when arc1 is 2, as long as `arc1 * 40 + arc2`
    ///   fits in a u32
    pub fn validate(&self) -> Result<()> {
        if self.arcs.is_empty() {
            return Ok(());
        }

        let arc1 = self.arcs[0];

        if arc1 > 2 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidFirstArc(arc1)));
        }

        if self.arcs.len() >= 2 {
            let arc2 = self.arcs[1];
            if arc1 < 2 && arc2 >= 40 {
                return Err(Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                    first: arc1,
                    second: arc2,
                }));
            }
            if arc2.checked_add(arc1 * 40).is_none() {
                return Err(Error::invalid_oid(OidErrorKind::SubidentifierOverflow));
            }
        }

        Ok(())
    }

    /// Validate that the OID doesn't exceed the maximum arc count.
    pub fn validate_length(&self) -> Result<()> {
        if self.arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                count: self.arcs.len(),
                max: MAX_OID_LEN,
            }));
        }
        Ok(())
    }

    /// Validate both arc constraints and length.
    pub fn validate_all(&self) -> Result<()> {
        self.validate()?;
        self.validate_length()
    }

    /// Encode to BER format, returning bytes in a stack-allocated buffer.
    ///
    /// OID encoding (X.690 Section 8.19):
    /// - First two arcs encoded as (arc1 * 40) + arc2 using base-128
    /// - Remaining arcs encoded as base-128 variable length
    ///
    /// Call [`validate`](Self::validate) first; the combined first
    /// subidentifier saturates rather than overflowing.
    pub fn to_ber_smallvec(&self) -> SmallVec<[u8; 64]> {
        let mut bytes = SmallVec::new();

        match self.arcs.as_slice() {
            [] => {}
            [first] => encode_subidentifier(&mut bytes, first.saturating_mul(40)),
            [first, second, rest @ ..] => {
                encode_subidentifier(
                    &mut bytes,
                    first.saturating_mul(40).saturating_add(*second),
                );
                for &arc in rest {
                    encode_subidentifier(&mut bytes, arc);
                }
            }
        }

        bytes
    }

    /// Encode to BER format.
    pub fn to_ber(&self) -> Vec<u8> {
        self.to_ber_smallvec().to_vec()
    }
}

/// Append one base-128 subidentifier, high bit set on all but the last byte.
fn encode_subidentifier(bytes: &mut SmallVec<[u8; 64]>, value: u32) {
    if value == 0 {
        bytes.push(0);
        return;
    }

    let mut tmp = [0u8; 5];
    let mut i = tmp.len();
    let mut v = value;
    while v > 0 {
        i -= 1;
        tmp[i] = (v & 0x7F) as u8;
        v >>= 7;
    }

    let last = tmp.len() - 1;
    for (idx, byte) in tmp.iter().enumerate().skip(i) {
        if idx == last {
            bytes.push(*byte);
        } else {
            bytes.push(*byte | 0x80);
        }
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.arcs {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
            first = false;
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

/// Macro to create an OID at compile time.
///
/// # Examples
///
/// ```
/// use async_trapgen::oid;
///
/// let cisco = oid!(1, 3, 6, 1, 4, 1, 9);
/// assert_eq!(cisco.to_string(), "1.3.6.1.4.1.9");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
