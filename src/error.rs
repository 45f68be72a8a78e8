//! Error types for async-trapgen.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without breaking changes.

use std::net::SocketAddr;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// Invalid arc value.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for first arc value.
    InvalidSecondArc { first: u32, second: u32 },
    /// OID too short (minimum 2 arcs).
    TooShort,
    /// OID has too many arcs (exceeds MAX_OID_LEN).
    TooManyArcs { count: usize, max: usize },
    /// Subidentifier overflow during encoding.
    SubidentifierOverflow,
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::TooShort => write!(f, "OID must have at least 2 arcs"),
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
            Self::SubidentifierOverflow => write!(f, "subidentifier overflow"),
        }
    }
}

/// Special key in a trap definition file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapField {
    /// The `Enterprise` line.
    Enterprise,
    /// The `Generic` line (generic-trap).
    Generic,
    /// The `Specific` line (specific-trap).
    Specific,
}

impl TrapField {
    /// The key as written in a trap definition file.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Enterprise => "Enterprise",
            Self::Generic => "Generic",
            Self::Specific => "Specific",
        }
    }
}

impl std::fmt::Display for TrapField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Non-fatal problem with a special field in a trap definition.
///
/// Parsing continues past these; the field keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldParseError {
    /// `Generic`/`Specific` value is not an integer.
    #[error("line {line}: {field} value {value:?} is not an integer: {source}")]
    NotAnInteger {
        line: usize,
        field: TrapField,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Special key present without a ` => value` part.
    #[error("line {line}: {field} has no value")]
    MissingValue { line: usize, field: TrapField },
}

impl FieldParseError {
    /// 1-based line number the problem was found on.
    pub fn line(&self) -> usize {
        match self {
            Self::NotAnInteger { line, .. } | Self::MissingValue { line, .. } => *line,
        }
    }

    /// Field the problem applies to.
    pub fn field(&self) -> TrapField {
        match self {
            Self::NotAnInteger { field, .. } | Self::MissingValue { field, .. } => *field,
        }
    }
}

/// Library error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Trap definition file could not be opened or read.
    #[error("cannot read trap definition {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error during communication.
    #[error("I/O error{}: {source}", target.map(|t| format!(" communicating with {}", t)).unwrap_or_default())]
    Io {
        target: Option<SocketAddr>,
        #[source]
        source: std::io::Error,
    },

    /// Target host name did not resolve to any address.
    #[error("could not resolve {target}")]
    Resolve {
        target: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Invalid OID format.
    #[error("invalid OID{}: {kind}", input.as_ref().map(|i| format!(" {:?}", i)).unwrap_or_default())]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>, // Only allocated when parsing string input
    },

    /// Agent address is not an IPv4 address (SNMPv1 NetworkAddress).
    #[error("invalid agent address {input:?}: SNMPv1 requires an IPv4 address")]
    InvalidAgentAddress { input: Box<str> },

    /// Message exceeds maximum size.
    #[error("message too large: {size} bytes exceeds maximum {max}")]
    MessageTooLarge { size: usize, max: usize },
}

impl Error {
    /// Create an invalid OID error from a kind (no input string).
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid OID error with the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }

    /// Get the target address if this error has one.
    pub fn target(&self) -> Option<SocketAddr> {
        match self {
            Self::Io { target, .. } => *target,
            _ => None,
        }
    }
}
