//! Trap definition files.
//!
//! A trap definition is a small line-oriented text format:
//!
//! ```text
//! Enterprise => 1.3.6.1.4.1.9
//! Generic => 6
//! Specific => 1
//! Varbinds
//! 1.3.6.1.4.1.9.9.1 => hello
//! ```
//!
//! `Enterprise`, `Generic` and `Specific` set the corresponding trap fields.
//! A line starting with `Varbinds` is a header and is skipped, as are blank
//! lines. Every other `key => value` line becomes a variable binding, in file
//! order, whose value is sent as an OCTET STRING. Anything else is ignored.
//!
//! Parsing never fails on content. Problems with the integer fields are
//! returned as [`FieldParseError`] warnings alongside the definition.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, FieldParseError, Result, TrapField};
use crate::oid::Oid;
use crate::pdu::parse_agent_address;

/// Separator between key and value.
pub const SEPARATOR: &str = " => ";

/// Prefix of the header line that introduces the varbind section.
pub const VARBINDS_HEADER: &str = "Varbinds";

/// A variable binding as written in the definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextVarBind {
    /// OID in dotted notation.
    pub oid: String,
    /// Value, sent verbatim as an OCTET STRING.
    pub value: String,
}

impl TextVarBind {
    /// Create a new text varbind.
    pub fn new(oid: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            value: value.into(),
        }
    }
}

/// Trap payload read from a definition file.
///
/// Built once and shared read-only between send tasks. `agent_address` is not
/// part of the file format; senders fill it in on their own copy via
/// [`with_agent_address`](Self::with_agent_address).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrapDefinition {
    /// Enterprise OID in dotted notation.
    pub enterprise: String,
    /// Generic trap type, 0 unless the file sets it.
    pub generic_trap: i32,
    /// Specific trap code, 0 unless the file sets it.
    pub specific_trap: i32,
    /// Agent address reported in the trap (IPv4, dotted quad).
    pub agent_address: String,
    /// Variable bindings in file order.
    pub varbinds: Vec<TextVarBind>,
}

/// Result of parsing a definition: the trap plus any non-fatal field problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDefinition {
    /// The parsed trap.
    pub definition: TrapDefinition,
    /// Recoverable problems, in line order.
    pub warnings: Vec<FieldParseError>,
}

impl TrapDefinition {
    /// Read and parse a definition file.
    ///
    /// The only error is failing to open or read the file (including invalid
    /// UTF-8); malformed lines are skipped or reported as warnings.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ParsedDefinition> {
        let path = path.as_ref();
        tracing::debug!(target: "async_trapgen::definition", path = %path.display(), "reading trap definition");

        let file_error = |source| Error::File {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(file_error)?;
        parse_lines(BufReader::new(file)).map_err(file_error)
    }

    /// Parse a definition from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<ParsedDefinition> {
        parse_lines(reader).map_err(|source| Error::Io {
            target: None,
            source,
        })
    }

    /// Parse a definition held in memory.
    pub fn parse_str(text: &str) -> ParsedDefinition {
        let mut acc = Accumulator::default();
        for (idx, line) in text.lines().enumerate() {
            acc.line(idx + 1, line);
        }
        acc.finish()
    }

    /// Copy of this definition carrying the given agent address.
    pub fn with_agent_address(&self, agent_address: impl Into<String>) -> TrapDefinition {
        TrapDefinition {
            agent_address: agent_address.into(),
            ..self.clone()
        }
    }

    /// Check that every OID and the agent address can be encoded.
    ///
    /// Senders perform the same conversion per message; calling this up front
    /// turns a broken definition into one error instead of one per send.
    pub fn validate(&self) -> Result<()> {
        Oid::parse_encodable(&self.enterprise)?;
        parse_agent_address(&self.agent_address)?;
        for vb in &self.varbinds {
            Oid::parse_encodable(&vb.oid)?;
        }
        Ok(())
    }
}

fn parse_lines<R: BufRead>(reader: R) -> io::Result<ParsedDefinition> {
    let mut acc = Accumulator::default();
    for (idx, line) in reader.lines().enumerate() {
        acc.line(idx + 1, &line?);
    }
    Ok(acc.finish())
}

/// Parser state carried across the forward scan.
#[derive(Default)]
struct Accumulator {
    definition: TrapDefinition,
    warnings: Vec<FieldParseError>,
}

impl Accumulator {
    fn line(&mut self, line_no: usize, line: &str) {
        if line.is_empty() || line.starts_with(VARBINDS_HEADER) {
            return;
        }

        let parts: Vec<&str> = line.split(SEPARATOR).collect();

        let field = match parts[0] {
            "Enterprise" => TrapField::Enterprise,
            "Generic" => TrapField::Generic,
            "Specific" => TrapField::Specific,
            _ => {
                if let [oid, value] = parts.as_slice() {
                    self.definition.varbinds.push(TextVarBind::new(*oid, *value));
                } else {
                    tracing::trace!(target: "async_trapgen::definition", line = line_no, "skipping unrecognized line");
                }
                return;
            }
        };

        let Some(value) = parts.get(1).copied() else {
            self.warn(FieldParseError::MissingValue {
                line: line_no,
                field,
            });
            return;
        };

        match field {
            TrapField::Enterprise => self.definition.enterprise = value.to_string(),
            TrapField::Generic => {
                if let Some(v) = self.integer(line_no, field, value) {
                    self.definition.generic_trap = v;
                }
            }
            TrapField::Specific => {
                if let Some(v) = self.integer(line_no, field, value) {
                    self.definition.specific_trap = v;
                }
            }
        }
    }

    fn integer(&mut self, line_no: usize, field: TrapField, value: &str) -> Option<i32> {
        match value.parse::<i32>() {
            Ok(v) => Some(v),
            Err(source) => {
                self.warn(FieldParseError::NotAnInteger {
                    line: line_no,
                    field,
                    value: value.to_string(),
                    source,
                });
                None
            }
        }
    }

    fn warn(&mut self, warning: FieldParseError) {
        tracing::warn!(target: "async_trapgen::definition", { line = warning.line(), field = %warning.field() }, "{}", warning);
        self.warnings.push(warning);
    }

    fn finish(self) -> ParsedDefinition {
        ParsedDefinition {
            definition: self.definition,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
Enterprise => 1.3.6.1.4.1.9
Generic => 6
Specific => 1
1.3.6.1.4.1.9.9.1 => hello
";

    #[test]
    fn test_parse_sample() {
        let parsed = TrapDefinition::parse_str(SAMPLE);
        assert!(parsed.warnings.is_empty());

        let def = parsed.definition;
        assert_eq!(def.enterprise, "1.3.6.1.4.1.9");
        assert_eq!(def.generic_trap, 6);
        assert_eq!(def.specific_trap, 1);
        assert_eq!(def.agent_address, "");
        assert_eq!(
            def.varbinds,
            vec![TextVarBind::new("1.3.6.1.4.1.9.9.1", "hello")]
        );
    }

    #[test]
    fn test_header_and_blank_lines_skipped() {
        let text = "\
Enterprise => 1.3.6.1.4.1.9

Varbinds (in order)
1.3.6.1.2.1.1.5.0 => router-1

1.3.6.1.2.1.1.6.0 => lab
";
        let def = TrapDefinition::parse_str(text).definition;
        assert_eq!(
            def.varbinds,
            vec![
                TextVarBind::new("1.3.6.1.2.1.1.5.0", "router-1"),
                TextVarBind::new("1.3.6.1.2.1.1.6.0", "lab"),
            ]
        );
    }

    #[test]
    fn test_missing_integer_fields_default_to_zero() {
        let def = TrapDefinition::parse_str("Enterprise => 1.3.6.1.4.1.9\n").definition;
        assert_eq!(def.generic_trap, 0);
        assert_eq!(def.specific_trap, 0);
        assert!(def.varbinds.is_empty());
    }

    #[test]
    fn test_non_numeric_generic_is_a_warning() {
        let parsed = TrapDefinition::parse_str("Generic => six\nSpecific => 3\n");
        assert_eq!(parsed.definition.generic_trap, 0);
        assert_eq!(parsed.definition.specific_trap, 3);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(matches!(
            &parsed.warnings[0],
            FieldParseError::NotAnInteger { line: 1, field: TrapField::Generic, value, .. } if value == "six"
        ));
    }

    #[test]
    fn test_bad_value_keeps_previous_value() {
        let parsed = TrapDefinition::parse_str("Specific => 7\nSpecific => seven\n");
        assert_eq!(parsed.definition.specific_trap, 7);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line(), 2);
    }

    #[test]
    fn test_later_occurrence_overwrites() {
        let text = "\
Enterprise => 1.3.6.1.4.1.9
Generic => 2
Enterprise => 1.3.6.1.4.1.2636
Generic => 6
";
        let def = TrapDefinition::parse_str(text).definition;
        assert_eq!(def.enterprise, "1.3.6.1.4.1.2636");
        assert_eq!(def.generic_trap, 6);
    }

    #[test]
    fn test_special_key_without_value() {
        let parsed = TrapDefinition::parse_str("Enterprise\nGeneric => 4\n");
        assert_eq!(parsed.definition.enterprise, "");
        assert_eq!(parsed.definition.generic_trap, 4);
        assert_eq!(
            parsed.warnings,
            vec![FieldParseError::MissingValue {
                line: 1,
                field: TrapField::Enterprise,
            }]
        );
    }

    #[test]
    fn test_special_keys_are_case_sensitive() {
        let def = TrapDefinition::parse_str("enterprise => 1.3.6.1\nGENERIC => 3\n").definition;
        assert_eq!(def.enterprise, "");
        assert_eq!(def.generic_trap, 0);
        assert_eq!(
            def.varbinds,
            vec![
                TextVarBind::new("enterprise", "1.3.6.1"),
                TextVarBind::new("GENERIC", "3"),
            ]
        );
    }

    #[test]
    fn test_lines_without_exactly_two_parts_are_dropped() {
        let text = "\
no separator here
1.3.6.1.1 =>missing-space
1.3.6.1.2 => a => b
1.3.6.1.3 => kept
";
        let parsed = TrapDefinition::parse_str(text);
        assert!(parsed.warnings.is_empty());
        assert_eq!(
            parsed.definition.varbinds,
            vec![TextVarBind::new("1.3.6.1.3", "kept")]
        );
    }

    #[test]
    fn test_value_is_opaque_text() {
        let def = TrapDefinition::parse_str("1.3.6.1.4.1.9.9.2 =>   spaced value  \n").definition;
        assert_eq!(def.varbinds[0].value, "  spaced value  ");
    }

    #[test]
    fn test_from_reader_handles_crlf() {
        let parsed = TrapDefinition::from_reader(Cursor::new(SAMPLE.replace('\n', "\r\n"))).unwrap();
        assert_eq!(parsed, TrapDefinition::parse_str(SAMPLE));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let first = TrapDefinition::parse_str(SAMPLE);
        let second = TrapDefinition::parse_str(SAMPLE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_file_missing() {
        let err = TrapDefinition::from_file("/nonexistent/trap_data.txt").unwrap_err();
        assert!(matches!(err, Error::File { ref path, .. } if path.ends_with("trap_data.txt")));
    }

    #[test]
    fn test_from_file_reads_definition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trap_data.txt");
        std::fs::write(&path, SAMPLE).unwrap();

        let parsed = TrapDefinition::from_file(&path).unwrap();
        assert_eq!(parsed, TrapDefinition::parse_str(SAMPLE));
    }

    #[test]
    fn test_from_file_invalid_utf8_is_file_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0x45, 0xFF, 0xFE, b'\n']).unwrap();

        assert!(matches!(
            TrapDefinition::from_file(&path),
            Err(Error::File { .. })
        ));
    }

    #[test]
    fn test_with_agent_address_leaves_original() {
        let shared = TrapDefinition::parse_str(SAMPLE).definition;
        let copy = shared.with_agent_address("192.0.2.10");
        assert_eq!(copy.agent_address, "192.0.2.10");
        assert_eq!(shared.agent_address, "");
        assert_eq!(copy.varbinds, shared.varbinds);
    }

    #[test]
    fn test_validate() {
        let def = TrapDefinition::parse_str(SAMPLE).definition;
        assert!(def.validate().is_ok());
        assert!(def.with_agent_address("10.0.0.1").validate().is_ok());
        assert!(matches!(
            def.with_agent_address("not-an-ip").validate(),
            Err(Error::InvalidAgentAddress { .. })
        ));

        let missing_enterprise = TrapDefinition::parse_str("1.3.6.1.2 => x\n").definition;
        assert!(matches!(
            missing_enterprise.validate(),
            Err(Error::InvalidOid { .. })
        ));
    }
}
