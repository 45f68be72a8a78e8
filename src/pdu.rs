//! SNMPv1 Trap PDU.
//!
//! The v1 Trap-PDU (RFC 1157 Section 4.1.6) has its own structure, unlike the
//! request/response PDUs which share a request-id/error-status layout.

use std::net::Ipv4Addr;

use crate::ber::{EncodeBuf, tag};
use crate::definition::TrapDefinition;
use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, encode_varbind_list};

/// SNMPv1 generic trap types (RFC 1157 Section 4.1.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum GenericTrap {
    /// coldStart(0) - agent is reinitializing, config may change
    ColdStart = 0,
    /// warmStart(1) - agent is reinitializing, config unchanged
    WarmStart = 1,
    /// linkDown(2) - communication link failure
    LinkDown = 2,
    /// linkUp(3) - communication link came up
    LinkUp = 3,
    /// authenticationFailure(4) - improperly authenticated message received
    AuthenticationFailure = 4,
    /// egpNeighborLoss(5) - EGP peer marked down
    EgpNeighborLoss = 5,
    /// enterpriseSpecific(6) - vendor-specific trap, see specific_trap field
    EnterpriseSpecific = 6,
}

impl GenericTrap {
    /// Create from integer value.
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            0 => Some(Self::ColdStart),
            1 => Some(Self::WarmStart),
            2 => Some(Self::LinkDown),
            3 => Some(Self::LinkUp),
            4 => Some(Self::AuthenticationFailure),
            5 => Some(Self::EgpNeighborLoss),
            6 => Some(Self::EnterpriseSpecific),
            _ => None,
        }
    }

    /// Get the integer value.
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// SNMPv1 Trap PDU.
///
/// `generic_trap` is kept as a raw integer: definition files may carry values
/// outside the RFC range and receivers under test should see them unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapV1Pdu {
    /// Enterprise OID (sysObjectID of the entity generating the trap)
    pub enterprise: Oid,
    /// Agent address (IP address of the agent generating the trap)
    pub agent_addr: [u8; 4],
    /// Generic trap type
    pub generic_trap: i32,
    /// Specific trap code (meaningful when generic_trap is enterpriseSpecific)
    pub specific_trap: i32,
    /// Time since the network entity was last (re)initialized (in hundredths of seconds)
    pub time_stamp: u32,
    /// Variable bindings
    pub varbinds: Vec<VarBind>,
}

impl TrapV1Pdu {
    /// Build the PDU for a trap definition.
    ///
    /// Fails if the enterprise or a varbind name is not an encodable OID, or
    /// the agent address is not IPv4.
    pub fn from_definition(definition: &TrapDefinition, time_stamp: u32) -> Result<Self> {
        let enterprise = Oid::parse_encodable(&definition.enterprise)?;
        let agent_addr = parse_agent_address(&definition.agent_address)?;

        let varbinds = definition
            .varbinds
            .iter()
            .map(|vb| {
                Ok(VarBind::new(
                    Oid::parse_encodable(&vb.oid)?,
                    vb.value.clone().into_bytes(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            enterprise,
            agent_addr,
            generic_trap: definition.generic_trap,
            specific_trap: definition.specific_trap,
            time_stamp,
            varbinds,
        })
    }

    /// Get the generic trap type as an enum.
    pub fn generic_trap_enum(&self) -> Option<GenericTrap> {
        GenericTrap::from_i32(self.generic_trap)
    }

    /// Encode to BER.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(tag::pdu::TRAP_V1, |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_unsigned32(tag::application::TIMETICKS, self.time_stamp);
            buf.push_integer(self.specific_trap);
            buf.push_integer(self.generic_trap);
            // NetworkAddress is APPLICATION 0 IMPLICIT IpAddress
            buf.push_ip_address(self.agent_addr);
            buf.push_oid(&self.enterprise);
        });
    }
}

/// Parse the agent address as an IPv4 NetworkAddress.
///
/// An empty address encodes as 0.0.0.0.
pub(crate) fn parse_agent_address(input: &str) -> Result<[u8; 4]> {
    if input.is_empty() {
        return Ok([0; 4]);
    }
    input
        .parse::<Ipv4Addr>()
        .map(|addr| addr.octets())
        .map_err(|_| Error::InvalidAgentAddress {
            input: input.into(),
        })
}
