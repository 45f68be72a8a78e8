//! One trap send: connect, transmit, close.
//!
//! A [`TrapSender`] never fails the caller. Every problem becomes a
//! [`DispatchOutcome::Failure`] tagged with the [`SendStage`] it happened in.

use std::fmt;

use crate::client::{DEFAULT_TRAP_PORT, TrapClient};
use crate::definition::TrapDefinition;
use crate::error::Error;
use crate::transport::{Connector, UdpConnector};

/// Per-sender configuration.
///
/// Passed explicitly to each sender; nothing is shared through globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    /// Receiver host name or IP address.
    pub target: String,
    /// Receiver UDP port.
    pub port: u16,
    /// Community string.
    pub community: String,
    /// Agent address placed in every trap (IPv4).
    pub entity: String,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            target: "127.0.0.1".into(),
            port: DEFAULT_TRAP_PORT,
            community: "public".into(),
            entity: "127.0.0.1".into(),
        }
    }
}

/// Where a send failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SendStage {
    /// Target name did not resolve.
    Resolve,
    /// Transport could not be opened.
    Connect,
    /// Definition could not be encoded as a trap message.
    Encode,
    /// Transport rejected the datagram.
    Send,
    /// Task ended without reporting (panic or cancellation).
    Aborted,
}

impl SendStage {
    /// Lowercase name, as used in reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Connect => "connect",
            Self::Encode => "encode",
            Self::Send => "send",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for SendStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one send task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The trap was handed to the transport.
    Success,
    /// The trap was not sent.
    Failure {
        /// Stage that failed.
        stage: SendStage,
        /// Human-readable cause.
        reason: String,
    },
}

impl DispatchOutcome {
    /// Build a failure outcome from an error.
    pub fn failure(stage: SendStage, err: &Error) -> Self {
        Self::Failure {
            stage,
            reason: err.to_string(),
        }
    }

    /// Whether the send succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("successful run"),
            Self::Failure { stage, reason } => write!(f, "run failed ({}): {}", stage, reason),
        }
    }
}

/// Sends one trap per call against a fresh connection.
pub struct TrapSender<C: Connector = UdpConnector> {
    client: TrapClient<C>,
    entity: String,
}

impl TrapSender<UdpConnector> {
    /// Create a sender using real UDP transports.
    pub fn new(config: &SenderConfig) -> Self {
        Self::with_connector(config, UdpConnector)
    }
}

impl<C: Connector> TrapSender<C> {
    /// Create a sender using the given connector.
    pub fn with_connector(config: &SenderConfig, connector: C) -> Self {
        let client = TrapClient::v1(config.target.clone())
            .port(config.port)
            .community(config.community.as_bytes())
            .connector(connector)
            .build();
        Self {
            client,
            entity: config.entity.clone(),
        }
    }

    /// The underlying client.
    pub fn client(&self) -> &TrapClient<C> {
        &self.client
    }

    /// Agent address this sender stamps on each trap.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Send one trap for `definition`.
    ///
    /// The definition is not modified; the agent address goes on a private copy.
    pub async fn send(&self, definition: &TrapDefinition) -> DispatchOutcome {
        let trap = definition.with_agent_address(self.entity.as_str());

        let addr = match self.client.resolve().await {
            Ok(addr) => addr,
            Err(e) => return self.fail(SendStage::Resolve, &e),
        };

        let conn = match self.client.connect_to(addr).await {
            Ok(conn) => conn,
            Err(e) => return self.fail(SendStage::Connect, &e),
        };

        let data = match conn.encode_trap(&trap) {
            Ok(data) => data,
            Err(e) => return self.fail(SendStage::Encode, &e),
        };

        if let Err(e) = conn.send_encoded(&data).await {
            return self.fail(SendStage::Send, &e);
        }

        conn.close();
        DispatchOutcome::Success
    }

    fn fail(&self, stage: SendStage, err: &Error) -> DispatchOutcome {
        tracing::debug!(
            target: "async_trapgen::sender",
            {
                snmp.target = %self.client.config().target,
                %stage,
                error = %err
            },
            "trap send failed"
        );
        DispatchOutcome::failure(stage, err)
    }
}
