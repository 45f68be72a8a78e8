//! Common test fixtures and constants.

use async_trapgen::{Oid, SenderConfig, TrapDefinition, oid};
use std::path::PathBuf;
use std::sync::Arc;

// =============================================================================
// Trap definition files
// =============================================================================

/// Minimal enterprise-specific trap with a single varbind.
pub const CISCO_TRAP: &str = "\
Enterprise => 1.3.6.1.4.1.9
Generic => 6
Specific => 1
1.3.6.1.4.1.9.9.1 => hello
";

/// linkDown-style trap with a header, blank lines and several varbinds.
pub const LINK_DOWN_TRAP: &str = "\
Enterprise => 1.3.6.1.4.1.2636

Generic => 2
Specific => 0

Varbinds (ifIndex, ifDescr, ifAdminStatus)
1.3.6.1.2.1.2.2.1.1.7 => 7
1.3.6.1.2.1.2.2.1.2.7 => ge-0/0/7
1.3.6.1.2.1.2.2.1.7.7 => down
";

pub fn cisco_enterprise() -> Oid {
    oid!(1, 3, 6, 1, 4, 1, 9)
}

/// Parsed [`CISCO_TRAP`], shared the way the dispatcher expects it.
pub fn cisco_definition() -> Arc<TrapDefinition> {
    Arc::new(TrapDefinition::parse_str(CISCO_TRAP).definition)
}

/// Write `contents` to a trap definition file inside `dir`.
pub fn write_definition(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("trap_data.txt");
    std::fs::write(&path, contents).expect("write trap definition");
    path
}

// =============================================================================
// Sender configuration
// =============================================================================

/// Documentation-range agent address stamped on test traps.
pub const TEST_ENTITY: &str = "192.0.2.55";
pub const TEST_ENTITY_OCTETS: [u8; 4] = [192, 0, 2, 55];

/// Sender configuration aimed at `port` on loopback.
pub fn loopback_config(port: u16) -> SenderConfig {
    SenderConfig {
        target: "127.0.0.1".into(),
        port,
        community: "public".into(),
        entity: TEST_ENTITY.into(),
    }
}
