//! Firewall rule as requested on the wire

use serde::{Deserialize, Serialize};
use sgflow_cloud::Direction;

/// One desired firewall rule
///
/// Ports are kept as wide signed integers so out-of-range values survive
/// decoding and are rejected by validation instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    /// "ingress" or "egress"
    #[serde(rename = "type")]
    pub direction: String,

    /// Source CIDR or exact IP
    #[serde(rename = "source_ip")]
    pub source_cidr: String,

    #[serde(rename = "source_port")]
    pub from_port: i64,

    #[serde(rename = "destination_port")]
    pub to_port: i64,

    /// Transport protocol token ("tcp", "udp", ...)
    pub protocol: String,
}

impl Rule {
    pub fn new(
        direction: Direction,
        source_cidr: impl Into<String>,
        from_port: i64,
        to_port: i64,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            direction: direction.as_str().to_string(),
            source_cidr: source_cidr.into(),
            from_port,
            to_port,
            protocol: protocol.into(),
        }
    }

    /// Parsed direction, `None` when the wire value is not recognised
    pub fn direction(&self) -> Option<Direction> {
        self.direction.parse().ok()
    }
}
