//! Provider-side permission model

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Traffic direction a permission applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ingress,
    Egress,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Ingress, Direction::Egress];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ingress => "ingress",
            Direction::Egress => "egress",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a direction string is neither `ingress` nor `egress`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction: {:?}", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ingress" => Ok(Direction::Ingress),
            "egress" => Ok(Direction::Egress),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

/// A single firewall permission as the provider represents it
///
/// Equality and hashing cover every field, and the CIDR ranges are held in
/// an ordered set so two permissions listing the same ranges in a different
/// order are equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// First port of the range, absent for "all traffic" permissions
    pub from_port: Option<i32>,

    /// Last port of the range
    pub to_port: Option<i32>,

    /// Transport protocol token (e.g. "tcp", "udp", "-1")
    pub protocol: String,

    /// Source (ingress) or destination (egress) CIDR ranges
    pub cidrs: BTreeSet<String>,
}

impl Permission {
    /// Permission covering one CIDR over a port range
    pub fn new(
        from_port: i32,
        to_port: i32,
        protocol: impl Into<String>,
        cidr: impl Into<String>,
    ) -> Self {
        Self {
            from_port: Some(from_port),
            to_port: Some(to_port),
            protocol: protocol.into(),
            cidrs: BTreeSet::from([cidr.into()]),
        }
    }

    pub fn with_cidr(mut self, cidr: impl Into<String>) -> Self {
        self.cidrs.insert(cidr.into());
        self
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cidrs = self.cidrs.iter().cloned().collect::<Vec<_>>().join(",");
        match (self.from_port, self.to_port) {
            (Some(from), Some(to)) if from == to => {
                write!(f, "{}/{} from {}", self.protocol, from, cidrs)
            }
            (Some(from), Some(to)) => {
                write!(f, "{}/{}-{} from {}", self.protocol, from, to, cidrs)
            }
            _ => write!(f, "{}/* from {}", self.protocol, cidrs),
        }
    }
}

/// A security group and its current permissions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityGroup {
    /// Provider identifier (e.g. "sg-0123456789abcdef0")
    pub id: String,

    /// Group name, if the provider reports one
    pub name: Option<String>,

    /// Inbound permissions
    pub ingress: Vec<Permission>,

    /// Outbound permissions
    pub egress: Vec<Permission>,
}

impl SecurityGroup {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_ingress(mut self, permissions: Vec<Permission>) -> Self {
        self.ingress = permissions;
        self
    }

    pub fn with_egress(mut self, permissions: Vec<Permission>) -> Self {
        self.egress = permissions;
        self
    }

    /// Permissions for one direction
    pub fn permissions(&self, direction: Direction) -> &[Permission] {
        match direction {
            Direction::Ingress => &self.ingress,
            Direction::Egress => &self.egress,
        }
    }
}

/// Static credentials used to talk to the provider
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!("ingress".parse::<Direction>(), Ok(Direction::Ingress));
        assert_eq!("egress".parse::<Direction>(), Ok(Direction::Egress));
        assert!("Ingress".parse::<Direction>().is_err());
        assert!("".parse::<Direction>().is_err());
    }

    #[test]
    fn test_cidr_order_does_not_affect_equality() {
        let a = Permission::new(443, 443, "tcp", "10.0.0.0/8").with_cidr("192.168.0.0/16");
        let b = Permission::new(443, 443, "tcp", "192.168.0.0/16").with_cidr("10.0.0.0/8");
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_field_change_is_not_equal() {
        let a = Permission::new(80, 8080, "tcp", "10.0.10.100/32");
        assert_ne!(a, Permission::new(80, 8081, "tcp", "10.0.10.100/32"));
        assert_ne!(a, Permission::new(80, 8080, "udp", "10.0.10.100/32"));
        assert_ne!(a, Permission::new(80, 8080, "tcp", "10.0.10.101/32"));
    }

    #[test]
    fn test_permission_display() {
        assert_eq!(
            Permission::new(22, 22, "tcp", "10.0.0.0/8").to_string(),
            "tcp/22 from 10.0.0.0/8"
        );
        assert_eq!(
            Permission::new(80, 8080, "tcp", "10.0.10.100/32").to_string(),
            "tcp/80-8080 from 10.0.10.100/32"
        );
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("AKIAEXAMPLE", "super-secret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AKIAEXAMPLE"));
        assert!(!debug.contains("super-secret"));
    }
}
