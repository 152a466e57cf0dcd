//! Desired rules → provider permissions

use crate::model::Rule;
use sgflow_cloud::{Direction, Permission};
use std::collections::BTreeSet;

/// Convert the rules for one direction into provider permissions
///
/// Request order is kept and every rule yields exactly one permission with
/// a single CIDR. Duplicate rules produce duplicate permissions.
pub fn normalize(rules: &[Rule], direction: Direction) -> Vec<Permission> {
    rules
        .iter()
        .filter(|rule| rule.direction() == Some(direction))
        .map(to_permission)
        .collect()
}

fn to_permission(rule: &Rule) -> Permission {
    Permission {
        from_port: i32::try_from(rule.from_port).ok(),
        to_port: i32::try_from(rule.to_port).ok(),
        protocol: rule.protocol.clone(),
        cidrs: BTreeSet::from([rule.source_cidr.clone()]),
    }
}
