//! Structural validation of firewall change requests
//!
//! Checks run in a fixed order and stop at the first failure, so a request
//! missing several fields always reports the earliest one.

use crate::error::{Result, ValidationError};
use crate::model::{Request, Rule};
use std::ops::RangeInclusive;

/// Accepted range for both ends of a rule's port range
pub const PORT_RANGE: RangeInclusive<i64> = 1..=65535;

/// Validate a request
pub fn validate(request: &Request) -> Result<()> {
    if request.resource_id.is_empty() {
        return Err(ValidationError::DatacenterIdInvalid);
    }

    if request.region.is_empty() {
        return Err(ValidationError::DatacenterRegionInvalid);
    }

    if request.access_key.is_empty() || request.access_token.is_empty() {
        return Err(ValidationError::DatacenterCredentialsInvalid);
    }

    if request.security_group_id.is_empty() {
        return Err(ValidationError::SecurityGroupIdInvalid);
    }

    if request.name.is_empty() {
        return Err(ValidationError::SecurityGroupNameInvalid);
    }

    if request.rules.is_empty() {
        return Err(ValidationError::SecurityGroupRulesInvalid);
    }

    request.rules.iter().try_for_each(validate_rule)
}

/// Validate a single rule
pub fn validate_rule(rule: &Rule) -> Result<()> {
    if rule.direction().is_none() {
        return Err(ValidationError::RuleTypeInvalid);
    }

    if rule.source_cidr.is_empty() {
        return Err(ValidationError::RuleIpInvalid);
    }

    if rule.protocol.is_empty() {
        return Err(ValidationError::RuleProtocolInvalid);
    }

    if !PORT_RANGE.contains(&rule.from_port) {
        return Err(ValidationError::RuleFromPortInvalid);
    }

    if !PORT_RANGE.contains(&rule.to_port) {
        return Err(ValidationError::RuleToPortInvalid);
    }

    Ok(())
}
