use thiserror::Error;

/// Reasons a firewall change request is rejected before any provider call
///
/// The display text is what gets written into the request's `error` field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Datacenter VPC ID invalid")]
    DatacenterIdInvalid,

    #[error("Datacenter Region invalid")]
    DatacenterRegionInvalid,

    #[error("Datacenter credentials invalid")]
    DatacenterCredentialsInvalid,

    #[error("Security Group aws id invalid")]
    SecurityGroupIdInvalid,

    #[error("Security Group name invalid")]
    SecurityGroupNameInvalid,

    #[error("Security Group must contain rules")]
    SecurityGroupRulesInvalid,

    #[error("Security Group rule type invalid")]
    RuleTypeInvalid,

    #[error("Security Group rule ip invalid")]
    RuleIpInvalid,

    #[error("Security Group rule protocol invalid")]
    RuleProtocolInvalid,

    #[error("Security Group rule from port invalid")]
    RuleFromPortInvalid,

    #[error("Security Group rule to port invalid")]
    RuleToPortInvalid,
}

pub type Result<T> = std::result::Result<T, ValidationError>;
