//! Conversions between EC2 `IpPermission` and the provider-neutral `Permission`

use aws_sdk_ec2::types::{IpPermission, IpRange, SecurityGroup as Ec2SecurityGroup};
use sgflow_cloud::{Permission, SecurityGroup};
use std::collections::BTreeSet;

/// Convert an EC2 permission into a `Permission`
///
/// Only IPv4 CIDR ranges are carried over. Group references, IPv6 ranges and
/// prefix lists are not reconciled, so a permission without any IPv4 range
/// yields `None` and is left untouched on the group.
pub fn from_ip_permission(perm: &IpPermission) -> Option<Permission> {
    let cidrs: BTreeSet<String> = perm
        .ip_ranges()
        .iter()
        .filter_map(|r| r.cidr_ip())
        .map(str::to_string)
        .collect();

    if cidrs.is_empty() {
        return None;
    }

    Some(Permission {
        from_port: perm.from_port(),
        to_port: perm.to_port(),
        protocol: perm.ip_protocol().unwrap_or_default().to_string(),
        cidrs,
    })
}

/// Convert a `Permission` into the EC2 request shape
pub fn to_ip_permission(perm: &Permission) -> IpPermission {
    perm.cidrs
        .iter()
        .fold(
            IpPermission::builder()
                .set_from_port(perm.from_port)
                .set_to_port(perm.to_port)
                .ip_protocol(&perm.protocol),
            |builder, cidr| builder.ip_ranges(IpRange::builder().cidr_ip(cidr).build()),
        )
        .build()
}

pub fn to_ip_permissions(perms: &[Permission]) -> Vec<IpPermission> {
    perms.iter().map(to_ip_permission).collect()
}

/// Convert a described EC2 security group
pub fn from_security_group(group: &Ec2SecurityGroup) -> SecurityGroup {
    SecurityGroup {
        id: group.group_id().unwrap_or_default().to_string(),
        name: group.group_name().map(str::to_string),
        ingress: group
            .ip_permissions()
            .iter()
            .filter_map(from_ip_permission)
            .collect(),
        egress: group
            .ip_permissions_egress()
            .iter()
            .filter_map(from_ip_permission)
            .collect(),
    }
}
