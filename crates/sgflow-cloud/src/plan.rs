//! Rule reconciliation: diff current permissions against desired ones and
//! apply the result

use crate::error::Result;
use crate::permission::{Direction, Permission, SecurityGroup};
use crate::provider::SecurityGroupProvider;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Changes needed to converge one direction of a security group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionPlan {
    /// Current permissions with no equivalent in the desired set,
    /// in the order the provider reported them
    pub to_revoke: Vec<Permission>,

    /// Desired permissions with no equivalent in the current set,
    /// in the order they were requested
    pub to_authorize: Vec<Permission>,
}

impl DirectionPlan {
    pub fn is_empty(&self) -> bool {
        self.to_revoke.is_empty() && self.to_authorize.is_empty()
    }
}

/// Compute the set difference between current and desired permissions
///
/// A permission that differs from its counterpart in any field (ports,
/// protocol or CIDR set) shows up as a revoke of the old form plus an
/// authorize of the new one. The provider API has no update primitive.
pub fn reconcile(current: &[Permission], desired: &[Permission]) -> DirectionPlan {
    let desired_set: HashSet<&Permission> = desired.iter().collect();
    let current_set: HashSet<&Permission> = current.iter().collect();

    DirectionPlan {
        to_revoke: current
            .iter()
            .filter(|p| !desired_set.contains(p))
            .cloned()
            .collect(),
        to_authorize: desired
            .iter()
            .filter(|p| !current_set.contains(p))
            .cloned()
            .collect(),
    }
}

/// Plan for both directions of one security group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub ingress: DirectionPlan,
    pub egress: DirectionPlan,
}

impl Plan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn direction(&self, direction: Direction) -> &DirectionPlan {
        match direction {
            Direction::Ingress => &self.ingress,
            Direction::Egress => &self.egress,
        }
    }

    /// Whether applying the plan would call the provider at all
    pub fn has_changes(&self) -> bool {
        !self.ingress.is_empty() || !self.egress.is_empty()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            revoke: self.ingress.to_revoke.len() + self.egress.to_revoke.len(),
            authorize: self.ingress.to_authorize.len() + self.egress.to_authorize.len(),
        }
    }
}

/// Reconcile both directions of a group against the desired permissions
pub fn plan(
    group: &SecurityGroup,
    desired_ingress: &[Permission],
    desired_egress: &[Permission],
) -> Plan {
    Plan {
        ingress: reconcile(group.permissions(Direction::Ingress), desired_ingress),
        egress: reconcile(group.permissions(Direction::Egress), desired_egress),
    }
}

/// Summary of planned changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanSummary {
    pub revoke: usize,
    pub authorize: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to revoke, {} to authorize",
            self.revoke, self.authorize
        )
    }
}

/// Result of applying a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Permissions revoked across both directions
    pub revoked: usize,

    /// Permissions authorized across both directions
    pub authorized: usize,

    /// Provider calls issued
    pub calls: usize,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

/// Apply a plan to one security group
///
/// Ingress is converged before egress. Within a direction the revoke call
/// goes first, then the authorize call; empty lists are skipped. The first
/// failing call aborts the rest and nothing already applied is rolled back.
pub async fn apply(
    provider: &dyn SecurityGroupProvider,
    group_id: &str,
    plan: &Plan,
) -> Result<ApplyResult> {
    let started = Instant::now();
    let mut result = ApplyResult::default();

    for direction in Direction::ALL {
        let changes = plan.direction(direction);

        if !changes.to_revoke.is_empty() {
            tracing::debug!(
                security_group = group_id,
                %direction,
                count = changes.to_revoke.len(),
                "Revoking permissions"
            );
            provider
                .revoke(group_id, direction, &changes.to_revoke)
                .await?;
            result.revoked += changes.to_revoke.len();
            result.calls += 1;
        }

        if !changes.to_authorize.is_empty() {
            tracing::debug!(
                security_group = group_id,
                %direction,
                count = changes.to_authorize.len(),
                "Authorizing permissions"
            );
            provider
                .authorize(group_id, direction, &changes.to_authorize)
                .await?;
            result.authorized += changes.to_authorize.len();
            result.calls += 1;
        }
    }

    result.duration_ms = started.elapsed().as_millis() as u64;
    Ok(result)
}
