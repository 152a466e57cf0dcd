//! Security group provider trait definition

use crate::error::Result;
use crate::permission::{Credentials, Direction, Permission, SecurityGroup};
use async_trait::async_trait;

/// Security group provider abstraction trait
///
/// Implementations talk to one cloud account in one region. Each call is
/// treated as atomic-or-failed; callers never retry.
#[async_trait]
pub trait SecurityGroupProvider: Send + Sync {
    /// Returns the provider name (e.g., "aws")
    fn name(&self) -> &str;

    /// Look up exactly one security group by its provider identifier
    ///
    /// Zero matches is `CloudError::SecurityGroupNotFound`, more than one is
    /// `CloudError::AmbiguousSecurityGroup`.
    async fn describe_security_group(&self, group_id: &str) -> Result<SecurityGroup>;

    /// Remove permissions from one direction of a group
    async fn revoke(
        &self,
        group_id: &str,
        direction: Direction,
        permissions: &[Permission],
    ) -> Result<()>;

    /// Add permissions to one direction of a group
    async fn authorize(
        &self,
        group_id: &str,
        direction: Direction,
        permissions: &[Permission],
    ) -> Result<()>;
}

/// Builds a provider for a single request's account and region
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    async fn connect(
        &self,
        region: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn SecurityGroupProvider>>;
}
