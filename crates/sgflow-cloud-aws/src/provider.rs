//! AWS EC2 security group provider implementation

use crate::convert::{from_security_group, to_ip_permissions};
use crate::error::AwsError;
use async_trait::async_trait;
use aws_sdk_ec2::types::Filter;
use sgflow_cloud::{
    CloudError, Credentials, Direction, Permission, ProviderFactory, SecurityGroup,
    SecurityGroupProvider,
};

/// Credential provider name reported to the SDK
const CREDENTIALS_SOURCE: &str = "sgflow-request";

/// Security group provider backed by one EC2 client
pub struct Ec2Provider {
    client: aws_sdk_ec2::Client,
}

impl Ec2Provider {
    pub fn new(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }

    /// Build a client for one region using static credentials
    pub async fn connect(region: &str, credentials: &Credentials) -> crate::Result<Self> {
        if region.is_empty() {
            return Err(AwsError::MissingRegion);
        }

        let creds = aws_sdk_ec2::config::Credentials::new(
            &credentials.access_key,
            &credentials.secret,
            None, // session token
            None, // expiry
            CREDENTIALS_SOURCE,
        );

        let sdk_config = aws_config::from_env()
            .region(aws_config::Region::new(region.to_string()))
            .credentials_provider(creds)
            .load()
            .await;

        tracing::debug!(region, "EC2 client initialized");

        Ok(Self::new(aws_sdk_ec2::Client::new(&sdk_config)))
    }
}

#[async_trait]
impl SecurityGroupProvider for Ec2Provider {
    fn name(&self) -> &str {
        "aws"
    }

    async fn describe_security_group(&self, group_id: &str) -> sgflow_cloud::Result<SecurityGroup> {
        let filter = Filter::builder().name("group-id").values(group_id).build();

        let output = self
            .client
            .describe_security_groups()
            .filters(filter)
            .send()
            .await
            .map_err(|e| AwsError::sdk("DescribeSecurityGroups", e))?;

        match output.security_groups() {
            [group] => Ok(from_security_group(group)),
            [] => Err(CloudError::SecurityGroupNotFound(group_id.to_string())),
            groups => Err(CloudError::AmbiguousSecurityGroup {
                id: group_id.to_string(),
                count: groups.len(),
            }),
        }
    }

    async fn revoke(
        &self,
        group_id: &str,
        direction: Direction,
        permissions: &[Permission],
    ) -> sgflow_cloud::Result<()> {
        let ip_permissions = Some(to_ip_permissions(permissions));

        match direction {
            Direction::Ingress => {
                self.client
                    .revoke_security_group_ingress()
                    .group_id(group_id)
                    .set_ip_permissions(ip_permissions)
                    .send()
                    .await
                    .map_err(|e| AwsError::sdk("RevokeSecurityGroupIngress", e))?;
            }
            Direction::Egress => {
                self.client
                    .revoke_security_group_egress()
                    .group_id(group_id)
                    .set_ip_permissions(ip_permissions)
                    .send()
                    .await
                    .map_err(|e| AwsError::sdk("RevokeSecurityGroupEgress", e))?;
            }
        }

        tracing::info!(
            security_group = group_id,
            %direction,
            count = permissions.len(),
            "Revoked permissions"
        );
        Ok(())
    }

    async fn authorize(
        &self,
        group_id: &str,
        direction: Direction,
        permissions: &[Permission],
    ) -> sgflow_cloud::Result<()> {
        let ip_permissions = Some(to_ip_permissions(permissions));

        match direction {
            Direction::Ingress => {
                self.client
                    .authorize_security_group_ingress()
                    .group_id(group_id)
                    .set_ip_permissions(ip_permissions)
                    .send()
                    .await
                    .map_err(|e| AwsError::sdk("AuthorizeSecurityGroupIngress", e))?;
            }
            Direction::Egress => {
                self.client
                    .authorize_security_group_egress()
                    .group_id(group_id)
                    .set_ip_permissions(ip_permissions)
                    .send()
                    .await
                    .map_err(|e| AwsError::sdk("AuthorizeSecurityGroupEgress", e))?;
            }
        }

        tracing::info!(
            security_group = group_id,
            %direction,
            count = permissions.len(),
            "Authorized permissions"
        );
        Ok(())
    }
}

/// Creates an `Ec2Provider` per request from the request's credentials
#[derive(Debug, Clone, Default)]
pub struct AwsProviderFactory;

impl AwsProviderFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProviderFactory for AwsProviderFactory {
    async fn connect(
        &self,
        region: &str,
        credentials: &Credentials,
    ) -> sgflow_cloud::Result<Box<dyn SecurityGroupProvider>> {
        let provider = Ec2Provider::connect(region, credentials).await?;
        Ok(Box::new(provider))
    }
}
