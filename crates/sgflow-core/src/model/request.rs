//! Firewall change request

use super::rule::Rule;
use crate::error::ValidationError;
use crate::normalize::normalize;
use serde::{Deserialize, Deserializer, Serialize};
use sgflow_cloud::{Credentials, Direction, Permission};
use std::fmt;

/// A firewall change request for one security group
///
/// Decoded from a single inbound message and dropped once the outcome has
/// been reported. Absent fields decode as empty.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Request {
    /// Correlation identifier
    #[serde(rename = "_uuid")]
    pub id: String,

    /// Batch correlation identifier
    #[serde(rename = "_batch_id")]
    pub batch_id: String,

    /// Provider tag (e.g. "aws")
    #[serde(rename = "_type")]
    pub provider_type: String,

    /// Owning datacenter (VPC) identifier
    #[serde(rename = "datacenter_vpc_id")]
    pub resource_id: String,

    #[serde(rename = "datacenter_region")]
    pub region: String,

    #[serde(rename = "datacenter_access_key")]
    pub access_key: String,

    #[serde(rename = "datacenter_access_token")]
    pub access_token: String,

    /// Network identifier, carried through untouched
    #[serde(rename = "network_aws_id")]
    pub network_id: String,

    /// Provider identifier of the target security group
    #[serde(rename = "security_group_aws_id", skip_serializing_if = "String::is_empty")]
    pub security_group_id: String,

    /// Security group name
    pub name: String,

    /// Desired rules, in request order
    #[serde(deserialize_with = "null_as_empty")]
    pub rules: Vec<Rule>,

    /// Failure reason, only set on the error path
    #[serde(rename = "error", skip_serializing_if = "String::is_empty")]
    pub error_message: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Request {
    /// Decode a request from a message body
    pub fn decode(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }

    /// Encode the request for a completion message
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Check that every required field is present
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::validate::validate(self)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.access_key, &self.access_token)
    }

    /// Desired permissions for one direction
    pub fn permissions(&self, direction: Direction) -> Vec<Permission> {
        normalize(&self.rules, direction)
    }

    /// Record a failure reason on the request
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error_message = message.into();
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("id", &self.id)
            .field("batch_id", &self.batch_id)
            .field("provider_type", &self.provider_type)
            .field("resource_id", &self.resource_id)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("access_token", &"<redacted>")
            .field("network_id", &self.network_id)
            .field("security_group_id", &self.security_group_id)
            .field("name", &self.name)
            .field("rules", &self.rules)
            .field("error_message", &self.error_message)
            .finish()
    }
}
