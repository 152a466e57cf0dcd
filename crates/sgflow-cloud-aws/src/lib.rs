//! AWS provider for sgflow
//!
//! This crate implements the `SecurityGroupProvider` and `ProviderFactory`
//! traits on top of the EC2 API.
//!
//! # Features
//!
//! - Exact-match security group lookup via a `group-id` filter
//! - Ingress/egress revoke and authorize calls
//! - Per-request static credentials and region
//!
//! # Example
//!
//! ```ignore
//! use sgflow_cloud::{Credentials, ProviderFactory};
//! use sgflow_cloud_aws::AwsProviderFactory;
//!
//! let factory = AwsProviderFactory::new();
//! let provider = factory
//!     .connect("eu-west-1", &Credentials::new("AKIA...", "secret"))
//!     .await?;
//!
//! let group = provider.describe_security_group("sg-0123456789abcdef0").await?;
//! ```

pub mod convert;
pub mod error;
pub mod provider;

pub use error::{AwsError, Result};
pub use provider::{AwsProviderFactory, Ec2Provider};
