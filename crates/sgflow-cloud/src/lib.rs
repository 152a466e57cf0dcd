//! sgflow cloud abstraction
//!
//! This crate provides the provider-neutral half of security group
//! reconciliation: the permission model, the provider traits, and the
//! reconciler that turns "what the group has" and "what the request wants"
//! into revoke and authorize calls.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    sgflowd                       │
//! │        (firewall.update.aws subscriber)          │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 sgflow-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │          Provider Abstraction             │   │
//! │  │  trait SecurityGroupProvider { ... }      │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │  Permission  │  │  Reconciler  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │  aws (ec2)    │
//! │   provider    │
//! └───────────────┘
//! ```

pub mod error;
pub mod permission;
pub mod plan;
pub mod provider;

// Re-exports
pub use error::{CloudError, Result};
pub use permission::{Credentials, Direction, Permission, SecurityGroup, UnknownDirection};
pub use plan::{ApplyResult, DirectionPlan, Plan, PlanSummary, apply, plan, reconcile};
pub use provider::{ProviderFactory, SecurityGroupProvider};
