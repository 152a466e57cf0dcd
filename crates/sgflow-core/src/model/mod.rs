//! Request model
//!
//! Wire representation of a firewall change request. Field names follow the
//! message format published on the `firewall.update.*` subjects.

mod request;
mod rule;

// Re-exports
pub use request::*;
pub use rule::*;
