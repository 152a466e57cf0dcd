//! sgflowd - security group reconciliation daemon
//!
//! Subscribes to firewall change requests, converges the target security
//! group to the requested rules and publishes the request back on a done or
//! error subject.

pub mod bus;
pub mod error;
pub mod handler;
pub mod reporter;
pub mod server;

pub use bus::{NatsBus, Publisher};
pub use error::{BusError, HandleError, ReportError};
pub use handler::Handler;
pub use reporter::{Outcome, Reporter};
pub use server::{run, serve, shutdown_signal};
