//! sgflow core
//!
//! Firewall change request model, validation and rule normalization.
//!
//! A request arrives as JSON, is checked by [`validate`], and its rules are
//! split per direction into provider permissions by [`normalize`]. The
//! reconciler in `sgflow-cloud` takes it from there.

pub mod error;
pub mod model;
pub mod normalize;
pub mod validate;

pub use error::{Result, ValidationError};
pub use model::{Request, Rule};
pub use normalize::normalize;
pub use validate::{PORT_RANGE, validate, validate_rule};
