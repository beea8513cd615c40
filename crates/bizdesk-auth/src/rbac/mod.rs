//! Role-based permission checks.

pub mod gate;

pub use gate::{PermissionGate, evaluate};
