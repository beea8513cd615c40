//! Token-to-user session resolution.

pub mod resolver;

pub use resolver::{Session, SessionError, SessionResolver};
