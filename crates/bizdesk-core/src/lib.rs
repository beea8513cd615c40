//! Core building blocks shared by every BizDesk crate.
//!
//! Holds the unified error type, configuration schemas, pagination
//! helpers, and the push-event bus used to fan out mutation events
//! to the realtime layer.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
