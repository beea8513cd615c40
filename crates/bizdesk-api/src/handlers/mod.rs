//! Request handlers, one module per resource.

pub mod auth;
pub mod health;
pub mod role;
pub mod user;
pub mod ws;
