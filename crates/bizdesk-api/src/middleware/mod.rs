//! Tower middleware: session resolution and CORS.

pub mod auth;
pub mod cors;
