//! Repository implementations, one per aggregate.

pub mod activity;
pub mod business;
pub mod permission;
pub mod role;
pub mod user;
