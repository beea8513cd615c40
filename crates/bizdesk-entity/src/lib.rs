//! Domain entities for BizDesk.
//!
//! Plain data models mapped with sqlx `FromRow` and serialized with serde.
//! Every tenant-owned entity carries its `business_id`; repositories are
//! responsible for filtering on it.

pub mod activity;
pub mod business;
pub mod permission;
pub mod role;
pub mod user;
