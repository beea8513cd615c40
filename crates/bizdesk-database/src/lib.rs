//! PostgreSQL access for BizDesk: pool management, migrations, and
//! repositories.
//!
//! Tenant isolation is enforced here: every query against a tenant-owned
//! table filters on the caller's business id.

pub mod connection;
pub mod migration;
pub mod repositories;
