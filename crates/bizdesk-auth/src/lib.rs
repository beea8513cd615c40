//! # bizdesk-auth
//!
//! Credentials and authorization for the BizDesk platform.
//!
//! ## Modules
//!
//! - `jwt` — access/refresh token creation and validation
//! - `password` — Argon2id password hashing
//! - `session` — token-to-user session resolution
//! - `rbac` — role/permission checks with the `admin` bypass

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenClass, TokenPair};
pub use password::PasswordHasher;
pub use rbac::PermissionGate;
pub use session::{Session, SessionError, SessionResolver};
