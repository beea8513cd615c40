//! # bizdesk-service
//!
//! Business logic service layer for BizDesk. Each service orchestrates
//! repositories, the credential layer, and the push event bus to
//! implement application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod activity;
pub mod auth;
pub mod context;
pub mod role;
pub mod user;

pub use activity::ActivityRecorder;
pub use auth::AuthService;
pub use context::RequestContext;
pub use role::RoleService;
pub use user::UserService;
