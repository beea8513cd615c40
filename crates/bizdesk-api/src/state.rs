//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use bizdesk_auth::jwt::decoder::JwtDecoder;
use bizdesk_auth::jwt::encoder::JwtEncoder;
use bizdesk_auth::password::hasher::PasswordHasher;
use bizdesk_auth::rbac::gate::PermissionGate;
use bizdesk_auth::session::resolver::SessionResolver;
use bizdesk_core::config::AppConfig;
use bizdesk_core::events::EventBus;
use bizdesk_core::result::AppResult;
use bizdesk_database::repositories::activity::ActivityRepository;
use bizdesk_database::repositories::permission::PermissionRepository;
use bizdesk_database::repositories::role::RoleRepository;
use bizdesk_database::repositories::user::UserRepository;
use bizdesk_realtime::server::RealtimeEngine;
use bizdesk_service::activity::ActivityRecorder;
use bizdesk_service::auth::AuthService;
use bizdesk_service::role::RoleService;
use bizdesk_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,

    /// JWT token encoder.
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Token-to-session resolver used by middleware and websocket.
    pub session_resolver: Arc<SessionResolver>,
    /// Role/permission gate.
    pub permission_gate: Arc<PermissionGate>,

    /// WebSocket realtime engine.
    pub realtime: Arc<RealtimeEngine>,

    /// Login / refresh / own-password service.
    pub auth_service: Arc<AuthService>,
    /// User administration service.
    pub user_service: Arc<UserService>,
    /// Role administration service.
    pub role_service: Arc<RoleService>,
}

impl AppState {
    /// Wires repositories, auth, and services from configuration.
    ///
    /// The realtime engine and event bus come from the caller so the
    /// binary can spawn the event pump alongside the HTTP server.
    pub fn new(
        config: AppConfig,
        db_pool: PgPool,
        events: EventBus,
        realtime: Arc<RealtimeEngine>,
    ) -> AppResult<Self> {
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let role_repo = Arc::new(RoleRepository::new(db_pool.clone()));
        let permission_repo = Arc::new(PermissionRepository::new(db_pool.clone()));
        let activity_repo = Arc::new(ActivityRepository::new(db_pool.clone()));

        let hasher = Arc::new(PasswordHasher::new(&config.auth)?);
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
        let session_resolver = Arc::new(SessionResolver::new(
            JwtDecoder::new(&config.auth),
            UserRepository::new(db_pool.clone()),
        ));
        let permission_gate = Arc::new(PermissionGate::new(PermissionRepository::new(
            db_pool.clone(),
        )));

        let activity = ActivityRecorder::new(activity_repo);

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&user_repo),
            Arc::clone(&hasher),
            Arc::clone(&jwt_encoder),
            activity.clone(),
        ));
        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repo),
            Arc::clone(&role_repo),
            Arc::clone(&hasher),
            events.clone(),
            activity.clone(),
        ));
        let role_service = Arc::new(RoleService::new(
            role_repo,
            permission_repo,
            events,
            activity,
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool,
            jwt_encoder,
            jwt_decoder,
            session_resolver,
            permission_gate,
            realtime,
            auth_service,
            user_service,
            role_service,
        })
    }
}
