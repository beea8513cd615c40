//! Shared test helpers for integration tests.
//!
//! All tests here need a live PostgreSQL instance; they skip themselves
//! when `TEST_DATABASE_URL` is not set.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use bizdesk_core::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, LoggingConfig, RealtimeConfig, ServerConfig,
};
use bizdesk_core::events::EventBus;
use bizdesk_realtime::server::RealtimeEngine;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application, or `None` when no test database
    /// is configured.
    pub async fn spawn() -> Option<Self> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let config = test_config(url);

        let db_pool = bizdesk_database::connection::create_pool(&config.database)
            .await
            .expect("Failed to connect to test database");

        bizdesk_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let (events, events_rx) = EventBus::bounded(config.realtime.event_queue_size);
        let realtime = Arc::new(RealtimeEngine::new(config.realtime.clone()));
        realtime.spawn_event_pump(events_rx);

        let state =
            bizdesk_api::state::AppState::new(config.clone(), db_pool.clone(), events, realtime)
                .expect("Failed to build app state");
        let router = bizdesk_api::router::build_router(state);

        Some(Self {
            router,
            db_pool,
            config,
        })
    }

    /// Clean all test data from the database. Keeps the seeded
    /// permission catalog.
    async fn clean_database(pool: &PgPool) {
        let tables = [
            "activity_log",
            "user_roles",
            "role_permissions",
            "roles",
            "users",
            "businesses",
        ];

        for table in &tables {
            let query = format!("DELETE FROM {}", table);
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create a business and return its ID
    pub async fn create_business(&self, name: &str, active: bool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO businesses (name, is_active) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(active)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to create business")
    }

    /// Create a user and return their ID. `password: None` disables
    /// password login for the account.
    pub async fn create_user(
        &self,
        business_id: Uuid,
        email: &str,
        username: &str,
        password: Option<&str>,
        active: bool,
    ) -> Uuid {
        let hash = password.map(|p| {
            let hasher = bizdesk_auth::PasswordHasher::new(&self.config.auth)
                .expect("Failed to build hasher");
            hasher.hash_password(p).expect("Failed to hash password")
        });

        sqlx::query_scalar(
            "INSERT INTO users (business_id, email, username, password_hash, first_name, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(business_id)
        .bind(email)
        .bind(username)
        .bind(hash)
        .bind("Test")
        .bind(active)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to create test user")
    }

    /// Create a role granting the named permissions and return its ID
    pub async fn create_role(&self, business_id: Uuid, name: &str, permissions: &[&str]) -> Uuid {
        let role_id: Uuid = sqlx::query_scalar(
            "INSERT INTO roles (business_id, name) VALUES ($1, $2) RETURNING id",
        )
        .bind(business_id)
        .bind(name)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to create role");

        for permission in permissions {
            sqlx::query(
                "INSERT INTO role_permissions (role_id, permission_id) \
                 SELECT $1, id FROM permissions WHERE name = $2",
            )
            .bind(role_id)
            .bind(permission)
            .execute(&self.db_pool)
            .await
            .expect("Failed to grant permission");
        }

        role_id
    }

    /// Assign a role to a user
    pub async fn assign_role(&self, user_id: Uuid, role_id: Uuid) {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.db_pool)
            .await
            .expect("Failed to assign role");
    }

    /// Create an active business with an admin-role user, returning
    /// `(business_id, user_id, access_token)`
    pub async fn seed_admin(&self, email: &str, password: &str) -> (Uuid, Uuid, String) {
        let business_id = self.create_business("Acme", true).await;
        let user_id = self
            .create_user(business_id, email, email, Some(password), true)
            .await;
        let role_id = self.create_role(business_id, "Administrator", &["admin"]).await;
        self.assign_role(user_id, role_id).await;

        let token = self.login(email, password).await;
        (business_id, user_id, token)
    }

    /// Login and return the access token
    pub async fn login(&self, email_or_username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/v1/login",
                Some(serde_json::json!({
                    "emailOrUsername": email_or_username,
                    "password": password,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response
            .body
            .get("token")
            .and_then(|v| v.as_str())
            .expect("No token in login response")
            .to_string()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                http::header::AUTHORIZATION,
                format!("Bearer {}", token).parse().expect("bad token"),
            );
        }
        self.request_with_headers(method, path, body, headers).await
    }

    /// Make an HTTP request with explicit extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: HeaderMap,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        for (name, value) in &headers {
            req = req.header(name, value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `message` field of an error body
    pub fn message(&self) -> &str {
        self.body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

fn test_config(database_url: String) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig::default(),
        },
        database: DatabaseConfig {
            url: database_url,
            max_connections: 5,
            min_connections: 1,
            connect_timeout_seconds: 5,
            idle_timeout_seconds: 60,
        },
        auth: AuthConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_ttl_minutes: 5,
            refresh_ttl_days: 30,
            argon_memory_cost_kib: 65536,
            argon_time_cost: 3,
        },
        realtime: RealtimeConfig::default(),
        logging: LoggingConfig::default(),
    }
}
