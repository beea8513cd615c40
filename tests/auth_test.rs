//! Integration tests for login, token refresh, and session handling.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn login_returns_token_pair() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    app.create_user(business, "alice@acme.test", "alice", Some("secret123"), true)
        .await;

    let response = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "emailOrUsername": "alice@acme.test",
                "password": "secret123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("token").is_some());
    assert!(response.body.get("refreshToken").is_some());
}

#[tokio::test]
async fn login_accepts_username() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    app.create_user(business, "bob@acme.test", "bob", Some("secret123"), true)
        .await;

    let token = app.login("bob", "secret123").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    app.create_user(business, "carol@acme.test", "carol", Some("secret123"), true)
        .await;

    let response = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "emailOrUsername": "carol@acme.test",
                "password": "wrong",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.message(), "Invalid credentials");
}

#[tokio::test]
async fn login_rejects_unknown_account() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };

    let response = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "emailOrUsername": "nobody@acme.test",
                "password": "secret123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.message(), "Invalid credentials");
}

#[tokio::test]
async fn login_rejects_inactive_user() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    app.create_user(business, "dave@acme.test", "dave", Some("secret123"), false)
        .await;

    let response = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "emailOrUsername": "dave@acme.test",
                "password": "secret123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.message(), "User is not active");
}

#[tokio::test]
async fn login_rejects_inactive_business() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Defunct Corp", false).await;
    app.create_user(business, "erin@defunct.test", "erin", Some("secret123"), true)
        .await;

    let response = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "emailOrUsername": "erin@defunct.test",
                "password": "secret123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.message(), "Business is not active");
}

#[tokio::test]
async fn login_rejects_account_without_password() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    app.create_user(business, "sso@acme.test", "sso", None, true)
        .await;

    let response = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "emailOrUsername": "sso@acme.test",
                "password": "anything",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.message(), "Account does not support password login");
}

#[tokio::test]
async fn login_with_cookie_flag_sets_cookies() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    app.create_user(business, "frank@acme.test", "frank", Some("secret123"), true)
        .await;

    let response = app
        .request(
            "POST",
            "/api/v1/login?cookie=true",
            Some(serde_json::json!({
                "emailOrUsername": "frank@acme.test",
                "password": "secret123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);

    let cookies: Vec<String> = response
        .headers
        .get_all(http::header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();

    assert!(cookies.iter().any(|c| c.starts_with("token=")));
    assert!(
        cookies
            .iter()
            .any(|c| c.starts_with("refreshToken=") && c.contains("Path=/api/v1/token"))
    );
}

#[tokio::test]
async fn refresh_exchanges_refresh_token() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    app.create_user(business, "gina@acme.test", "gina", Some("secret123"), true)
        .await;

    let login = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "emailOrUsername": "gina@acme.test",
                "password": "secret123",
            })),
            None,
        )
        .await;
    let refresh_token = login.body["refreshToken"].as_str().unwrap().to_string();

    let response = app
        .request("GET", "/api/v1/token", None, Some(&refresh_token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("token").is_some());
}

#[tokio::test]
async fn refresh_rejects_access_token() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, access_token) = app.seed_admin("hank@acme.test", "secret123").await;

    let response = app
        .request("GET", "/api/v1/token", None, Some(&access_token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_rejects_out_of_range_expiry() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    app.create_user(business, "iris@acme.test", "iris", Some("secret123"), true)
        .await;

    let login = app
        .request(
            "POST",
            "/api/v1/login",
            Some(serde_json::json!({
                "emailOrUsername": "iris@acme.test",
                "password": "secret123",
            })),
            None,
        )
        .await;
    let refresh_token = login.body["refreshToken"].as_str().unwrap().to_string();

    let response = app
        .request(
            "GET",
            "/api/v1/token?expiresIn=20",
            None,
            Some(&refresh_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn profile_requires_authentication() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };

    let response = app.request("GET", "/api/v1/user", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_returns_current_user() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, user_id, token) = app.seed_admin("jane@acme.test", "secret123").await;

    let response = app.request("GET", "/api/v1/user", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["id"].as_str().unwrap(), user_id.to_string());
    assert_eq!(response.body["email"].as_str().unwrap(), "jane@acme.test");
    assert!(response.body.get("passwordHash").is_none());
}

#[tokio::test]
async fn cookie_token_wins_over_bearer() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, valid_token) = app.seed_admin("kate@acme.test", "secret123").await;

    // Invalid cookie must lose the request even when the bearer is valid.
    let mut headers = http::HeaderMap::new();
    headers.insert(
        http::header::AUTHORIZATION,
        format!("Bearer {}", valid_token).parse().unwrap(),
    );
    headers.insert(http::header::COOKIE, "token=garbage".parse().unwrap());

    let response = app
        .request_with_headers("GET", "/api/v1/user", None, headers)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Invalid or expired token");
}

#[tokio::test]
async fn invalid_cookie_is_cleared_on_rejection() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let _ = app.seed_admin("lena@acme.test", "secret123").await;

    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::COOKIE, "token=garbage".parse().unwrap());

    let response = app
        .request_with_headers("GET", "/api/v1/user", None, headers)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let cleared = response
        .headers
        .get_all(http::header::SET_COOKIE)
        .iter()
        .any(|v| v.to_str().unwrap().starts_with("token=;"));
    assert!(cleared, "Expected the token cookie to be removed");
}

#[tokio::test]
async fn logout_clears_cookies() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, token) = app.seed_admin("mia@acme.test", "secret123").await;

    let response = app
        .request("POST", "/api/v1/logout", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Logged out");
}

#[tokio::test]
async fn health_is_public() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"].as_str().unwrap(), "ok");
}

#[tokio::test]
async fn session_rejects_business_deactivated_after_login() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (business, _, token) = app.seed_admin("admin@acme.test", "secret123").await;

    sqlx::query("UPDATE businesses SET is_active = false WHERE id = $1")
        .bind(business)
        .execute(&app.db_pool)
        .await
        .expect("Failed to deactivate business");

    let response = app.request("GET", "/api/v1/user", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "Business is not active");
}

#[tokio::test]
async fn session_rejects_user_deactivated_after_login() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, user_id, token) = app.seed_admin("admin@acme.test", "secret123").await;

    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(user_id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to deactivate user");

    let response = app.request("GET", "/api/v1/user", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.message(), "User is not active");
}

#[tokio::test]
async fn login_with_shared_credential_is_deterministic() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    // Email uniqueness is per-business, so the same address can exist
    // in two tenants. Login must keep resolving to the same account.
    let one = app.create_business("One", true).await;
    let two = app.create_business("Two", true).await;
    app.create_user(one, "shared@dup.test", "shared-one", Some("secret123"), true)
        .await;
    app.create_user(two, "shared@dup.test", "shared-two", Some("secret123"), true)
        .await;

    let first = app.login("shared@dup.test", "secret123").await;
    let second = app.login("shared@dup.test", "secret123").await;

    let profile_a = app.request("GET", "/api/v1/user", None, Some(&first)).await;
    let profile_b = app.request("GET", "/api/v1/user", None, Some(&second)).await;
    assert_eq!(profile_a.status, StatusCode::OK);
    assert_eq!(profile_a.body["id"], profile_b.body["id"]);
}
