//! Integration tests for user administration.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn list_requires_permission() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    app.create_user(business, "norole@acme.test", "norole", Some("secret123"), true)
        .await;
    let token = app.login("norole@acme.test", "secret123").await;

    let response = app.request("GET", "/api/v1/users", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.message(), "Forbidden");
}

#[tokio::test]
async fn admin_role_bypasses_permission_checks() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, token) = app.seed_admin("root@acme.test", "secret123").await;

    let response = app.request("GET", "/api/v1/users", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["page"].as_u64().unwrap(), 1);
    assert!(response.body.get("totalPages").is_some());
}

#[tokio::test]
async fn granular_permission_scopes_access() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let business = app.create_business("Acme", true).await;
    let user_id = app
        .create_user(business, "reader@acme.test", "reader", Some("secret123"), true)
        .await;
    let role_id = app.create_role(business, "Reader", &["user:read"]).await;
    app.assign_role(user_id, role_id).await;
    let token = app.login("reader@acme.test", "secret123").await;

    let list = app.request("GET", "/api/v1/users", None, Some(&token)).await;
    assert_eq!(list.status, StatusCode::OK);

    let create = app
        .request(
            "POST",
            "/api/v1/users",
            Some(serde_json::json!({
                "email": "new@acme.test",
                "firstName": "New",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_user_returns_created() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, token) = app.seed_admin("admin@acme.test", "secret123").await;

    let response = app
        .request(
            "POST",
            "/api/v1/users",
            Some(serde_json::json!({
                "email": "worker@acme.test",
                "username": "worker",
                "password": "secret123",
                "firstName": "Worker",
                "lastName": "Bee",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["email"].as_str().unwrap(), "worker@acme.test");
    assert!(response.body.get("passwordHash").is_none());

    let login = app.login("worker", "secret123").await;
    assert!(!login.is_empty());
}

#[tokio::test]
async fn create_rejects_duplicate_email() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, token) = app.seed_admin("admin@acme.test", "secret123").await;

    let body = serde_json::json!({
        "email": "dup@acme.test",
        "firstName": "Dup",
    });

    let first = app
        .request("POST", "/api/v1/users", Some(body.clone()), Some(&token))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .request("POST", "/api/v1/users", Some(body), Some(&token))
        .await;
    assert_eq!(second.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(second.message(), "Email is already in use");
}

#[tokio::test]
async fn create_rejects_username_without_password() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, token) = app.seed_admin("admin@acme.test", "secret123").await;

    let response = app
        .request(
            "POST",
            "/api/v1/users",
            Some(serde_json::json!({
                "email": "nopass@acme.test",
                "username": "nopass",
                "firstName": "No",
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_foreign_role_id() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, token) = app.seed_admin("admin@acme.test", "secret123").await;

    // A role belonging to a different business must not be assignable.
    let other_business = app.create_business("Other", true).await;
    let foreign_role = app.create_role(other_business, "Other Admin", &["admin"]).await;

    let response = app
        .request(
            "POST",
            "/api/v1/users",
            Some(serde_json::json!({
                "email": "crosstenant@acme.test",
                "firstName": "Cross",
                "roleIds": [foreign_role],
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn self_delete_is_rejected() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, user_id, token) = app.seed_admin("admin@acme.test", "secret123").await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/users/{}", user_id),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.message(), "You cannot delete your own account");
}

#[tokio::test]
async fn delete_removes_user() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (business, _, token) = app.seed_admin("admin@acme.test", "secret123").await;
    let victim = app
        .create_user(business, "victim@acme.test", "victim", Some("secret123"), true)
        .await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/v1/users/{}", victim),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let gone = app
        .request(
            "GET",
            &format!("/api/v1/users/{}", victim),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tenant_isolation_hides_foreign_users() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, token) = app.seed_admin("admin@acme.test", "secret123").await;

    let other_business = app.create_business("Other", true).await;
    let foreign_user = app
        .create_user(other_business, "foreign@other.test", "foreign", None, true)
        .await;

    let response = app
        .request(
            "GET",
            &format!("/api/v1/users/{}", foreign_user),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn change_own_password_requires_current() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, token) = app.seed_admin("admin@acme.test", "secret123").await;

    let wrong = app
        .request(
            "PUT",
            "/api/v1/user/password",
            Some(serde_json::json!({
                "currentPassword": "nope",
                "newPassword": "changed456",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNPROCESSABLE_ENTITY);

    let ok = app
        .request(
            "PUT",
            "/api/v1/user/password",
            Some(serde_json::json!({
                "currentPassword": "secret123",
                "newPassword": "changed456",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);

    let relogin = app.login("admin@acme.test", "changed456").await;
    assert!(!relogin.is_empty());
}

#[tokio::test]
async fn admin_can_set_another_users_password() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (business, _, token) = app.seed_admin("admin@acme.test", "secret123").await;
    let target = app
        .create_user(business, "target@acme.test", "target", Some("old12345"), true)
        .await;

    let response = app
        .request(
            "PUT",
            &format!("/api/v1/users/{}/password", target),
            Some(serde_json::json!({ "password": "newpass99" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let relogin = app.login("target", "newpass99").await;
    assert!(!relogin.is_empty());
}

#[tokio::test]
async fn create_rejects_malformed_email() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let (_, _, token) = app.seed_admin("admin@acme.test", "secret123").await;

    for email in ["@", "a@", "not-an-email"] {
        let response = app
            .request(
                "POST",
                "/api/v1/users",
                Some(serde_json::json!({
                    "email": email,
                    "firstName": "Eve",
                })),
                Some(&token),
            )
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST, "accepted {email:?}");
        assert_eq!(response.message(), "Invalid email format");
    }
}

#[tokio::test]
async fn foreign_role_assignment_grants_nothing() {
    let Some(app) = helpers::TestApp::spawn().await else {
        return;
    };
    let home = app.create_business("Home", true).await;
    let user_id = app
        .create_user(home, "drifter@home.test", "drifter", Some("secret123"), true)
        .await;

    // A stray assignment row pointing at another tenant's admin role
    // must not grant anything in the user's own tenant.
    let foreign = app.create_business("Foreign", true).await;
    let foreign_role = app.create_role(foreign, "Administrator", &["admin"]).await;
    app.assign_role(user_id, foreign_role).await;

    let token = app.login("drifter@home.test", "secret123").await;
    let response = app.request("GET", "/api/v1/users", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
