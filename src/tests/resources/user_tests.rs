use crate::{
    CreateUserOptions, ProxmoxError, ValidationError,
    tests::{create_test_manager, mount_get},
};
use serde_json::json;
use tracing_test::traced_test;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

async fn mount_users(mock_server: &MockServer) {
    mount_get(
        mock_server,
        "access/users",
        json!([
            {"userid": "root@pam", "enable": 1},
            {"userid": "alice@pve", "enable": 1, "email": "alice@example.com", "expire": 0},
            {"userid": "bob@pve", "enable": 0},
            {"userid": "carol@ldap"}
        ]),
    )
    .await;
}

#[tokio::test]
async fn test_users_listing_keeps_default_realm() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_users(&mock_server).await;

    let users = manager.users();
    assert_eq!(users.keys().await.unwrap(), vec!["alice", "bob"]);
    assert!(users.contains("alice@pve").await.unwrap());
    assert!(!users.contains("root").await.unwrap());

    let alice = users.get("alice").await.unwrap();
    assert_eq!(alice.id(), "alice");
    assert_eq!(alice.qualified_id(), "alice@pve");
    assert!(matches!(
        users.get("carol").await,
        Err(ProxmoxError::NotFound { kind: "User", .. })
    ));
}

#[tokio::test]
async fn test_create_user() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_users(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/access/users"))
        .and(body_json(json!({
            "userid": "dave@pve",
            "password": "correct-horse",
            "email": "dave@example.com",
            "enable": "1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = CreateUserOptions {
        email: Some("dave@example.com".to_string()),
        enable: Some(true),
        ..Default::default()
    };
    manager
        .users()
        .create("dave@pve", "correct-horse", options)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_existing_user_is_rejected() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_users(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/access/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = manager
        .users()
        .create("alice", "correct-horse", CreateUserOptions::default())
        .await;
    assert!(matches!(
        result,
        Err(ProxmoxError::Validation {
            source: ValidationError::ConstraintViolation(_)
        })
    ));
}

#[tokio::test]
async fn test_create_user_with_short_password_makes_no_request() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;

    let result = manager
        .users()
        .create("erin", "abc", CreateUserOptions::default())
        .await;
    assert!(matches!(result, Err(ProxmoxError::Validation { .. })));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_change_password() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_users(&mock_server).await;

    Mock::given(method("PUT"))
        .and(path("/api2/json/access/password"))
        .and(body_json(json!({
            "userid": "bob@pve",
            "password": "new-secret-42",
            "confirmation-password": "old-secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let bob = manager.users().get("bob").await.unwrap();
    bob.change_password("old-secret", "new-secret-42")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_user_refetches_listing() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/access/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"userid": "bob@pve"}]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api2/json/access/users/bob@pve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let users = manager.users();
    users.remove("bob").await.unwrap();
    // The removal dropped the cached listing
    assert_eq!(users.len().await.unwrap(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_user_tokens() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_users(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/access/ticket"))
        .and(body_json(json!({"username": "alice@pve", "password": "alice-pass"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "ticket": "PVE:alice@pve:4EEC61E2::sig",
                "CSRFPreventionToken": "4EEC61E2:alice",
                "username": "alice@pve"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let alice = manager.users().get("alice").await.unwrap();
    let auth = alice.get_tokens("alice-pass").await.unwrap();
    assert_eq!(auth.ticket().as_str(), "PVE:alice@pve:4EEC61E2::sig");
    assert_eq!(
        auth.csrf_token().map(|token| token.as_str()),
        Some("4EEC61E2:alice")
    );
    assert!(!logs_contain("doesn't specify realm"));
}
