//! Wiremock suites driving a real [`ApiClient`] through the manager.

mod resources;

use crate::{
    ApiClient, ClientConfig, Credentials, ProxmoxAuth, ProxmoxCSRFToken, ProxmoxConnection,
    ProxmoxManager, ProxmoxPassword, ProxmoxRealm, ProxmoxTicket, ProxmoxUrl, ProxmoxUsername,
};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn create_test_connection(server_url: &str) -> ProxmoxConnection {
    let credentials = Credentials::Password {
        username: ProxmoxUsername::new_unchecked("testuser".to_string()),
        password: ProxmoxPassword::new_unchecked("testpass".to_string()),
        realm: ProxmoxRealm::new_unchecked("pam".to_string()),
    };
    let url = ProxmoxUrl::new_unchecked(server_url.to_string() + "/");
    ProxmoxConnection::new(credentials, true, url)
}

async fn create_authenticated_client(mock_server: &MockServer) -> ApiClient {
    let connection = create_test_connection(&mock_server.uri());
    let client = ApiClient::new(connection, ClientConfig::default()).unwrap();

    let ticket = ProxmoxTicket::new_unchecked("PVE:testuser@pam:4EEC61E2::sig".to_string());
    let csrf = ProxmoxCSRFToken::new_unchecked("4EEC61E2:token".to_string());
    client.set_auth(ProxmoxAuth::new(ticket, Some(csrf))).await;
    client
}

/// A manager talking to `mock_server` with a pre-issued ticket.
pub(crate) async fn create_test_manager(mock_server: &MockServer) -> ProxmoxManager {
    let client = create_authenticated_client(mock_server).await;
    ProxmoxManager::from_api(Arc::new(client))
}

/// Mounts a GET route answering with `data` wrapped in the API envelope.
pub(crate) async fn mount_get(mock_server: &MockServer, route: &str, data: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api2/json/{}", route)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(mock_server)
        .await;
}

pub(crate) async fn mount_nodes(mock_server: &MockServer, nodes: &[(&str, &str)]) {
    let data: Vec<Value> = nodes
        .iter()
        .map(|(node, status)| json!({"node": node, "status": status}))
        .collect();
    mount_get(mock_server, "nodes", Value::Array(data)).await;
}
