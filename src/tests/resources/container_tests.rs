use crate::{
    CloneOptions, ProxmoxError,
    tests::{create_test_manager, mount_get, mount_nodes},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

async fn mount_lxc_listing(mock_server: &MockServer) {
    mount_nodes(mock_server, &[("pve1", "online"), ("pve2", "online")]).await;
    mount_get(
        mock_server,
        "nodes/pve1/lxc",
        json!([{"vmid": "200", "name": "proxy", "status": "running", "type": "lxc"}]),
    )
    .await;
    mount_get(
        mock_server,
        "nodes/pve2/lxc",
        json!([{"vmid": "201", "name": "base", "status": "stopped", "template": "1"}]),
    )
    .await;
}

#[tokio::test]
async fn test_containers_across_nodes() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_lxc_listing(&mock_server).await;

    let containers = manager.containers();
    assert_eq!(containers.keys().await.unwrap(), vec!["200", "201"]);
    assert_eq!(containers.get("201").await.unwrap().node(), "pve2");
    assert!(matches!(
        containers.get("100").await,
        Err(ProxmoxError::NotFound { kind: "Container", .. })
    ));
}

#[tokio::test]
async fn test_container_lifecycle() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_lxc_listing(&mock_server).await;
    mount_get(
        &mock_server,
        "nodes/pve1/lxc/200/status/current",
        json!({"status": "stopped", "name": "proxy"}),
    )
    .await;

    for action in ["start", "suspend", "resume"] {
        Mock::given(method("POST"))
            .and(path(format!("/api2/json/nodes/pve1/lxc/200/status/{}", action)))
            .and(body_json(json!({})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": format!("UPID:pve1:vz{}:200", action) })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/lxc/200/status/reboot"))
        .and(body_json(json!({"timeout": "30"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "UPID:reboot"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let container = manager.containers().get("200").await.unwrap();
    assert!(!container.running().await.unwrap());
    assert_eq!(container.start().await.unwrap(), "UPID:pve1:vzstart:200");
    assert_eq!(container.suspend().await.unwrap(), "UPID:pve1:vzsuspend:200");
    assert_eq!(container.resume().await.unwrap(), "UPID:pve1:vzresume:200");
    assert_eq!(container.reboot(Some(30)).await.unwrap(), "UPID:reboot");
}

#[tokio::test]
async fn test_container_clone_uses_hostname() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_lxc_listing(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve2/lxc/201/clone"))
        .and(body_json(json!({
            "newid": "202",
            "hostname": "proxy-02",
            "full": "1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "UPID:vzclone"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let template = manager.containers().get("201").await.unwrap();
    assert!(
        template
            .create_clone(202, CloneOptions::new().name("proxy-02"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_remove_container() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_lxc_listing(&mock_server).await;

    Mock::given(method("DELETE"))
        .and(path("/api2/json/nodes/pve2/lxc/201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "UPID:vzdestroy"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert_eq!(
        manager.containers().remove("201").await.unwrap(),
        "UPID:vzdestroy"
    );
}
