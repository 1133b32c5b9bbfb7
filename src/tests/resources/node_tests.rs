use crate::{
    ProxmoxError,
    tests::{create_test_manager, mount_get, mount_nodes},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn mount_memory(mock_server: &MockServer, node: &str, total: u64, free: u64) {
    mount_get(
        mock_server,
        &format!("nodes/{}/status", node),
        json!({
            "uptime": 1234567,
            "memory": {"total": total, "used": total - free, "free": free},
            "cpuinfo": {"cpus": 8}
        }),
    )
    .await;
}

#[tokio::test]
async fn test_nodes_listing_is_cached() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "node": "pve1",
                    "status": "online",
                    "cpu": 0.15,
                    "maxcpu": 8,
                    "mem": 8589934592_i64,
                    "maxmem": 17179869184_i64,
                    "uptime": 1234567,
                    "id": "node/pve1",
                    "ssl_fingerprint": "AA:BB:CC:DD:EE:FF"
                },
                {"node": "pve2", "status": "offline", "id": "node/pve2"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let nodes = manager.nodes();
    assert_eq!(nodes.keys().await.unwrap(), vec!["pve1", "pve2"]);
    assert_eq!(nodes.len().await.unwrap(), 2);

    let pve1 = nodes.get("pve1").await.unwrap();
    assert!(pve1.online());
    assert_eq!(pve1.listing().maxcpu, Some(8));
    assert!(!nodes.get("pve2").await.unwrap().online());
}

#[tokio::test]
async fn test_unknown_node() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_nodes(&mock_server, &[("pve1", "online")]).await;

    let result = manager.nodes().get("pve9").await;
    assert!(matches!(
        result,
        Err(ProxmoxError::NotFound { kind: "Node", ref id }) if id == "pve9"
    ));
}

#[tokio::test]
async fn test_choose_by_most_free_ram_relative() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_nodes(&mock_server, &[("pve1", "online"), ("pve2", "online")]).await;
    // pve1 has more bytes free, pve2 the larger share
    mount_memory(&mock_server, "pve1", 64 * 1024, 16 * 1024).await;
    mount_memory(&mock_server, "pve2", 8 * 1024, 4 * 1024).await;

    let nodes = manager.nodes();
    let relative = nodes.choose_by_most_free_ram(false, true).await.unwrap();
    assert_eq!(relative.id(), "pve2");

    let absolute = nodes.choose_by_most_free_ram(true, true).await.unwrap();
    assert_eq!(absolute.id(), "pve1");
}

#[tokio::test]
async fn test_choose_by_most_free_ram_skips_offline() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_nodes(&mock_server, &[("pve1", "offline"), ("pve2", "online")]).await;
    mount_memory(&mock_server, "pve2", 1024, 10).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/status"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let node = manager
        .nodes()
        .choose_by_most_free_ram(true, true)
        .await
        .unwrap();
    assert_eq!(node.id(), "pve2");
}

#[tokio::test]
async fn test_no_online_nodes() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_nodes(&mock_server, &[("pve1", "offline"), ("pve2", "unknown")]).await;

    let nodes = manager.nodes();
    assert!(matches!(
        nodes.choose_at_random(true).await,
        Err(ProxmoxError::NoNodes { online_only: true })
    ));
    assert!(matches!(
        nodes.choose_by_most_free_ram(false, true).await,
        Err(ProxmoxError::NoNodes { online_only: true })
    ));

    let any = nodes.choose_at_random(false).await.unwrap();
    assert!(["pve1", "pve2"].contains(&any.id()));
}

#[tokio::test]
async fn test_status_failure_propagates() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_nodes(&mock_server, &[("pve1", "online")]).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/nodes/pve1/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("node unreachable"))
        .mount(&mock_server)
        .await;

    let result = manager.nodes().choose_by_most_free_ram(false, true).await;
    assert!(matches!(
        result,
        Err(ProxmoxError::Api { status: 500, ref message }) if message == "node unreachable"
    ));
}

#[tokio::test]
async fn test_node_tasks() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_nodes(&mock_server, &[("pve1", "online")]).await;

    let upid = "UPID:pve1:00001234:0000ABCD:65A1B2C3:qmstart:100:root@pam:";
    mount_get(
        &mock_server,
        "nodes/pve1/tasks",
        json!([{
            "upid": upid,
            "node": "pve1",
            "type": "qmstart",
            "user": "root@pam",
            "starttime": 1705100000,
            "endtime": 1705100002,
            "status": "OK"
        }]),
    )
    .await;
    mount_get(
        &mock_server,
        &format!("nodes/pve1/tasks/{}/status", upid),
        json!({
            "upid": upid,
            "node": "pve1",
            "type": "qmstart",
            "status": "stopped",
            "exitstatus": "OK"
        }),
    )
    .await;
    mount_get(
        &mock_server,
        &format!("nodes/pve1/tasks/{}/log", upid),
        json!([{"n": 1, "t": "starting VM 100"}, {"n": 2, "t": "TASK OK"}]),
    )
    .await;

    let node = manager.nodes().get("pve1").await.unwrap();
    let tasks = node.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_type, "qmstart");

    let status = node.get_task_status(upid).await.unwrap();
    assert!(status.is_ok());

    let log = node.get_task_log(upid).await.unwrap();
    assert_eq!(log.last().map(|line| line.t.as_str()), Some("TASK OK"));
}
