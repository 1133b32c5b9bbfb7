use crate::{
    ClusterResource, ResourceType,
    tests::{create_test_manager, mount_get},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

#[tokio::test]
async fn test_cluster_resources() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_get(
        &mock_server,
        "cluster/resources",
        json!([
            {
                "id": "qemu/100",
                "type": "qemu",
                "node": "pve1",
                "vmid": 100,
                "name": "ubuntu-vm",
                "status": "running",
                "maxmem": 8589934592_i64
            },
            {
                "id": "lxc/200",
                "type": "lxc",
                "node": "pve2",
                "vmid": 200,
                "name": "proxy",
                "status": "stopped"
            },
            {
                "id": "node/pve1",
                "type": "node",
                "node": "pve1",
                "status": "online",
                "maxcpu": 8
            },
            {
                "id": "storage/pve1/local",
                "type": "storage",
                "node": "pve1",
                "storage": "local",
                "plugintype": "dir",
                "status": "available"
            },
            {"id": "pool/dev", "type": "pool", "pool": "dev"}
        ]),
    )
    .await;

    let resources = manager.list_resources(None).await.unwrap();
    assert_eq!(resources.len(), 5);
    assert!(matches!(resources[0], ClusterResource::Qemu(_)));
    assert!(matches!(resources[1], ClusterResource::Lxc(_)));
    assert!(matches!(resources[2], ClusterResource::Node(_)));
    assert!(matches!(resources[3], ClusterResource::Storage(_)));
    assert!(matches!(resources[4], ClusterResource::Other));
    assert_eq!(resources[1].node(), Some("pve2"));
}

#[tokio::test]
async fn test_cluster_resources_filtered() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api2/json/cluster/resources"))
        .and(query_param("type", "vm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "qemu/100",
                "type": "qemu",
                "node": "pve1",
                "vmid": 100,
                "status": "running"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resources = manager
        .list_resources(Some(ResourceType::Vm))
        .await
        .unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].node(), Some("pve1"));
}
