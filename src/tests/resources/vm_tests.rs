use crate::{
    CloneOptions, ProxmoxError, ValidationError,
    tests::{create_test_manager, mount_get, mount_nodes},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

async fn mount_qemu_listing(mock_server: &MockServer) {
    mount_nodes(mock_server, &[("pve1", "online"), ("pve2", "online")]).await;
    mount_get(
        mock_server,
        "nodes/pve1/qemu",
        json!([
            {
                "vmid": 100,
                "name": "ubuntu-vm",
                "status": "running",
                "cpu": 0.23,
                "maxmem": 8589934592_i64,
                "uptime": 123456,
                "tags": "ubuntu;production"
            },
            {"vmid": 101, "name": "windows-vm", "status": "stopped", "template": 1}
        ]),
    )
    .await;
    mount_get(
        mock_server,
        "nodes/pve2/qemu",
        json!([{"vmid": "105", "name": "db", "status": "running"}]),
    )
    .await;
}

#[tokio::test]
async fn test_vms_across_nodes() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_qemu_listing(&mock_server).await;

    let vms = manager.vms();
    assert_eq!(vms.keys().await.unwrap(), vec!["100", "101", "105"]);

    let items = vms.items().await.unwrap();
    let placement: Vec<(&str, &str)> = items
        .iter()
        .map(|(id, vm)| (id.as_str(), vm.node()))
        .collect();
    assert_eq!(
        placement,
        vec![("100", "pve1"), ("101", "pve1"), ("105", "pve2")]
    );
}

#[tokio::test]
async fn test_vms_empty_cluster() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_nodes(&mock_server, &[]).await;

    assert!(manager.vms().is_empty().await.unwrap());
}

#[tokio::test]
async fn test_vm_status_and_template() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_qemu_listing(&mock_server).await;
    mount_get(
        &mock_server,
        "nodes/pve1/qemu/100/status/current",
        json!({
            "status": "running",
            "name": "ubuntu-vm",
            "qmpstatus": "running",
            "cpus": 4,
            "maxmem": 8589934592_i64
        }),
    )
    .await;
    mount_get(
        &mock_server,
        "nodes/pve1/qemu/101/config",
        json!({"name": "windows-vm", "template": 1, "memory": "4096"}),
    )
    .await;
    mount_get(
        &mock_server,
        "nodes/pve1/qemu/100/config",
        json!({"name": "ubuntu-vm", "memory": "8192"}),
    )
    .await;

    let vms = manager.vms();
    let vm100 = vms.get("100").await.unwrap();
    assert!(vm100.running().await.unwrap());
    assert!(!vm100.is_template().await.unwrap());
    assert_eq!(vm100.get_status_report().await.unwrap()["qmpstatus"], "running");

    let vm101 = vms.get("101").await.unwrap();
    assert!(vm101.is_template().await.unwrap());
}

#[tokio::test]
async fn test_vm_power_actions() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_qemu_listing(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/shutdown"))
        .and(body_json(json!({"timeout": "60", "forceStop": "1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": "UPID:pve1:00001234:0000ABCD:65A1B2C3:qmshutdown:100:root@pam:"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/suspend"))
        .and(body_json(json!({"todisk": "1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "UPID:suspend"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/status/reset"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "UPID:reset"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let vm = manager.vms().get("100").await.unwrap();
    let upid = vm.shutdown(Some(60), true).await.unwrap();
    assert!(upid.as_str().unwrap().contains("qmshutdown"));
    assert_eq!(vm.suspend(true).await.unwrap(), "UPID:suspend");
    assert_eq!(vm.reset().await.unwrap(), "UPID:reset");
}

#[tokio::test]
async fn test_vm_power_action_failure_is_surfaced() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_qemu_listing(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/101/status/start"))
        .respond_with(ResponseTemplate::new(500).set_body_string("VM 101 is a template"))
        .mount(&mock_server)
        .await;

    let vm = manager.vms().get("101").await.unwrap();
    assert!(matches!(
        vm.start(None).await,
        Err(ProxmoxError::Api { status: 500, ref message }) if message.contains("template")
    ));
}

#[tokio::test]
async fn test_vm_clone() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_qemu_listing(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/101/clone"))
        .and(body_json(json!({
            "newid": "102",
            "target": "pve2",
            "name": "web-02",
            "full": "1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "UPID:qmclone"})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/clone"))
        .and(body_json(json!({"newid": "103", "full": "0"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "UPID:linked"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let vms = manager.vms();
    let template = vms.get("101").await.unwrap();
    let options = CloneOptions::new().target("pve2").name("web-02");
    assert_eq!(template.create_clone(102, options).await.unwrap(), "UPID:qmclone");

    let vm = vms.get("100").await.unwrap();
    let linked = CloneOptions::new().full(false);
    assert_eq!(vm.create_clone("103", linked).await.unwrap(), "UPID:linked");
}

#[tokio::test]
async fn test_vm_clone_rejects_reserved_id() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_qemu_listing(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api2/json/nodes/pve1/qemu/100/clone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let vm = manager.vms().get("100").await.unwrap();
    let result = vm.create_clone(42, CloneOptions::default()).await;
    assert!(matches!(
        result,
        Err(ProxmoxError::Validation {
            source: ValidationError::ConstraintViolation(_)
        })
    ));
}

#[tokio::test]
async fn test_vm_permissions() {
    let mock_server = MockServer::start().await;
    let manager = create_test_manager(&mock_server).await;
    mount_qemu_listing(&mock_server).await;
    mount_get(
        &mock_server,
        "access/acl",
        json!([
            {"path": "/vms/100", "type": "user", "ugid": "alice@pve",
                "roleid": "PVEVMUser", "propagate": 1},
            {"path": "/vms/100", "type": "user", "ugid": "root@pam",
                "roleid": "Administrator", "propagate": 1},
            {"path": "/vms/100", "type": "group", "ugid": "ops",
                "roleid": "PVEVMAdmin", "propagate": 1},
            {"path": "/vms/1000", "type": "user", "ugid": "carol@pve",
                "roleid": "PVEVMUser", "propagate": 1},
            {"path": "/vms/100", "type": "user", "ugid": "bob@pve",
                "roleid": "PVEAuditor", "propagate": 0}
        ]),
    )
    .await;

    for (user, role) in [("alice@pve", "PVEVMUser"), ("bob@pve", "PVEAuditor")] {
        Mock::given(method("PUT"))
            .and(path("/api2/json/access/acl"))
            .and(body_json(json!({
                "path": "/vms/100",
                "roles": role,
                "users": user,
                "delete": "1",
                "propagate": "0"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let vm = manager.vms().get("100").await.unwrap();
    let permissions = vm.view_permissions().await.unwrap();
    let granted: Vec<(&str, &str)> = permissions
        .iter()
        .map(|(user, role)| (user.id(), role.as_str()))
        .collect();
    assert_eq!(granted, vec![("alice", "PVEVMUser"), ("bob", "PVEAuditor")]);

    vm.remove_all_permissions().await.unwrap();
}
