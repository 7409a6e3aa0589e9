use domain::DeviceDescriptor;
use pdu_storage::file::parse_devices;
use pdu_storage::{DeviceSource, InMemoryDeviceSource, JsonFileDeviceSource};

fn device(id: i64, name: &str) -> DeviceDescriptor {
    DeviceDescriptor {
        id,
        name: name.to_string(),
        brand: "APC".to_string(),
        model: "AP7921".to_string(),
        ip: format!("10.0.0.{id}"),
        snmp_community: String::new(),
        snmp_version: "2c".to_string(),
        snmp_port: None,
        snmp_timeout_ms: None,
        snmp_retries: None,
        voltage_override: None,
    }
}

#[tokio::test]
async fn in_memory_source_lists_by_id_and_refreshes() {
    let source = InMemoryDeviceSource::new(vec![device(3, "c"), device(1, "a")]);
    let ids: Vec<i64> = source
        .list_devices()
        .await
        .expect("list")
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);

    source.replace(vec![device(2, "b")]).expect("replace");
    let devices = source.list_devices().await.expect("list");
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "b");
}

#[test]
fn parse_accepts_field_aliases() {
    let raw = r#"[
        {"id": 2, "name": "rack-b", "brand": "CYBERPOWER", "model": "PDU41001",
         "host": "10.0.0.2", "community": "private"},
        {"id": 1, "name": "rack-a", "brand": "ATEN", "model": "PE6208AV",
         "ip_address": "10.0.0.1", "snmp_port": 1161, "voltage_override": 230.0}
    ]"#;
    let devices = parse_devices(raw).expect("parse");
    assert_eq!(devices[0].id, 1);
    assert_eq!(devices[0].ip, "10.0.0.1");
    assert_eq!(devices[0].snmp_port, Some(1161));
    assert_eq!(devices[0].snmp_version, "2c");
    assert_eq!(devices[0].voltage_override, Some(230.0));
    assert_eq!(devices[1].snmp_community, "private");
    assert_eq!(devices[1].ip, "10.0.0.2");
}

#[test]
fn parse_rejects_malformed_list() {
    let err = parse_devices(r#"{"id": 1}"#).expect_err("not an array");
    assert!(err.to_string().starts_with("invalid device list"));
}

#[test]
fn parse_requires_device_id() {
    let raw = r#"[
        {"name": "PKY-1", "ip": "10.0.0.1", "community": "administrator"},
        {"name": "PKY-2", "ip": "10.0.0.2", "community": "administrator"}
    ]"#;
    let err = parse_devices(raw).expect_err("missing id");
    assert!(err.to_string().contains("id"));
}

#[test]
fn parse_rejects_duplicate_ids() {
    let raw = r#"[
        {"id": 4, "name": "rack-a", "ip": "10.0.0.1"},
        {"id": 4, "name": "rack-b", "ip": "10.0.0.2"}
    ]"#;
    let err = parse_devices(raw).expect_err("duplicate id");
    assert_eq!(err.to_string(), "invalid device list: duplicate id 4");
}

#[tokio::test]
async fn file_source_rereads_each_call() {
    let path = std::env::temp_dir().join(format!("pdu-devices-{}.json", std::process::id()));
    let path_str = path.to_string_lossy().to_string();
    tokio::fs::write(&path, r#"[{"id": 1, "name": "a", "ip": "10.0.0.1"}]"#)
        .await
        .expect("write");
    let source = JsonFileDeviceSource::new(path_str);
    assert_eq!(source.list_devices().await.expect("list").len(), 1);

    tokio::fs::write(
        &path,
        r#"[{"id": 1, "name": "a", "ip": "10.0.0.1"}, {"id": 2, "name": "b", "ip": "10.0.0.2"}]"#,
    )
    .await
    .expect("write");
    assert_eq!(source.list_devices().await.expect("list").len(), 2);
    let _ = tokio::fs::remove_file(&path).await;
}

#[tokio::test]
async fn missing_file_is_an_error() {
    let source = JsonFileDeviceSource::new("/nonexistent/pdu-devices.json");
    let err = source.list_devices().await.expect_err("missing");
    assert!(err.to_string().contains("/nonexistent/pdu-devices.json"));
}
