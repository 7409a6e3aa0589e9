use domain::{
    DeviceDescriptor, OutletDetail, OutletState, PollResult, PollStatus, RawValue, Readings,
};

fn device() -> DeviceDescriptor {
    serde_json::from_str(
        r#"{"id": 7, "name": "PKY-2", "ip_address": "10.210.72.28", "community": "administrator", "brand": "ATEN", "model": "PE6208AV"}"#,
    )
    .expect("descriptor")
}

#[test]
fn descriptor_accepts_repository_field_names() {
    let device = device();
    assert_eq!(device.ip, "10.210.72.28");
    assert_eq!(device.snmp_community, "administrator");
    assert_eq!(device.snmp_version, "2c");
    assert!(device.snmp_port.is_none());
    assert_eq!(device.brand_key(), "ATEN");
}

#[test]
fn offline_result_fills_unknown_outlets() {
    let result = PollResult::offline(&device(), 8, RawValue::text("N/A"), "timeout");
    assert_eq!(result.status, PollStatus::Offline);
    assert_eq!(result.outlets.len(), 8);
    assert!(result.outlets.iter().all(|v| v == &RawValue::text("N/A")));
    assert!(result.voltage.is_nan());
    assert!(result.energy.is_nan());
    assert_eq!(result.error, "timeout");
}

#[test]
fn online_result_echoes_descriptor() {
    let readings = Readings {
        voltage: 228.84,
        current: 0.85,
        power: 105.5,
        energy: 217.7,
    };
    let result = PollResult::online(&device(), readings, vec![RawValue::Integer(2)]);
    assert!(result.is_online());
    assert_eq!(result.id, 7);
    assert_eq!(result.model, "PE6208AV");
    assert!(result.error.is_empty());
}

#[test]
fn raw_value_coercion() {
    assert_eq!(RawValue::text(" 0.85 ").as_number(), Some(0.85));
    assert_eq!(RawValue::Integer(14).as_number(), Some(14.0));
    assert_eq!(RawValue::text("n/a").as_number(), None);
    assert_eq!(RawValue::text("").as_number(), None);
    assert_eq!(RawValue::Absent.as_number(), None);
    assert_eq!(RawValue::text("2").as_code(), Some(2));
    assert_eq!(RawValue::text("1.5").as_code(), None);
}

#[test]
fn outlet_detail_serializes_dense_port_keys() {
    let detail = OutletDetail::new(vec![Some(OutletState::On), None, Some(OutletState::Off)]);
    let json = serde_json::to_string(&detail).expect("json");
    assert_eq!(json, r#"{"Port1":"ON","Port2":null,"Port3":"OFF"}"#);
    assert_eq!(detail.port(3), Some(Some(OutletState::Off)));
    assert_eq!(detail.port(0), None);
    assert_eq!(detail.port(4), None);
}
