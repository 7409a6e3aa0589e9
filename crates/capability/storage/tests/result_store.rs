use domain::{DeviceDescriptor, NormalizedResult, OutletDetail, OutletState, PollStatus};
use pdu_storage::{InMemoryResultStore, ResultSink};

fn device(id: i64) -> DeviceDescriptor {
    DeviceDescriptor {
        id,
        name: format!("pdu-{id}"),
        brand: "ATEN".to_string(),
        model: "PE6208AV".to_string(),
        ip: "10.0.0.10".to_string(),
        snmp_community: "public".to_string(),
        snmp_version: "2c".to_string(),
        snmp_port: None,
        snmp_timeout_ms: None,
        snmp_retries: None,
        voltage_override: None,
    }
}

fn online(current: Option<f64>, ts_ms: i64) -> NormalizedResult {
    NormalizedResult {
        status: PollStatus::Online,
        voltage: Some(230.0),
        current,
        power: current.map(|value| value * 230.0),
        energy: Some(12.5),
        outlet_detail: OutletDetail::new(vec![
            Some(OutletState::On),
            Some(OutletState::Off),
            None,
        ]),
        error: String::new(),
        polled_at_ms: ts_ms,
    }
}

fn offline(ts_ms: i64) -> NormalizedResult {
    NormalizedResult {
        status: PollStatus::Offline,
        voltage: None,
        current: None,
        power: None,
        energy: None,
        outlet_detail: OutletDetail::new(vec![None, None, None]),
        error: "timeout".to_string(),
        polled_at_ms: ts_ms,
    }
}

#[tokio::test]
async fn online_write_updates_current_history_and_outlets() {
    let store = InMemoryResultStore::new(0.05);
    let pdu = device(7);
    store.write(&pdu, &online(Some(1.2), 1_000)).await.expect("write");
    store.write(&pdu, &online(Some(1.3), 2_000)).await.expect("write");

    let status = store.device_status(7).expect("status").expect("row");
    assert_eq!(status.status, PollStatus::Online);
    assert_eq!(status.last_seen_at_ms, Some(2_000));

    let current = store.current_status(7).expect("current").expect("row");
    assert_eq!(current.current, Some(1.3));
    assert_eq!(store.history(7).expect("history").len(), 2);

    let outlets = store.outlets(7).expect("outlets");
    assert_eq!(outlets.len(), 3);
    assert_eq!(outlets[0].name, "Outlet-1");
    assert_eq!(outlets[0].status, Some(OutletState::On));
    assert_eq!(outlets[2].status, None);
    assert_eq!(store.outlet_history_len(7).expect("history"), 6);
}

#[tokio::test]
async fn offline_keeps_last_readings_and_last_seen() {
    let store = InMemoryResultStore::new(0.05);
    let pdu = device(3);
    store.write(&pdu, &online(Some(0.8), 1_000)).await.expect("write");
    store.write(&pdu, &offline(5_000)).await.expect("write");

    let status = store.device_status(3).expect("status").expect("row");
    assert_eq!(status.status, PollStatus::Offline);
    assert_eq!(status.last_seen_at_ms, Some(1_000));
    assert_eq!(status.updated_at_ms, 5_000);

    let current = store.current_status(3).expect("current").expect("row");
    assert_eq!(current.current, Some(0.8));
    assert_eq!(current.polled_at_ms, 1_000);
    assert_eq!(store.history(3).expect("history").len(), 1);
    assert_eq!(store.outlet_history_len(3).expect("history"), 3);
}

#[tokio::test]
async fn usage_session_lifecycle() {
    let store = InMemoryResultStore::new(0.05);
    let pdu = device(1);
    store.write(&pdu, &online(Some(0.01), 0)).await.expect("write");
    assert!(store.usage_sessions(1).expect("sessions").is_empty());

    store.write(&pdu, &online(Some(0.5), 10_000)).await.expect("write");
    store.write(&pdu, &online(Some(0.7), 40_000)).await.expect("write");
    let sessions = store.usage_sessions(1).expect("sessions");
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].is_active);
    assert_eq!(sessions[0].started_at_ms, 10_000);
    assert_eq!(sessions[0].last_current, Some(0.7));
    assert_eq!(sessions[0].updated_at_ms, 40_000);

    store.write(&pdu, &online(None, 70_000)).await.expect("write");
    let sessions = store.usage_sessions(1).expect("sessions");
    assert!(!sessions[0].is_active);
    assert_eq!(sessions[0].ended_at_ms, Some(70_000));
    assert_eq!(sessions[0].duration_seconds, Some(60));
    assert_eq!(sessions[0].last_current, None);
}

#[tokio::test]
async fn offline_closes_open_session() {
    let store = InMemoryResultStore::new(0.05);
    let pdu = device(2);
    store.write(&pdu, &online(Some(2.0), 1_000)).await.expect("write");
    store.write(&pdu, &offline(31_000)).await.expect("write");
    store.write(&pdu, &online(Some(2.0), 61_000)).await.expect("write");

    let sessions = store.usage_sessions(2).expect("sessions");
    assert_eq!(sessions.len(), 2);
    assert!(!sessions[0].is_active);
    assert_eq!(sessions[0].duration_seconds, Some(30));
    assert_eq!(sessions[0].last_current, Some(0.0));
    assert!(sessions[1].is_active);
    assert_eq!(sessions[1].started_at_ms, 61_000);
}

#[tokio::test]
async fn devices_are_isolated() {
    let store = InMemoryResultStore::new(0.05);
    store.write(&device(1), &online(Some(1.0), 1_000)).await.expect("write");
    store.write(&device(2), &offline(1_000)).await.expect("write");

    assert_eq!(store.usage_sessions(1).expect("sessions").len(), 1);
    assert!(store.usage_sessions(2).expect("sessions").is_empty());
    assert!(store.current_status(2).expect("current").is_none());
    assert!(store.outlets(2).expect("outlets").is_empty());
}

#[tokio::test]
async fn history_keeps_latest_rows_per_device() {
    let store = InMemoryResultStore::with_history_limit(0.05, 3);
    let pdu = device(5);
    for tick in 0..9_i64 {
        let current = if tick % 2 == 0 { Some(1.0) } else { Some(0.0) };
        store
            .write(&pdu, &online(current, 1_000 + tick * 10_000))
            .await
            .expect("write");
    }
    store.write(&device(6), &online(Some(1.0), 1_000)).await.expect("write");

    let history = store.history(5).expect("history");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].polled_at_ms, 61_000);
    assert_eq!(history[2].polled_at_ms, 81_000);
    assert_eq!(store.outlet_history_len(5).expect("outlets"), 9);

    let sessions = store.usage_sessions(5).expect("sessions");
    assert_eq!(sessions.len(), 3);
    assert!(sessions[2].is_active);
    assert_eq!(sessions[2].started_at_ms, 81_000);
    assert!(sessions[..2].iter().all(|item| !item.is_active));

    assert_eq!(store.history(6).expect("history").len(), 1);
}
