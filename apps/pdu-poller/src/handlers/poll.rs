//! 最近一次轮询结果。
//!
//! - GET /api/poll/latest

use crate::AppState;
use api_contract::{ApiResponse, DeviceStatusDto, LatestTickDto, OutletDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdu_pipeline::{DeviceReport, TickReport};

pub async fn get_latest_poll(State(state): State<AppState>) -> Response {
    match state.latest.get().await {
        Some(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(tick_to_dto(&report))),
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<()>::error(
                "POLL.NOT_READY",
                "no tick completed yet",
            )),
        )
            .into_response(),
    }
}

pub fn tick_to_dto(report: &TickReport) -> LatestTickDto {
    LatestTickDto {
        tick_id: report.tick_id.clone(),
        started_at_ms: report.started_at_ms,
        duration_ms: report.duration_ms,
        devices: report.devices.iter().map(device_to_dto).collect(),
    }
}

fn device_to_dto(item: &DeviceReport) -> DeviceStatusDto {
    let normalized = &item.normalized;
    DeviceStatusDto {
        id: item.device.id,
        name: item.device.name.clone(),
        brand: item.device.brand.clone(),
        model: item.device.model.clone(),
        ip: item.device.ip.clone(),
        status: normalized.status.as_str().to_string(),
        voltage: normalized.voltage,
        current: normalized.current,
        power: normalized.power,
        energy: normalized.energy,
        outlets: normalized
            .outlet_detail
            .iter()
            .map(|(port, state)| OutletDto {
                port,
                status: state.map(|s| s.as_str().to_string()),
            })
            .collect(),
        error: normalized.error.clone(),
        written: item.written,
        polled_at_ms: normalized.polled_at_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{
        DeviceDescriptor, NormalizedResult, OutletDetail, OutletState, PollResult, PollStatus,
        RawValue,
    };
    use pdu_pipeline::LatestTick;

    fn report() -> TickReport {
        let device = DeviceDescriptor {
            id: 4,
            name: "rack-4".to_string(),
            brand: "APC".to_string(),
            model: "AP7921".to_string(),
            ip: "10.0.0.4".to_string(),
            snmp_community: "public".to_string(),
            snmp_version: "2c".to_string(),
            snmp_port: None,
            snmp_timeout_ms: None,
            snmp_retries: None,
            voltage_override: None,
        };
        let poll = PollResult::offline(&device, 2, RawValue::text("N/A"), "timeout");
        let normalized = NormalizedResult {
            status: PollStatus::Offline,
            voltage: None,
            current: None,
            power: None,
            energy: None,
            outlet_detail: OutletDetail::new(vec![Some(OutletState::Off), None]),
            error: "timeout".to_string(),
            polled_at_ms: 1_000,
        };
        TickReport {
            tick_id: "tick-1".to_string(),
            started_at_ms: 900,
            duration_ms: 100,
            devices: vec![DeviceReport {
                device,
                poll,
                normalized,
                written: true,
            }],
        }
    }

    #[test]
    fn tick_maps_to_device_dtos() {
        let dto = tick_to_dto(&report());
        assert_eq!(dto.tick_id, "tick-1");
        let device = &dto.devices[0];
        assert_eq!(device.id, 4);
        assert_eq!(device.status, "OFFLINE");
        assert_eq!(device.outlets.len(), 2);
        assert_eq!(device.outlets[0].status.as_deref(), Some("OFF"));
        assert_eq!(device.outlets[1].status, None);
    }

    #[tokio::test]
    async fn latest_is_served_after_a_tick() {
        let latest = LatestTick::new();
        latest.publish(report()).await;
        let response = get_latest_poll(State(AppState { latest })).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn latest_is_unavailable_before_first_tick() {
        let state = AppState {
            latest: LatestTick::new(),
        };
        let response = get_latest_poll(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
