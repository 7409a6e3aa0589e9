//! 轮询计数快照。
//!
//! - GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pdu_telemetry::{MetricsSnapshot, metrics};

pub async fn get_metrics() -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::success(snapshot_to_dto(metrics().snapshot()))),
    )
        .into_response()
}

pub fn snapshot_to_dto(snapshot: MetricsSnapshot) -> MetricsSnapshotDto {
    let tick_duration_ms_avg = snapshot
        .tick_duration_ms_total
        .checked_div(snapshot.tick_duration_ms_count);
    MetricsSnapshotDto {
        ticks: snapshot.ticks,
        ticks_overrun: snapshot.ticks_overrun,
        devices_polled: snapshot.devices_polled,
        devices_online: snapshot.devices_online,
        devices_offline: snapshot.devices_offline,
        write_success: snapshot.write_success,
        write_failure: snapshot.write_failure,
        tick_duration_ms_avg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_is_none_without_ticks() {
        assert_eq!(snapshot_to_dto(MetricsSnapshot::default()).tick_duration_ms_avg, None);
        let snapshot = MetricsSnapshot {
            tick_duration_ms_total: 300,
            tick_duration_ms_count: 3,
            ..MetricsSnapshot::default()
        };
        assert_eq!(snapshot_to_dto(snapshot).tick_duration_ms_avg, Some(100));
    }
}
