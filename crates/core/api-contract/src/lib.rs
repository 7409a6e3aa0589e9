//! 诊断接口的 DTO 与 API 响应契约。

use serde::Serialize;

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// 健康检查响应。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDto {
    pub ok: bool,
    pub time_ms: i64,
}

/// 轮询计数快照。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub ticks: u64,
    pub ticks_overrun: u64,
    pub devices_polled: u64,
    pub devices_online: u64,
    pub devices_offline: u64,
    pub write_success: u64,
    pub write_failure: u64,
    pub tick_duration_ms_avg: Option<u64>,
}

/// 单个插座状态；`status` 为 "ON" / "OFF" / null。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletDto {
    pub port: usize,
    pub status: Option<String>,
}

/// 单台设备的最近一次规范化结果。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatusDto {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub ip: String,
    pub status: String,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub power: Option<f64>,
    pub energy: Option<f64>,
    pub outlets: Vec<OutletDto>,
    pub error: String,
    pub written: bool,
    pub polled_at_ms: i64,
}

/// 最近一次轮询周期。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestTickDto {
    pub tick_id: String,
    pub started_at_ms: i64,
    pub duration_ms: u64,
    pub devices: Vec<DeviceStatusDto>,
}
