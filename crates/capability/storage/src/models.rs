//! 存储层数据模型
//!
//! 与 PostgreSQL 表一一对应，内存实现也使用同样的结构。

use domain::{OutletState, PollStatus};

/// 设备在线状态（`pdu_devices.status` / `last_seen`）。
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStatusRecord {
    pub device_id: i64,
    pub status: PollStatus,
    pub last_seen_at_ms: Option<i64>,
    pub updated_at_ms: i64,
}

/// 线路读数（`pdu_status_current` / `pdu_status_history`）。
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReadingRecord {
    pub device_id: i64,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub power: Option<f64>,
    pub energy: Option<f64>,
    pub polled_at_ms: i64,
}

/// 插座状态（`pdu_outlet_status_current` / `pdu_outlet_status_history`）。
#[derive(Debug, Clone, PartialEq)]
pub struct OutletStatusRecord {
    pub device_id: i64,
    pub outlet_no: usize,
    pub name: String,
    pub status: Option<OutletState>,
    pub polled_at_ms: i64,
}

impl OutletStatusRecord {
    /// 插座默认名称。
    pub fn default_name(outlet_no: usize) -> String {
        format!("Outlet-{}", outlet_no)
    }
}
