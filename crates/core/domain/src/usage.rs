use serde::Serialize;

/// 设备使用时段：电流持续不低于阈值的区间。每台设备同时至多一条活动时段。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSession {
    pub device_id: i64,
    pub started_at_ms: i64,
    pub ended_at_ms: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub last_current: Option<f64>,
    pub is_active: bool,
    pub updated_at_ms: i64,
}

impl UsageSession {
    pub fn open(device_id: i64, started_at_ms: i64, current: f64) -> Self {
        Self {
            device_id,
            started_at_ms,
            ended_at_ms: None,
            duration_seconds: None,
            last_current: Some(current),
            is_active: true,
            updated_at_ms: started_at_ms,
        }
    }

    /// 结束时段；时长不为负。
    pub fn close(&mut self, ended_at_ms: i64, current: Option<f64>) {
        self.ended_at_ms = Some(ended_at_ms);
        self.duration_seconds = Some(((ended_at_ms - self.started_at_ms) / 1000).max(0));
        self.last_current = current;
        self.is_active = false;
        self.updated_at_ms = ended_at_ms;
    }
}
