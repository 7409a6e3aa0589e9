//! 追踪初始化、轮询周期 ID 与进程级轮询计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 轮询计数快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub ticks_overrun: u64,
    pub devices_polled: u64,
    pub devices_online: u64,
    pub devices_offline: u64,
    pub write_success: u64,
    pub write_failure: u64,
    pub tick_duration_ms_total: u64,
    pub tick_duration_ms_count: u64,
}

/// 轮询计数。
pub struct TelemetryMetrics {
    ticks: AtomicU64,
    ticks_overrun: AtomicU64,
    devices_polled: AtomicU64,
    devices_online: AtomicU64,
    devices_offline: AtomicU64,
    write_success: AtomicU64,
    write_failure: AtomicU64,
    tick_duration_ms_total: AtomicU64,
    tick_duration_ms_count: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            ticks_overrun: AtomicU64::new(0),
            devices_polled: AtomicU64::new(0),
            devices_online: AtomicU64::new(0),
            devices_offline: AtomicU64::new(0),
            write_success: AtomicU64::new(0),
            write_failure: AtomicU64::new(0),
            tick_duration_ms_total: AtomicU64::new(0),
            tick_duration_ms_count: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            ticks_overrun: self.ticks_overrun.load(Ordering::Relaxed),
            devices_polled: self.devices_polled.load(Ordering::Relaxed),
            devices_online: self.devices_online.load(Ordering::Relaxed),
            devices_offline: self.devices_offline.load(Ordering::Relaxed),
            write_success: self.write_success.load(Ordering::Relaxed),
            write_failure: self.write_failure.load(Ordering::Relaxed),
            tick_duration_ms_total: self.tick_duration_ms_total.load(Ordering::Relaxed),
            tick_duration_ms_count: self.tick_duration_ms_count.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的轮询周期 ID。
pub fn new_tick_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 记录一次轮询周期及其耗时（毫秒）。
pub fn record_tick(duration_ms: u64) {
    let metrics = metrics();
    metrics.ticks.fetch_add(1, Ordering::Relaxed);
    metrics
        .tick_duration_ms_total
        .fetch_add(duration_ms, Ordering::Relaxed);
    metrics
        .tick_duration_ms_count
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录耗时超过周期的轮询。
pub fn record_tick_overrun() {
    metrics().ticks_overrun.fetch_add(1, Ordering::Relaxed);
}

/// 记录一台设备的轮询结果。
pub fn record_device_polled(online: bool) {
    let metrics = metrics();
    metrics.devices_polled.fetch_add(1, Ordering::Relaxed);
    if online {
        metrics.devices_online.fetch_add(1, Ordering::Relaxed);
    } else {
        metrics.devices_offline.fetch_add(1, Ordering::Relaxed);
    }
}

/// 记录写入成功次数。
pub fn record_write_success() {
    metrics().write_success.fetch_add(1, Ordering::Relaxed);
}

/// 记录写入失败次数。
pub fn record_write_failure() {
    metrics().write_failure.fetch_add(1, Ordering::Relaxed);
}
