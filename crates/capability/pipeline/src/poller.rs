use crate::summary::render_summary;
use domain::{DeviceDescriptor, NormalizedResult, PollResult};
use futures::future::join_all;
use pdu_normalize::OutletNormalizer;
use pdu_storage::ResultSink;
use pdu_vendor::PduDecoder;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// 轮询输出开关（来自 `PDU_POLL_LOG_TABLE` / `PDU_POLL_DEBUG`）。
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub log_table: bool,
    pub debug: bool,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            log_table: true,
            debug: false,
        }
    }
}

/// 单台设备在本周期的结果。
#[derive(Debug, Clone)]
pub struct DeviceReport {
    pub device: DeviceDescriptor,
    pub poll: PollResult,
    pub normalized: NormalizedResult,
    pub written: bool,
}

/// 一个轮询周期的汇总；`devices` 与输入设备一一对应、顺序一致。
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick_id: String,
    pub started_at_ms: i64,
    pub duration_ms: u64,
    pub devices: Vec<DeviceReport>,
}

impl TickReport {
    /// 原始轮询结果（与输入设备顺序一致）。
    pub fn results(&self) -> Vec<PollResult> {
        self.devices.iter().map(|item| item.poll.clone()).collect()
    }

    pub fn saved(&self) -> usize {
        self.devices.iter().filter(|item| item.written).count()
    }

    pub fn online(&self) -> usize {
        self.devices
            .iter()
            .filter(|item| item.poll.is_online())
            .count()
    }
}

/// 批量轮询器：设备级并发，写入逐设备独立。
pub struct BatchPoller {
    decoder: Arc<dyn PduDecoder>,
    normalizer: OutletNormalizer,
    sink: Arc<dyn ResultSink>,
    options: PollOptions,
}

impl BatchPoller {
    pub fn new(
        decoder: Arc<dyn PduDecoder>,
        normalizer: OutletNormalizer,
        sink: Arc<dyn ResultSink>,
        options: PollOptions,
    ) -> Self {
        Self {
            decoder,
            normalizer,
            sink,
            options,
        }
    }

    /// 轮询全部设备。不会因单台设备失败而中断。
    pub async fn poll_all(&self, tick_id: &str, devices: &[DeviceDescriptor]) -> TickReport {
        let started = Instant::now();
        let started_at_ms = domain::now_epoch_ms();
        info!(
            target: "pdu.poll",
            tick_id,
            devices = devices.len(),
            "poll_tick_started"
        );

        let reports = join_all(devices.iter().map(|device| self.poll_one(device))).await;

        let report = TickReport {
            tick_id: tick_id.to_string(),
            started_at_ms,
            duration_ms: started.elapsed().as_millis() as u64,
            devices: reports,
        };
        if self.options.log_table {
            info!(target: "pdu.poll", "\n{}", render_summary(&report.devices));
        }
        let failed = report.devices.len() - report.saved();
        info!(
            target: "pdu.poll",
            tick_id,
            saved = report.saved(),
            total = report.devices.len(),
            online = report.online(),
            write_errors = failed,
            duration_ms = report.duration_ms,
            "poll_tick_completed"
        );
        report
    }

    async fn poll_one(&self, device: &DeviceDescriptor) -> DeviceReport {
        if self.options.debug {
            info!(
                target: "pdu.poll",
                device_id = device.id,
                name = %device.name,
                ip = %device.ip,
                brand = %device.brand,
                model = %device.model,
                snmp_version = %device.snmp_version,
                snmp_port = ?device.snmp_port,
                "device_poll_started"
            );
        }

        let poll = self.decoder.poll(device).await;
        pdu_telemetry::record_device_polled(poll.is_online());
        debug!(
            target: "pdu.poll",
            device_id = device.id,
            status = poll.status.as_str(),
            error = %poll.error,
            "device_poll_completed"
        );

        let normalized = self.normalizer.normalize_result(&poll);
        let written = match self.sink.write(device, &normalized).await {
            Ok(()) => {
                pdu_telemetry::record_write_success();
                true
            }
            Err(err) => {
                pdu_telemetry::record_write_failure();
                warn!(
                    target: "pdu.storage",
                    device_id = device.id,
                    name = %device.name,
                    error = %err,
                    "result_write_failed"
                );
                false
            }
        };

        DeviceReport {
            device: device.clone(),
            poll,
            normalized,
            written,
        }
    }
}
