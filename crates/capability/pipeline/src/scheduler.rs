//! 固定周期轮询调度。
//!
//! 启动后立即执行一次，之后每个周期执行一次。周期之间不重叠：
//! 上一周期超时未完成时跳过错过的触发点，并记录 `poll_tick_overrun`。

use crate::PipelineError;
use crate::poller::{BatchPoller, TickReport};
use pdu_storage::DeviceSource;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{Instrument, error, info_span, warn};

/// 最近一次轮询结果（供诊断接口读取）。
#[derive(Clone, Default)]
pub struct LatestTick {
    inner: Arc<RwLock<Option<Arc<TickReport>>>>,
}

impl LatestTick {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Arc<TickReport>> {
        self.inner.read().await.clone()
    }

    pub async fn publish(&self, report: TickReport) {
        *self.inner.write().await = Some(Arc::new(report));
    }
}

pub struct PollScheduler {
    source: Arc<dyn DeviceSource>,
    poller: Arc<BatchPoller>,
    interval: Duration,
    latest: LatestTick,
}

impl PollScheduler {
    pub fn new(
        source: Arc<dyn DeviceSource>,
        poller: Arc<BatchPoller>,
        interval: Duration,
        latest: LatestTick,
    ) -> Self {
        Self {
            source,
            poller,
            interval,
            latest,
        }
    }

    pub fn latest(&self) -> LatestTick {
        self.latest.clone()
    }

    /// 执行一个周期：刷新设备清单后批量轮询。
    pub async fn run_tick(&self) -> Result<TickReport, PipelineError> {
        let tick_id = pdu_telemetry::new_tick_id();
        let span = info_span!("poll_tick", tick_id = %tick_id);
        async {
            let started = Instant::now();
            let devices = self
                .source
                .list_devices()
                .await
                .map_err(|err| PipelineError::Source(err.to_string()))?;
            let report = self.poller.poll_all(&tick_id, &devices).await;
            pdu_telemetry::record_tick(started.elapsed().as_millis() as u64);
            self.latest.publish(report.clone()).await;
            Ok::<_, PipelineError>(report)
        }
        .instrument(span)
        .await
    }

    /// 循环执行直到 `shutdown` 完成；进行中的周期会先完成再退出。
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }
            let started = Instant::now();
            if let Err(err) = self.run_tick().await {
                error!(target: "pdu.poll", error = %err, "poll_tick_failed");
            }
            let elapsed = started.elapsed();
            if elapsed > self.interval {
                pdu_telemetry::record_tick_overrun();
                warn!(
                    target: "pdu.poll",
                    elapsed_ms = elapsed.as_millis() as u64,
                    interval_ms = self.interval.as_millis() as u64,
                    "poll_tick_overrun"
                );
            }
        }
    }
}
