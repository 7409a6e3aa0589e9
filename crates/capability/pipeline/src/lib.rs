//! # 批量轮询能力模块
//!
//! 一个轮询周期：读取设备清单 → 并发轮询全部设备 → 逐设备规范化 →
//! 逐设备写入。单台设备的轮询或写入失败只影响它自己。
//!
//! - [`BatchPoller`]：一次扇出轮询，返回 [`TickReport`]
//! - [`PollScheduler`]：固定周期、不重叠的轮询调度
//! - [`render_summary`]：每周期的诊断汇总表

mod poller;
mod scheduler;
mod summary;

pub use poller::{BatchPoller, DeviceReport, PollOptions, TickReport};
pub use scheduler::{LatestTick, PollScheduler};
pub use summary::{format_metric, format_outlets, render_summary};

/// Pipeline 处理错误。
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("device source error: {0}")]
    Source(String),
}
