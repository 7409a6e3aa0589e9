//! # PDU Storage 模块
//!
//! 轮询核心的两条外部边界：
//!
//! 1. **设备来源** ([`DeviceSource`])：每个轮询周期刷新一次的设备清单
//! 2. **结果写入** ([`ResultSink`])：每台设备每周期调用一次
//!
//! ## 写入语义
//!
//! - 始终更新设备状态；`last_seen` 仅在 ONLINE 时推进
//! - OFFLINE：关闭活动中的使用时段后返回，不覆盖当前/历史读数
//! - ONLINE：更新当前读数 → 追加历史 → 更新各插座当前/历史状态 → 使用时段状态迁移
//!
//! ## 实现
//!
//! - [`in_memory`]：`RwLock` 内存实现（测试与无数据库运行）
//! - [`postgres`]：PostgreSQL 实现（`pdu_devices`、`pdu_status_*`、`pdu_outlet*`、`pdu_usage_sessions`）
//! - [`file`]：JSON 文件设备清单

pub mod connection;
pub mod error;
pub mod file;
pub mod in_memory;
pub mod models;
pub mod postgres;
pub mod traits;
pub mod usage;

pub use connection::*;
pub use error::*;
pub use file::JsonFileDeviceSource;
pub use in_memory::{InMemoryDeviceSource, InMemoryResultStore};
pub use models::*;
pub use postgres::{PgDeviceSource, PgResultStore};
pub use traits::*;
pub use usage::{UsageTransition, plan_usage_transition};
