//! # PostgreSQL 存储实现模块
//!
//! 生产环境的设备来源与结果写入。
//!
//! ## 设计原则
//!
//! 1. **参数化查询**：所有 SQL 使用参数绑定
//! 2. **单设备事务**：一次 `write` 内的全部语句在同一事务中提交，
//!    不同设备的写入互不影响
//! 3. **时间戳**：毫秒时间戳以 `to_timestamp($n / 1000.0)` 绑定
//!
//! ## 数据库模式要求
//!
//! - `pdu_devices`：(id, name, brand, model, ip_address inet, snmp_version, snmp_port,
//!   snmp_community, snmp_timeout_ms, snmp_retries, is_active, status, last_seen)
//! - `pdu_status_current`：(pdu_id unique, voltage, current, power, energy, updated_at)
//! - `pdu_status_history`：(pdu_id, voltage, current, power, energy, polled_at)
//! - `pdu_outlets`：(id, pdu_id, outlet_no, name)，唯一键 (pdu_id, outlet_no)
//! - `pdu_outlet_status_current`：(outlet_id unique, status, updated_at)
//! - `pdu_outlet_status_history`：(outlet_id, status, polled_at)
//! - `pdu_usage_sessions`：(id, pdu_id, started_at, ended_at, duration_seconds,
//!   is_active, last_current, created_at, updated_at)

pub mod device_source;
pub mod result_store;

pub use device_source::*;
pub use result_store::*;
