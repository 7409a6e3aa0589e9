//! 存储接口 Trait 定义
//!
//! - DeviceSource：设备清单来源
//! - ResultSink：轮询结果写入
//!
//! 设计原则：
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发
//! - 每次写入只涉及一台设备，实现需允许不同设备的并发写入

use crate::error::StorageError;
use async_trait::async_trait;
use domain::{DeviceDescriptor, NormalizedResult};

/// 设备来源接口
#[async_trait]
pub trait DeviceSource: Send + Sync {
    /// 按 id 升序返回当前启用的设备
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, StorageError>;
}

/// 结果写入接口
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// 写入一台设备的规范化结果（以 `device.id` 为关联键）
    async fn write(
        &self,
        device: &DeviceDescriptor,
        result: &NormalizedResult,
    ) -> Result<(), StorageError>;
}
