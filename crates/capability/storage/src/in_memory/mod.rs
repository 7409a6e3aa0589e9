//! 内存存储实现模块
//!
//! 用于测试与无数据库运行。
//!
//! 包含以下实现：
//! - DeviceSource: InMemoryDeviceSource
//! - ResultSink: InMemoryResultStore

pub mod device_source;
pub mod result_store;

pub use device_source::*;
pub use result_store::*;
