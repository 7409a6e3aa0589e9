//! # 协议通信能力模块
//!
//! 提供 SNMP v2c 采集能力：
//! - **Oid**：数字点分 OID 的解析、拼接与前缀判断
//! - **SnmpSession / SnmpConnector**：会话接口（多 OID GET、子树遍历、释放）
//! - **V2cConnector**：基于 snmp2 的 UDP 实现（超时 + 重试）
//! - **InMemoryConnector**：进程内代理，供测试与离线演示使用
//!
//! ## 调用关系
//!
//! ```text
//! DeviceDescriptor
//!       │
//!       ▼
//! SnmpTarget (host/port/community/timeout/retries)
//!       │
//!       ▼
//! SnmpConnector::open ──► SnmpSession
//!                             ├── get(&[Oid])          单次请求
//!                             ├── get_batched(.., n)   分批请求
//!                             ├── walk(&Oid)           GETNEXT 遍历
//!                             └── close()
//! ```

mod error;
mod memory;
mod oid;
mod session;
mod v2c;

pub use error::ProtocolError;
pub use memory::{AgentRequest, InMemoryAgent, InMemoryConnector};
pub use oid::Oid;
pub use session::{SnmpConnector, SnmpSession, SnmpTarget, Varbind, get_batched};
pub use v2c::V2cConnector;
