//! SNMP 会话接口。

use crate::error::ProtocolError;
use crate::oid::Oid;
use async_trait::async_trait;
use domain::RawValue;
use std::collections::HashMap;
use std::time::Duration;

/// 单个变量绑定（OID → 值）。
pub type Varbind = (Oid, RawValue);

/// 会话目标参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnmpTarget {
    pub host: String,
    pub port: u16,
    pub community: String,
    /// 单次请求超时。
    pub timeout: Duration,
    /// 超时后的重试次数（总尝试次数 = retries + 1）。
    pub retries: u32,
}

impl SnmpTarget {
    /// `host:port` 形式地址（IPv6 自动加方括号）。
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// 已打开的 SNMP 会话。
///
/// 未应答的 OID（noSuchObject / noSuchInstance / endOfMibView）以 `RawValue::Absent` 返回。
#[async_trait]
pub trait SnmpSession: Send {
    /// 单次多 OID GET，结果与请求顺序一致。
    async fn get(&mut self, oids: &[Oid]) -> Result<Vec<Varbind>, ProtocolError>;

    /// GETNEXT 遍历 `root` 子树，按 OID 升序返回。
    async fn walk(&mut self, root: &Oid) -> Result<Vec<Varbind>, ProtocolError>;

    /// 释放会话（幂等）。
    async fn close(&mut self);
}

/// 会话工厂。
#[async_trait]
pub trait SnmpConnector: Send + Sync {
    async fn open(&self, target: &SnmpTarget) -> Result<Box<dyn SnmpSession>, ProtocolError>;
}

/// 按 `batch_size` 分批 GET，合并为 OID → 值映射。
///
/// 任一批次失败即返回错误。
pub async fn get_batched(
    session: &mut dyn SnmpSession,
    oids: &[Oid],
    batch_size: usize,
) -> Result<HashMap<Oid, RawValue>, ProtocolError> {
    let batch_size = batch_size.max(1);
    let mut merged = HashMap::with_capacity(oids.len());
    for chunk in oids.chunks(batch_size) {
        for (oid, value) in session.get(chunk).await? {
            merged.insert(oid, value);
        }
    }
    Ok(merged)
}
