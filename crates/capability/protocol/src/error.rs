//! 协议错误类型定义

/// 协议通信错误
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// 连接错误
    #[error("connection error: {0}")]
    Connection(String),

    /// SNMP 协议错误（编解码、错误状态码）
    #[error("snmp error: {0}")]
    Snmp(String),

    /// 响应过大（tooBig），需要缩小单次请求的 OID 数量
    #[error("response too big for {0} varbinds")]
    TooBig(usize),

    /// OID 解析错误
    #[error("invalid oid: {0}")]
    InvalidOid(String),

    /// 超时错误
    #[error("timeout: {0}")]
    Timeout(String),
}
