//! 基于 snmp2 的 SNMP v2c 实现。
//!
//! snmp2 的异步会话自身不带超时，这里对每次请求包一层
//! `tokio::time::timeout`，超时后按 `retries` 重发。

use crate::error::ProtocolError;
use crate::oid::Oid;
use crate::session::{SnmpConnector, SnmpSession, SnmpTarget, Varbind};
use async_trait::async_trait;
use domain::RawValue;
use snmp2::{AsyncSession, Value};
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// 单次遍历的最大步数，防止设备返回非递增 OID 时死循环。
const MAX_WALK_STEPS: usize = 4096;

/// SNMP v2c 会话工厂（UDP）。
#[derive(Debug)]
pub struct V2cConnector {
    next_request_id: AtomicI32,
}

impl V2cConnector {
    pub fn new() -> Self {
        Self {
            next_request_id: AtomicI32::new(1),
        }
    }

    fn request_id_seed(&self) -> i32 {
        let seed = self.next_request_id.fetch_add(0x1000, Ordering::Relaxed);
        (seed & 0x3fff_ffff).max(1)
    }
}

impl Default for V2cConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnmpConnector for V2cConnector {
    async fn open(&self, target: &SnmpTarget) -> Result<Box<dyn SnmpSession>, ProtocolError> {
        let address = target.address();
        let session = timeout(
            target.timeout,
            AsyncSession::new_v2c(
                address.clone(),
                target.community.as_bytes(),
                self.request_id_seed(),
            ),
        )
        .await
        .map_err(|_| ProtocolError::Timeout(format!("open {address}")))?
        .map_err(|err| ProtocolError::Connection(format!("{address}: {err}")))?;

        Ok(Box::new(V2cSession {
            inner: Some(session),
            address,
            timeout: target.timeout,
            attempts: target.retries.saturating_add(1),
        }))
    }
}

struct V2cSession {
    inner: Option<AsyncSession>,
    address: String,
    timeout: Duration,
    attempts: u32,
}

impl V2cSession {
    fn session(&mut self) -> Result<&mut AsyncSession, ProtocolError> {
        self.inner
            .as_mut()
            .ok_or_else(|| ProtocolError::Connection("session closed".to_string()))
    }

    /// 单次 GETNEXT；到达 MIB 末尾返回 `None`。
    async fn get_next(&mut self, oid: &Oid) -> Result<Option<Varbind>, ProtocolError> {
        let wire = to_wire(oid)?;
        let attempts = self.attempts;
        let limit = self.timeout;
        let address = self.address.clone();
        let session = self.session()?;
        for attempt in 1..=attempts {
            match timeout(limit, session.getnext(&wire)).await {
                Ok(Ok(pdu)) => {
                    check_status(pdu.error_status, 1)?;
                    let mut varbinds = pdu.varbinds;
                    return match varbinds.next() {
                        Some((_, Value::EndOfMibView)) | None => Ok(None),
                        Some((name, value)) => Ok(Some((from_wire(&name)?, to_raw(&value)))),
                    };
                }
                Ok(Err(err)) => return Err(ProtocolError::Snmp(format!("{err:?}"))),
                Err(_) => {
                    debug!(target: "pdu.snmp", address = %address, attempt, "snmp_getnext_timeout");
                }
            }
        }
        Err(ProtocolError::Timeout(format!("getnext {address}")))
    }
}

#[async_trait]
impl SnmpSession for V2cSession {
    async fn get(&mut self, oids: &[Oid]) -> Result<Vec<Varbind>, ProtocolError> {
        if oids.is_empty() {
            return Ok(Vec::new());
        }
        let wire = oids.iter().map(to_wire).collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&snmp2::Oid<'static>> = wire.iter().collect();
        let attempts = self.attempts;
        let limit = self.timeout;
        let address = self.address.clone();
        let session = self.session()?;
        for attempt in 1..=attempts {
            match timeout(limit, session.get_many(&refs)).await {
                Ok(Ok(pdu)) => {
                    check_status(pdu.error_status, oids.len())?;
                    let mut out = Vec::with_capacity(oids.len());
                    for (name, value) in pdu.varbinds {
                        out.push((from_wire(&name)?, to_raw(&value)));
                    }
                    return Ok(out);
                }
                Ok(Err(err)) => return Err(ProtocolError::Snmp(format!("{err:?}"))),
                Err(_) => {
                    debug!(target: "pdu.snmp", address = %address, attempt, "snmp_get_timeout");
                }
            }
        }
        Err(ProtocolError::Timeout(format!("get {address}")))
    }

    async fn walk(&mut self, root: &Oid) -> Result<Vec<Varbind>, ProtocolError> {
        let mut out = Vec::new();
        let mut cursor = root.clone();
        loop {
            if out.len() >= MAX_WALK_STEPS {
                warn!(target: "pdu.snmp", address = %self.address, root = %root, "snmp_walk_truncated");
                break;
            }
            let Some((oid, value)) = self.get_next(&cursor).await? else {
                break;
            };
            if !oid.starts_with(root) || oid <= cursor {
                break;
            }
            cursor = oid.clone();
            out.push((oid, value));
        }
        Ok(out)
    }

    async fn close(&mut self) {
        self.inner.take();
    }
}

fn check_status(error_status: u32, varbinds: usize) -> Result<(), ProtocolError> {
    match error_status {
        0 => Ok(()),
        1 => Err(ProtocolError::TooBig(varbinds)),
        other => Err(ProtocolError::Snmp(format!("error status {other}"))),
    }
}

fn to_wire(oid: &Oid) -> Result<snmp2::Oid<'static>, ProtocolError> {
    snmp2::Oid::from(oid.arcs()).map_err(|_| ProtocolError::InvalidOid(oid.to_string()))
}

fn from_wire(oid: &snmp2::Oid<'_>) -> Result<Oid, ProtocolError> {
    Oid::parse(&oid.to_id_string())
}

fn to_raw(value: &Value<'_>) -> RawValue {
    match value {
        Value::Integer(v) => RawValue::Integer(*v),
        Value::Counter32(v) | Value::Unsigned32(v) | Value::Timeticks(v) => {
            RawValue::Integer(i64::from(*v))
        }
        Value::Counter64(v) => match i64::try_from(*v) {
            Ok(v) => RawValue::Integer(v),
            Err(_) => RawValue::Text(v.to_string()),
        },
        Value::OctetString(bytes) => RawValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        _ => RawValue::Absent,
    }
}
