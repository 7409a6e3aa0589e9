//! 进程内 SNMP 代理（测试与离线演示）。

use crate::error::ProtocolError;
use crate::oid::Oid;
use crate::session::{SnmpConnector, SnmpSession, SnmpTarget, Varbind};
use async_trait::async_trait;
use domain::RawValue;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// 单台设备的 MIB 视图。
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgent {
    values: BTreeMap<Oid, RawValue>,
    max_varbinds: Option<usize>,
    failure: Option<String>,
}

impl InMemoryAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一个值；OID 非法时忽略。
    pub fn with_value(mut self, oid: &str, value: RawValue) -> Self {
        if let Ok(oid) = Oid::parse(oid) {
            self.values.insert(oid, value);
        }
        self
    }

    pub fn with_integer(self, oid: &str, value: i64) -> Self {
        self.with_value(oid, RawValue::Integer(value))
    }

    pub fn with_text(self, oid: &str, value: &str) -> Self {
        self.with_value(oid, RawValue::Text(value.to_string()))
    }

    /// 单次 GET 超过该数量时返回 tooBig。
    pub fn with_max_varbinds(mut self, max: usize) -> Self {
        self.max_varbinds = Some(max);
        self
    }

    /// 所有请求均以超时失败。
    pub fn unreachable(mut self) -> Self {
        self.failure = Some("agent unreachable".to_string());
        self
    }
}

/// 代理收到的一次请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentRequest {
    Get { host: String, oids: Vec<Oid> },
    Walk { host: String, root: Oid },
}

/// 按主机名路由到 [`InMemoryAgent`] 的会话工厂。
#[derive(Debug, Default)]
pub struct InMemoryConnector {
    agents: RwLock<HashMap<String, InMemoryAgent>>,
    requests: Arc<Mutex<Vec<AgentRequest>>>,
    targets: Mutex<Vec<SnmpTarget>>,
    opened: AtomicUsize,
    released: Arc<AtomicUsize>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(self, host: &str, agent: InMemoryAgent) -> Self {
        self.insert(host, agent);
        self
    }

    pub fn insert(&self, host: &str, agent: InMemoryAgent) {
        if let Ok(mut agents) = self.agents.write() {
            agents.insert(host.to_string(), agent);
        }
    }

    /// 已记录的请求（按发生顺序）。
    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    /// 打开会话时使用的目标参数。
    pub fn targets(&self) -> Vec<SnmpTarget> {
        self.targets
            .lock()
            .map(|items| items.clone())
            .unwrap_or_default()
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SnmpConnector for InMemoryConnector {
    async fn open(&self, target: &SnmpTarget) -> Result<Box<dyn SnmpSession>, ProtocolError> {
        if let Ok(mut targets) = self.targets.lock() {
            targets.push(target.clone());
        }
        let agent = self
            .agents
            .read()
            .map_err(|_| ProtocolError::Connection("lock failed".to_string()))?
            .get(&target.host)
            .cloned()
            .ok_or_else(|| ProtocolError::Connection(format!("no route to {}", target.host)))?;
        self.opened.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(InMemorySession {
            host: target.host.clone(),
            agent,
            requests: self.requests.clone(),
            released: self.released.clone(),
            closed: false,
        }))
    }
}

struct InMemorySession {
    host: String,
    agent: InMemoryAgent,
    requests: Arc<Mutex<Vec<AgentRequest>>>,
    released: Arc<AtomicUsize>,
    closed: bool,
}

impl InMemorySession {
    fn record(&self, request: AgentRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            self.released.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.release();
    }
}

#[async_trait]
impl SnmpSession for InMemorySession {
    async fn get(&mut self, oids: &[Oid]) -> Result<Vec<Varbind>, ProtocolError> {
        self.record(AgentRequest::Get {
            host: self.host.clone(),
            oids: oids.to_vec(),
        });
        if let Some(reason) = &self.agent.failure {
            return Err(ProtocolError::Timeout(reason.clone()));
        }
        if let Some(max) = self.agent.max_varbinds
            && oids.len() > max
        {
            return Err(ProtocolError::TooBig(oids.len()));
        }
        Ok(oids
            .iter()
            .map(|oid| {
                let value = self
                    .agent
                    .values
                    .get(oid)
                    .cloned()
                    .unwrap_or(RawValue::Absent);
                (oid.clone(), value)
            })
            .collect())
    }

    async fn walk(&mut self, root: &Oid) -> Result<Vec<Varbind>, ProtocolError> {
        self.record(AgentRequest::Walk {
            host: self.host.clone(),
            root: root.clone(),
        });
        if let Some(reason) = &self.agent.failure {
            return Err(ProtocolError::Timeout(reason.clone()));
        }
        Ok(self
            .agent
            .values
            .range(root.clone()..)
            .take_while(|(oid, _)| oid.starts_with(root))
            .filter(|(oid, _)| *oid != root)
            .map(|(oid, value)| (oid.clone(), value.clone()))
            .collect())
    }

    async fn close(&mut self) {
        self.release();
    }
}
