//! 轮询结果内存实现。

use crate::error::StorageError;
use crate::models::{DeviceStatusRecord, OutletStatusRecord, StatusReadingRecord};
use crate::traits::ResultSink;
use crate::usage::{UsageTransition, plan_usage_transition};
use domain::{DeviceDescriptor, NormalizedResult, UsageSession};
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

/// 每台设备保留的历史读数 / 已关闭时段条数上限。
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

#[derive(Default)]
struct State {
    devices: HashMap<i64, DeviceStatusRecord>,
    current: HashMap<i64, StatusReadingRecord>,
    history: HashMap<i64, VecDeque<StatusReadingRecord>>,
    outlets: HashMap<(i64, usize), OutletStatusRecord>,
    outlet_history: HashMap<i64, VecDeque<OutletStatusRecord>>,
    sessions: HashMap<i64, VecDeque<UsageSession>>,
}

/// 无数据库时的结果写入端。历史按设备保留最近 `history_limit` 条，
/// 插座历史按 `history_limit` 轮计。
pub struct InMemoryResultStore {
    usage_threshold: f64,
    history_limit: usize,
    state: RwLock<State>,
}

impl InMemoryResultStore {
    pub fn new(usage_threshold: f64) -> Self {
        Self::with_history_limit(usage_threshold, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(usage_threshold: f64, history_limit: usize) -> Self {
        Self {
            usage_threshold,
            history_limit: history_limit.max(1),
            state: RwLock::new(State::default()),
        }
    }

    pub fn device_status(&self, device_id: i64) -> Result<Option<DeviceStatusRecord>, StorageError> {
        let state = self.read()?;
        Ok(state.devices.get(&device_id).cloned())
    }

    pub fn current_status(
        &self,
        device_id: i64,
    ) -> Result<Option<StatusReadingRecord>, StorageError> {
        let state = self.read()?;
        Ok(state.current.get(&device_id).cloned())
    }

    pub fn history(&self, device_id: i64) -> Result<Vec<StatusReadingRecord>, StorageError> {
        let state = self.read()?;
        Ok(state
            .history
            .get(&device_id)
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// 按插座号升序返回当前插座状态。
    pub fn outlets(&self, device_id: i64) -> Result<Vec<OutletStatusRecord>, StorageError> {
        let state = self.read()?;
        let mut items: Vec<OutletStatusRecord> = state
            .outlets
            .values()
            .filter(|item| item.device_id == device_id)
            .cloned()
            .collect();
        items.sort_by_key(|item| item.outlet_no);
        Ok(items)
    }

    pub fn outlet_history_len(&self, device_id: i64) -> Result<usize, StorageError> {
        let state = self.read()?;
        Ok(state
            .outlet_history
            .get(&device_id)
            .map(VecDeque::len)
            .unwrap_or_default())
    }

    /// 按开启时间顺序返回该设备保留的使用时段。
    pub fn usage_sessions(&self, device_id: i64) -> Result<Vec<UsageSession>, StorageError> {
        let state = self.read()?;
        Ok(state
            .sessions
            .get(&device_id)
            .map(|items| items.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, StorageError> {
        self.state
            .read()
            .map_err(|_| StorageError::new("lock failed"))
    }
}

/// 追加一条记录，超出上限时丢弃最旧的。
fn push_bounded<T>(items: &mut VecDeque<T>, item: T, limit: usize) {
    items.push_back(item);
    while items.len() > limit {
        items.pop_front();
    }
}

fn apply_usage(
    sessions: &mut VecDeque<UsageSession>,
    device_id: i64,
    current: Option<f64>,
    threshold: f64,
    ts_ms: i64,
    limit: usize,
) {
    // 活动时段至多一个且总是最新一条，裁剪只会丢弃已关闭的时段。
    let has_active = sessions.back().is_some_and(|item| item.is_active);
    match plan_usage_transition(has_active, current, threshold) {
        UsageTransition::Open { current } => {
            push_bounded(sessions, UsageSession::open(device_id, ts_ms, current), limit);
        }
        UsageTransition::Refresh { current } => {
            if let Some(session) = sessions.back_mut() {
                session.last_current = Some(current);
                session.updated_at_ms = ts_ms;
            }
        }
        UsageTransition::Close { current } => {
            if let Some(session) = sessions.back_mut() {
                session.close(ts_ms, current);
            }
        }
        UsageTransition::Idle => {}
    }
}

#[async_trait::async_trait]
impl ResultSink for InMemoryResultStore {
    async fn write(
        &self,
        device: &DeviceDescriptor,
        result: &NormalizedResult,
    ) -> Result<(), StorageError> {
        let ts_ms = result.polled_at_ms;
        let mut state = self
            .state
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;

        let last_seen_at_ms = if result.is_online() {
            Some(ts_ms)
        } else {
            state
                .devices
                .get(&device.id)
                .and_then(|item| item.last_seen_at_ms)
        };
        state.devices.insert(
            device.id,
            DeviceStatusRecord {
                device_id: device.id,
                status: result.status,
                last_seen_at_ms,
                updated_at_ms: ts_ms,
            },
        );

        let limit = self.history_limit;
        if !result.is_online() {
            apply_usage(
                state.sessions.entry(device.id).or_default(),
                device.id,
                Some(0.0),
                self.usage_threshold,
                ts_ms,
                limit,
            );
            return Ok(());
        }

        let reading = StatusReadingRecord {
            device_id: device.id,
            voltage: result.voltage,
            current: result.current,
            power: result.power,
            energy: result.energy,
            polled_at_ms: ts_ms,
        };
        state.current.insert(device.id, reading.clone());
        push_bounded(state.history.entry(device.id).or_default(), reading, limit);

        let outlet_limit = limit.saturating_mul(result.outlet_detail.len().max(1));

        for (outlet_no, status) in result.outlet_detail.iter() {
            let name = state
                .outlets
                .get(&(device.id, outlet_no))
                .map(|item| item.name.clone())
                .unwrap_or_else(|| OutletStatusRecord::default_name(outlet_no));
            let record = OutletStatusRecord {
                device_id: device.id,
                outlet_no,
                name,
                status,
                polled_at_ms: ts_ms,
            };
            state.outlets.insert((device.id, outlet_no), record.clone());
            push_bounded(
                state.outlet_history.entry(device.id).or_default(),
                record,
                outlet_limit,
            );
        }

        apply_usage(
            state.sessions.entry(device.id).or_default(),
            device.id,
            result.current,
            self.usage_threshold,
            ts_ms,
            limit,
        );
        Ok(())
    }
}
