use crate::DeviceDescriptor;
use crate::outlet::OutletDetail;
use serde::Serialize;

/// SNMP 原始值。
///
/// 代理返回的值可能是整数、八位组字符串，或根本不存在。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Integer(i64),
    Text(String),
    Absent,
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// 数值解释：整数直接转换，字符串去空白后解析；非有限值视为无值。
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Integer(v) => *v as f64,
            Self::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>().ok()?
            }
            Self::Absent => return None,
        };
        value.is_finite().then_some(value)
    }

    /// 整数码解释（插座状态码）。带小数的值不是合法状态码。
    pub fn as_code(&self) -> Option<i64> {
        let value = self.as_number()?;
        (value.fract() == 0.0).then_some(value as i64)
    }
}

/// 轮询状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PollStatus {
    Online,
    Offline,
}

impl PollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
        }
    }
}

/// 一组线路读数；不可用的字段为 NaN。
#[derive(Debug, Clone, Copy)]
pub struct Readings {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub energy: f64,
}

impl Readings {
    pub const UNAVAILABLE: Readings = Readings {
        voltage: f64::NAN,
        current: f64::NAN,
        power: f64::NAN,
        energy: f64::NAN,
    };
}

/// 厂商解码器的输出。
///
/// `outlets` 保留厂商原生编码（状态码或 "ON"/"OFF"/"N/A" 字符串），
/// 长度恒等于该型号声明的插座数。
#[derive(Debug, Clone)]
pub struct PollResult {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub ip: String,
    pub status: PollStatus,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub energy: f64,
    pub outlets: Vec<RawValue>,
    pub error: String,
}

impl PollResult {
    pub fn online(device: &DeviceDescriptor, readings: Readings, outlets: Vec<RawValue>) -> Self {
        Self {
            id: device.id,
            name: device.name.clone(),
            brand: device.brand.clone(),
            model: device.model.clone(),
            ip: device.ip.clone(),
            status: PollStatus::Online,
            voltage: readings.voltage,
            current: readings.current,
            power: readings.power,
            energy: readings.energy,
            outlets,
            error: String::new(),
        }
    }

    /// 离线结果：读数全部 NaN，插座填充厂商的“未知”哨兵值。
    pub fn offline(
        device: &DeviceDescriptor,
        outlet_count: usize,
        unknown: RawValue,
        error: impl Into<String>,
    ) -> Self {
        let readings = Readings::UNAVAILABLE;
        Self {
            status: PollStatus::Offline,
            error: error.into(),
            ..Self::online(device, readings, vec![unknown; outlet_count])
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == PollStatus::Online
    }
}

/// 交给写入端的规范化结果。NaN 读数在此处变为 `None`。
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedResult {
    pub status: PollStatus,
    pub voltage: Option<f64>,
    pub current: Option<f64>,
    pub power: Option<f64>,
    pub energy: Option<f64>,
    pub outlet_detail: OutletDetail,
    pub error: String,
    pub polled_at_ms: i64,
}

impl NormalizedResult {
    pub fn is_online(&self) -> bool {
        self.status == PollStatus::Online
    }
}

/// 获取当前时间戳（毫秒）
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
