pub mod data;
pub mod outlet;
pub mod usage;

pub use data::{NormalizedResult, PollResult, PollStatus, RawValue, Readings, now_epoch_ms};
pub use outlet::{OutletDetail, OutletState};
pub use usage::UsageSession;

use serde::{Deserialize, Serialize};

/// 设备描述：由外部配置或数据库提供，单次轮询期间不可变。
///
/// `id` 是所有下游写入的关联键。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(alias = "ip_address", alias = "host")]
    pub ip: String,
    #[serde(default, alias = "community")]
    pub snmp_community: String,
    #[serde(default = "default_snmp_version")]
    pub snmp_version: String,
    #[serde(default)]
    pub snmp_port: Option<u16>,
    #[serde(default)]
    pub snmp_timeout_ms: Option<u64>,
    #[serde(default)]
    pub snmp_retries: Option<u32>,
    /// 设备级电压覆盖（无电压 OID 的机型用于估算功率）。
    #[serde(default)]
    pub voltage_override: Option<f64>,
}

fn default_snmp_version() -> String {
    "2c".to_string()
}

impl DeviceDescriptor {
    /// 品牌归一化（去空白、大写）。
    pub fn brand_key(&self) -> String {
        self.brand.trim().to_ascii_uppercase()
    }
}
