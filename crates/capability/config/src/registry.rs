//! OID 注册表与厂商词汇表。
//!
//! 所有厂商 OID、默认会话参数、型号/品牌匹配词汇与对账阈值集中在此，
//! 可通过 JSON 文件局部覆盖（未出现的字段保持内置默认值）。

use crate::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;

/// 单个厂商的默认 SNMP 会话参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub timeout_ms: u64,
    pub retries: u32,
}

impl SessionDefaults {
    pub const fn new(timeout_ms: u64, retries: u32) -> Self {
        Self {
            timeout_ms,
            retries,
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self::new(10_000, 1)
    }
}

/// ATEN：子树遍历后按后缀取值。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AtenOids {
    pub root: String,
    pub current_suffix: String,
    pub voltage_suffix: String,
    pub power_suffix: String,
    pub energy_suffix: String,
    /// 插座状态前缀（相对 root），端口号追加在末尾。
    pub outlet_status_prefix: String,
    pub session: SessionDefaults,
}

impl Default for AtenOids {
    fn default() -> Self {
        Self {
            root: "1.3.6.1.4.1.21317.1.3.2.2.2.1".to_string(),
            current_suffix: "3.1.2.1".to_string(),
            voltage_suffix: "3.1.3.1".to_string(),
            power_suffix: "3.1.4.1".to_string(),
            energy_suffix: "3.1.5.1".to_string(),
            outlet_status_prefix: "5.1.2".to_string(),
            session: SessionDefaults::new(10_000, 1),
        }
    }
}

/// APC：遍历 rPDU 子树，电流两级回退。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApcOids {
    pub root: String,
    pub current_primary_suffix: String,
    /// 次级电流 OID（完整路径，不在 root 之下）。
    pub current_secondary: String,
    /// 原始电流读数为 1/10 A。
    pub current_divisor: f64,
    /// 设备未配置 voltage_override 时使用的名义电压。
    pub default_voltage: f64,
    pub outlet_status_prefix: String,
    pub session: SessionDefaults,
}

impl Default for ApcOids {
    fn default() -> Self {
        Self {
            root: "1.3.6.1.4.1.318.1.1.12".to_string(),
            current_primary_suffix: "2.3.1.1.2.1".to_string(),
            current_secondary: "1.3.6.1.4.1.318.1.1.26.6.3.1.5.1".to_string(),
            current_divisor: 10.0,
            default_voltage: 220.0,
            outlet_status_prefix: "3.3.1.1.4".to_string(),
            session: SessionDefaults::new(10_000, 1),
        }
    }
}

/// CyberPower：固定 OID 分批 GET。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CyberPowerOids {
    pub voltage: String,
    pub current: String,
    pub power: String,
    pub energy: String,
    pub outlet_power_base: String,
    pub outlet_status_base: String,
    pub outlet_fallback_status_base: String,
    pub batch_size: usize,
    pub session: SessionDefaults,
}

impl Default for CyberPowerOids {
    fn default() -> Self {
        Self {
            voltage: "1.3.6.1.4.1.3808.1.1.3.2.3.1.1.6.1".to_string(),
            current: "1.3.6.1.4.1.3808.1.1.3.2.3.1.1.7.1".to_string(),
            power: "1.3.6.1.4.1.3808.1.1.3.2.3.1.1.8.1".to_string(),
            energy: "1.3.6.1.4.1.3808.1.1.3.2.3.1.1.10.1".to_string(),
            outlet_power_base: "1.3.6.1.4.1.3808.1.1.3.3.5.1.1.8".to_string(),
            outlet_status_base: "1.3.6.1.4.1.3808.1.1.3.3.3.1.1.4".to_string(),
            outlet_fallback_status_base: "1.3.6.1.4.1.3808.1.1.3.3.4.1.1.4".to_string(),
            batch_size: 4,
            session: SessionDefaults::new(10_000, 1),
        }
    }
}

/// 十二口机型（RMCARD205）读数比例。
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct BawornScale {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub energy: f64,
}

impl Default for BawornScale {
    fn default() -> Self {
        Self {
            voltage: 0.1,
            current: 0.1,
            power: 1.0,
            energy: 0.01,
        }
    }
}

/// 十二口机型（RMCARD205）OID 映射。
///
/// voltage 或 outlet_base 为空时解码器直接返回 OFFLINE。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BawornOids {
    pub voltage: String,
    pub current: String,
    pub power: String,
    /// 未配置时电能为 NaN。
    pub energy: Option<String>,
    pub outlet_base: String,
    pub scale: BawornScale,
    pub batch_size: usize,
    pub session: SessionDefaults,
}

impl BawornOids {
    pub fn is_configured(&self) -> bool {
        !self.voltage.trim().is_empty() && !self.outlet_base.trim().is_empty()
    }
}

impl Default for BawornOids {
    fn default() -> Self {
        Self {
            voltage: "1.3.6.1.4.1.3808.1.1.1.3.2.1.0".to_string(),
            current: "1.3.6.1.4.1.3808.1.1.1.4.2.4.0".to_string(),
            power: "1.3.6.1.4.1.3808.1.1.1.4.2.5.0".to_string(),
            energy: None,
            outlet_base: "1.3.6.1.4.1.3808.1.1.3.3.3.1.1.4".to_string(),
            scale: BawornScale::default(),
            batch_size: 6,
            session: SessionDefaults::new(5_000, 1),
        }
    }
}

/// 可识别的厂商品牌。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorBrand {
    Aten,
    CyberPower,
    Apc,
}

/// 品牌/型号匹配词汇与端口数。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VendorVocabulary {
    pub aten_brand: String,
    pub cyberpower_brand: String,
    pub apc_brand: String,
    pub twelve_port_model: String,
    /// 名称或品牌中包含该词时视为十二口设备。
    pub twelve_port_name_hint: String,
    pub default_outlet_count: usize,
    pub twelve_port_outlet_count: usize,
    /// 按型号（大写）覆盖端口数。
    pub model_outlet_counts: HashMap<String, usize>,
}

impl Default for VendorVocabulary {
    fn default() -> Self {
        Self {
            aten_brand: "ATEN".to_string(),
            cyberpower_brand: "CYBERPOWER".to_string(),
            apc_brand: "APC".to_string(),
            twelve_port_model: "RMCARD205".to_string(),
            twelve_port_name_hint: "BAWORN".to_string(),
            default_outlet_count: 8,
            twelve_port_outlet_count: 12,
            model_outlet_counts: HashMap::new(),
        }
    }
}

impl VendorVocabulary {
    /// 型号是否属于十二口机型（大小写不敏感）。
    pub fn is_twelve_port_model(&self, model: &str) -> bool {
        model.trim().eq_ignore_ascii_case(self.twelve_port_model.trim())
    }

    /// 按品牌词汇识别厂商（大小写不敏感）。
    pub fn brand_of(&self, brand: &str) -> Option<VendorBrand> {
        let brand = brand.trim();
        if brand.eq_ignore_ascii_case(&self.aten_brand) {
            Some(VendorBrand::Aten)
        } else if brand.eq_ignore_ascii_case(&self.cyberpower_brand) {
            Some(VendorBrand::CyberPower)
        } else if brand.eq_ignore_ascii_case(&self.apc_brand) {
            Some(VendorBrand::Apc)
        } else {
            None
        }
    }

    /// 设备预期端口数：十二口型号 > 型号覆盖 > 名称/品牌提示 > 默认值。
    pub fn outlet_count(&self, brand: &str, model: &str, name: &str) -> usize {
        if self.is_twelve_port_model(model) {
            return self.twelve_port_outlet_count;
        }
        let model_key = model.trim().to_uppercase();
        if let Some(count) = self.model_outlet_counts.get(&model_key) {
            return *count;
        }
        let hint = self.twelve_port_name_hint.trim().to_uppercase();
        if !hint.is_empty()
            && (name.to_uppercase().contains(&hint) || brand.to_uppercase().contains(&hint))
        {
            return self.twelve_port_outlet_count;
        }
        self.default_outlet_count
    }
}

/// 读数对账阈值。
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// 小于该值的功率/电流视为 0。
    pub zero_epsilon: f64,
    /// CyberPower 插座功率合计与线路功率的相对偏差上限。
    pub cyberpower_power_mismatch: f64,
    /// 十二口机型 V·I 与功率读数的相对偏差上限。
    pub baworn_power_mismatch: f64,
    /// 电流读数低于 P/V 的该比例时判定电流不可信。
    pub baworn_low_current_ratio: f64,
    /// 低电流判定仅在 P/V 大于该值（A）时生效。
    pub baworn_low_current_floor_amps: f64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            zero_epsilon: 1e-6,
            cyberpower_power_mismatch: 0.20,
            baworn_power_mismatch: 0.30,
            baworn_low_current_ratio: 0.5,
            baworn_low_current_floor_amps: 0.2,
        }
    }
}

/// OID 注册表（全部厂商）。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OidRegistry {
    pub aten: AtenOids,
    pub apc: ApcOids,
    pub cyberpower: CyberPowerOids,
    pub baworn: BawornOids,
    pub vocabulary: VendorVocabulary,
    pub reconciliation: ReconciliationConfig,
}

impl OidRegistry {
    /// 从 JSON 文本解析，缺省字段沿用内置默认值。
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let registry: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Registry(err.to_string()))?;
        registry.validate()?;
        Ok(registry)
    }

    /// 从 JSON 文件加载。
    pub fn from_json_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Registry(format!("{path}: {err}")))?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cyberpower.batch_size == 0 {
            return Err(ConfigError::Registry(
                "cyberpower.batch_size must be > 0".to_string(),
            ));
        }
        if self.baworn.batch_size == 0 {
            return Err(ConfigError::Registry(
                "baworn.batch_size must be > 0".to_string(),
            ));
        }
        if self.apc.current_divisor == 0.0 {
            return Err(ConfigError::Registry(
                "apc.current_divisor must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outlet_count_follows_model_then_hint() {
        let vocab = VendorVocabulary::default();
        assert_eq!(vocab.outlet_count("ATEN", "PE8108", "rack-a"), 8);
        assert_eq!(vocab.outlet_count("", "rmcard205", "rack-b"), 12);
        assert_eq!(vocab.outlet_count("OTHER", "X", "Baworn-row3"), 12);
    }

    #[test]
    fn model_override_takes_precedence_over_default() {
        let mut vocab = VendorVocabulary::default();
        vocab.model_outlet_counts.insert("PDU81004".to_string(), 24);
        assert_eq!(vocab.outlet_count("CYBERPOWER", "pdu81004", "x"), 24);
    }

    #[test]
    fn brand_match_is_case_insensitive() {
        let vocab = VendorVocabulary::default();
        assert_eq!(vocab.brand_of("CyberPower"), Some(VendorBrand::CyberPower));
        assert_eq!(vocab.brand_of(" apc "), Some(VendorBrand::Apc));
        assert_eq!(vocab.brand_of("Eaton"), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let registry = OidRegistry::from_json(
            r#"{"baworn":{"energy":"1.3.6.1.4.1.99.1.0","batch_size":3},"reconciliation":{"zero_epsilon":0.001}}"#,
        )
        .expect("registry");
        assert_eq!(registry.baworn.batch_size, 3);
        assert_eq!(registry.baworn.energy.as_deref(), Some("1.3.6.1.4.1.99.1.0"));
        assert_eq!(registry.baworn.session.timeout_ms, 5_000);
        assert_eq!(registry.reconciliation.zero_epsilon, 0.001);
        assert_eq!(registry.reconciliation.cyberpower_power_mismatch, 0.20);
        assert_eq!(registry.aten.root, "1.3.6.1.4.1.21317.1.3.2.2.2.1");
    }

    #[test]
    fn zero_batch_is_rejected() {
        let err = OidRegistry::from_json(r#"{"cyberpower":{"batch_size":0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Registry(_)));
    }

    #[test]
    fn empty_baworn_map_is_not_configured() {
        let registry =
            OidRegistry::from_json(r#"{"baworn":{"voltage":""}}"#).expect("registry");
        assert!(!registry.baworn.is_configured());
    }
}
