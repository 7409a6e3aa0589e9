use domain::{OutletState, RawValue};
use pdu_config::{VendorBrand, VendorVocabulary};

/// 厂商插座状态码表（编码/解码成对）。
///
/// 解码器用它把原始状态码转成厂商原生表示，规范化器用同一张表把
/// 原生表示（状态码或 "ON"/"OFF" 字符串）还原成 [`OutletState`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutletCodec {
    /// 2=ON，1/0=OFF；原生表示为 "ON"/"OFF"/"N/A"。
    Aten,
    /// 1=ON，2=OFF；原生表示为 "ON"/"OFF"/"N/A"。
    Apc,
    /// 主状态表：1=ON，2=OFF。
    CyberPower,
    /// 备用状态表：1/3=ON，0/2=OFF（主表的超集）。
    CyberPowerFallback,
    /// 十二口机型：1=ON，2=OFF；原生表示为状态码，不可读时视为 OFF。
    TwelvePort,
}

impl OutletCodec {
    /// 按设备选择规范化用的码表；型号优先于品牌。
    pub fn for_device(brand: &str, model: &str, vocabulary: &VendorVocabulary) -> Option<Self> {
        if vocabulary.is_twelve_port_model(model) {
            return Some(Self::TwelvePort);
        }
        match vocabulary.brand_of(brand)? {
            VendorBrand::Aten => Some(Self::Aten),
            VendorBrand::Apc => Some(Self::Apc),
            VendorBrand::CyberPower => Some(Self::CyberPowerFallback),
        }
    }

    pub fn decode(self, code: i64) -> Option<OutletState> {
        match (self, code) {
            (Self::Aten, 2) => Some(OutletState::On),
            (Self::Aten, 0 | 1) => Some(OutletState::Off),
            (Self::Apc | Self::CyberPower | Self::TwelvePort, 1) => Some(OutletState::On),
            (Self::Apc | Self::CyberPower | Self::TwelvePort, 2) => Some(OutletState::Off),
            (Self::CyberPowerFallback, 1 | 3) => Some(OutletState::On),
            (Self::CyberPowerFallback, 0 | 2) => Some(OutletState::Off),
            _ => None,
        }
    }

    /// 状态 → 厂商原生表示。
    pub fn encode(self, state: Option<OutletState>) -> RawValue {
        match self {
            Self::TwelvePort => match state {
                Some(OutletState::On) => RawValue::Integer(1),
                Some(OutletState::Off) => RawValue::Integer(2),
                None => RawValue::Absent,
            },
            _ => RawValue::text(symbol(state)),
        }
    }

    /// 该厂商的“未知”哨兵值。
    pub fn unknown(self) -> RawValue {
        self.encode(None)
    }

    /// 原始状态码 → 原生表示。
    pub fn encode_raw(self, raw: &RawValue) -> RawValue {
        self.encode(raw.as_code().and_then(|code| self.decode(code)))
    }

    /// 不可读时的兜底状态。
    pub fn unreadable(self) -> Option<OutletState> {
        match self {
            Self::TwelvePort => Some(OutletState::Off),
            _ => None,
        }
    }

    /// 同时接受状态码与 "ON"/"OFF" 字符串。
    pub fn resolve(self, raw: &RawValue) -> Option<OutletState> {
        if let Some(state) = parse_symbol(raw) {
            return Some(state);
        }
        raw.as_code().and_then(|code| self.decode(code))
    }
}

fn symbol(state: Option<OutletState>) -> &'static str {
    match state {
        Some(state) => state.as_str(),
        None => "N/A",
    }
}

/// 解析符号形式（"ON"/"OFF"，大小写与空白不敏感）。
pub(crate) fn parse_symbol(raw: &RawValue) -> Option<OutletState> {
    let RawValue::Text(text) = raw else {
        return None;
    };
    let text = text.trim();
    if text.eq_ignore_ascii_case("ON") {
        Some(OutletState::On)
    } else if text.eq_ignore_ascii_case("OFF") {
        Some(OutletState::Off)
    } else {
        None
    }
}
