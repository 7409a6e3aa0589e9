//! 插座状态规范化能力。
//!
//! 把解码器输出的厂商原生插座数组转换成 `Port1..PortN -> ON | OFF | null`。

mod codec;

pub use codec::OutletCodec;

use domain::{NormalizedResult, OutletDetail, PollResult, RawValue, now_epoch_ms};
use pdu_config::VendorVocabulary;

/// 插座规范化器。
#[derive(Debug, Clone, Default)]
pub struct OutletNormalizer {
    vocabulary: VendorVocabulary,
}

impl OutletNormalizer {
    pub fn new(vocabulary: VendorVocabulary) -> Self {
        Self { vocabulary }
    }

    /// 逐端口解析；超出数组长度的端口按不可读处理。
    pub fn normalize(
        &self,
        outlets: &[RawValue],
        brand: &str,
        model: &str,
        outlet_count: usize,
    ) -> OutletDetail {
        let codec = OutletCodec::for_device(brand, model, &self.vocabulary);
        let ports = (0..outlet_count)
            .map(|index| {
                let raw = outlets.get(index).unwrap_or(&RawValue::Absent);
                match codec {
                    Some(codec) => codec.resolve(raw).or(codec.unreadable()),
                    None => codec::parse_symbol(raw),
                }
            })
            .collect();
        OutletDetail::new(ports)
    }

    /// PollResult → 写入端接受的规范化结果（NaN 变为 `None`）。
    pub fn normalize_result(&self, result: &PollResult) -> NormalizedResult {
        let outlet_count = self
            .vocabulary
            .outlet_count(&result.brand, &result.model, &result.name);
        NormalizedResult {
            status: result.status,
            voltage: finite(result.voltage),
            current: finite(result.current),
            power: finite(result.power),
            energy: finite(result.energy),
            outlet_detail: self.normalize(
                &result.outlets,
                &result.brand,
                &result.model,
                outlet_count,
            ),
            error: result.error.clone(),
            polled_at_ms: now_epoch_ms(),
        }
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
