//! 使用时段状态迁移。
//!
//! 写入端在每次结果写入后调用：电流不低于阈值时开启或续期，
//! 低于阈值（含 NaN 与离线）时关闭活动时段。

/// 一次写入应执行的时段操作。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UsageTransition {
    /// 无活动时段且正在使用：开启新时段。
    Open { current: f64 },
    /// 已有活动时段且仍在使用：刷新 `last_current`。
    Refresh { current: f64 },
    /// 已有活动时段但不再使用：结束并计算时长。
    Close { current: Option<f64> },
    /// 无活动时段且未在使用。
    Idle,
}

/// 计算时段迁移；`current` 为 `None` 或非有限值时视为未在使用。
pub fn plan_usage_transition(
    has_active: bool,
    current: Option<f64>,
    threshold: f64,
) -> UsageTransition {
    let current = current.filter(|value| value.is_finite());
    match (current, has_active) {
        (Some(value), false) if value >= threshold => UsageTransition::Open { current: value },
        (Some(value), true) if value >= threshold => UsageTransition::Refresh { current: value },
        (_, true) => UsageTransition::Close { current },
        (_, false) => UsageTransition::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_refreshes_and_closes() {
        assert_eq!(
            plan_usage_transition(false, Some(0.05), 0.05),
            UsageTransition::Open { current: 0.05 }
        );
        assert_eq!(
            plan_usage_transition(true, Some(1.2), 0.05),
            UsageTransition::Refresh { current: 1.2 }
        );
        assert_eq!(
            plan_usage_transition(true, Some(0.01), 0.05),
            UsageTransition::Close {
                current: Some(0.01)
            }
        );
        assert_eq!(
            plan_usage_transition(false, Some(0.01), 0.05),
            UsageTransition::Idle
        );
    }

    #[test]
    fn missing_current_counts_as_not_using() {
        assert_eq!(
            plan_usage_transition(true, None, 0.05),
            UsageTransition::Close { current: None }
        );
        assert_eq!(
            plan_usage_transition(true, Some(f64::NAN), 0.05),
            UsageTransition::Close { current: None }
        );
        assert_eq!(plan_usage_transition(false, None, 0.05), UsageTransition::Idle);
    }
}
