use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Metrics {
    /// 精确率分母为 `matched + extras`，召回率分母为 `matched + missed`，
    /// 分母为 0 时取 0.0。F1 用未舍入的值计算，最后三者统一保留 3 位小数。
    pub fn from_counts(matched: usize, missed: usize, extras: usize) -> Self {
        let precision = ratio(matched, matched + extras);
        let recall = ratio(matched, matched + missed);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            precision: round3(precision),
            recall: round3(recall),
            f1: round3(f1),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// 保留 3 位小数，恰好落在中点时取偶数（银行家舍入）
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}
