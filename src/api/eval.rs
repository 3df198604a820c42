//! 基准集评估器

use crate::core::eval::{evaluate_result, EvalConfig, EvalError, EvaluationReport, GoldenSet};
use log::info;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_GOLDEN_PATH: &str = "data/golden_bugs.csv";

/// 持有一份已加载的基准集，可对任意多个预测结果打分；克隆时共享同一份基准集
#[derive(Debug, Clone)]
pub struct GoldenEvaluator {
    golden: Arc<GoldenSet>,
    config: EvalConfig,
}

impl GoldenEvaluator {
    pub fn new(golden: GoldenSet, config: EvalConfig) -> Self {
        Self {
            golden: Arc::new(golden),
            config,
        }
    }

    pub fn load(path: impl AsRef<Path>, config: EvalConfig) -> Result<Self, EvalError> {
        let golden = GoldenSet::load(path.as_ref())?;
        info!("📋 GoldenEvaluator: {} golden issues, threshold {}", golden.len(), config.threshold);
        Ok(Self::new(golden, config))
    }

    pub fn golden(&self) -> &GoldenSet {
        &self.golden
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn evaluate(&self, scenario_id: &str, predicted: &Value) -> Result<EvaluationReport, EvalError> {
        evaluate_result(scenario_id, predicted, &self.golden, &self.config)
    }
}

/// 一次性评估：加载基准集（`golden_path` 为 `None` 时用默认位置）并为 `predicted` 打分
pub fn evaluate_run(
    scenario_id: &str,
    predicted: &Value,
    golden_path: Option<&Path>,
    threshold: u32,
) -> Result<EvaluationReport, EvalError> {
    let path = golden_path.unwrap_or_else(|| Path::new(DEFAULT_GOLDEN_PATH));
    let config = EvalConfig {
        threshold,
        ..EvalConfig::default()
    };
    GoldenEvaluator::load(path, config)?.evaluate(scenario_id, predicted)
}
