use super::error::EvalError;
use super::golden::GoldenSet;
use super::matcher::{GoldenMatcher, MatchResult, DEFAULT_THRESHOLD};
use super::metrics::Metrics;
use super::predicted::{collect_titles, DEFAULT_BUCKETS};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub threshold: u32,
    /// 需要展平的预测分桶，按顺序
    pub buckets: Vec<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            buckets: DEFAULT_BUCKETS.iter().map(|b| b.to_string()).collect(),
        }
    }
}

/// 评估结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub scenario_id: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub matched: Vec<String>,
    pub missed: Vec<String>,
    pub extras: Vec<String>,
}

impl EvaluationReport {
    pub fn from_match(scenario_id: impl Into<String>, result: MatchResult) -> Self {
        let metrics = Metrics::from_counts(
            result.matched.len(),
            result.missed.len(),
            result.extras.len(),
        );
        Self {
            scenario_id: scenario_id.into(),
            precision: metrics.precision,
            recall: metrics.recall,
            f1: metrics.f1,
            matched: result.matched,
            missed: result.missed,
            extras: result.extras,
        }
    }

    pub fn metrics(&self) -> Metrics {
        Metrics {
            precision: self.precision,
            recall: self.recall,
            f1: self.f1,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<(), EvalError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// 为已展平的预测标题打分
pub fn evaluate_titles<S: AsRef<str> + Sync>(
    scenario_id: &str,
    predicted: &[S],
    golden: &GoldenSet,
    threshold: u32,
) -> EvaluationReport {
    let result = GoldenMatcher::new(golden.issues(), threshold).match_titles(predicted);
    let report = EvaluationReport::from_match(scenario_id, result);
    info!(
        "🎯 {}: {} golden, {} predicted -> matched {}, missed {}, extras {} (P {:.3} R {:.3} F1 {:.3})",
        scenario_id,
        golden.len(),
        predicted.len(),
        report.matched.len(),
        report.missed.len(),
        report.extras.len(),
        report.precision,
        report.recall,
        report.f1
    );
    report
}

/// 展平预测结果中配置的分桶并打分
pub fn evaluate_result(
    scenario_id: &str,
    predicted: &Value,
    golden: &GoldenSet,
    config: &EvalConfig,
) -> Result<EvaluationReport, EvalError> {
    let titles = collect_titles(predicted, &config.buckets)?;
    Ok(evaluate_titles(scenario_id, &titles, golden, config.threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::eval::golden::GoldenIssue;
    use serde_json::json;

    fn password_golden() -> GoldenSet {
        GoldenSet::new(vec![GoldenIssue {
            id: "G1".to_string(),
            title: "password prompt missing".to_string(),
        }])
    }

    #[test]
    fn test_near_miss_at_default_threshold() {
        // 3 shared of 4 distinct tokens scores 75
        let report = evaluate_titles("s1", &["password prompt is missing"], &password_golden(), 80);
        assert!(report.matched.is_empty());
        assert_eq!(report.missed, vec!["G1"]);
        assert_eq!(report.extras, vec!["pred-0"]);
        assert_eq!(report.metrics(), Metrics::default());
    }

    #[test]
    fn test_near_match_at_matching_threshold() {
        let report = evaluate_titles("s1", &["password prompt is missing"], &password_golden(), 75);
        assert_eq!(report.matched, vec!["G1"]);
        assert!(report.missed.is_empty());
        assert!(report.extras.is_empty());
        assert_eq!((report.precision, report.recall, report.f1), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_nothing_predicted() {
        let report = evaluate_titles::<&str>("s2", &[], &password_golden(), 80);
        assert!(report.matched.is_empty());
        assert_eq!(report.missed, vec!["G1"]);
        assert!(report.extras.is_empty());
        assert_eq!((report.precision, report.recall, report.f1), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_golden_set() {
        let report = evaluate_titles("s3", &["unrelated issue"], &GoldenSet::default(), 80);
        assert!(report.matched.is_empty());
        assert!(report.missed.is_empty());
        assert_eq!(report.extras, vec!["pred-0"]);
        assert_eq!((report.precision, report.recall, report.f1), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_evaluate_result_mixed() {
        let golden = GoldenSet::new(vec![
            GoldenIssue {
                id: "G001".to_string(),
                title: "Dead-end experience with no recovery path".to_string(),
            },
            GoldenIssue {
                id: "G004".to_string(),
                title: "Password prompt not shown for protected files".to_string(),
            },
            GoldenIssue {
                id: "G009".to_string(),
                title: "Wrong app precedence when multiple apps installed".to_string(),
            },
        ]);
        let predicted = json!({
            "bugs_strong": [{"title": "Dead end experience with no recovery path!"}],
            "bugs_minor": [
                {"title": "Password prompt not shown for protected files"},
                {"title": "Toolbar icon misaligned"}
            ],
        });

        let report = evaluate_result("scenario_x", &predicted, &golden, &EvalConfig::default()).unwrap();
        assert_eq!(report.scenario_id, "scenario_x");
        assert_eq!(report.matched, vec!["G001", "G004"]);
        assert_eq!(report.missed, vec!["G009"]);
        assert_eq!(report.extras, vec!["pred-2"]);
        // P 2/3, R 2/3
        assert_eq!((report.precision, report.recall, report.f1), (0.667, 0.667, 0.667));
    }

    #[test]
    fn test_report_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eval.json");
        let report = evaluate_titles("s1", &["password prompt missing"], &password_golden(), 80);
        report.write_json(&path).unwrap();

        let value: Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(value["scenario_id"], "s1");
        assert_eq!(value["precision"], 1.0);
        assert_eq!(value["matched"], json!(["G1"]));
        assert_eq!(value["extras"], json!([]));
    }
}
