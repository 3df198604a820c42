//! 基准集评估：标题归一化 + Jaccard 模糊匹配 + P/R/F1

pub mod error;
pub mod golden;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod predicted;
pub mod report;
pub mod similarity;

pub use error::EvalError;
pub use golden::{GoldenIssue, GoldenSet};
pub use matcher::{GoldenMatcher, MatchResult};
pub use metrics::Metrics;
pub use normalize::normalize;
pub use predicted::{collect_titles, PredictedIssue};
pub use report::{evaluate_result, evaluate_titles, EvalConfig, EvaluationReport};
pub use similarity::similarity;
