use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    /// 基准记录缺少必需字段，`row` 从 1 开始并计入表头行
    #[error("golden set row {row}: missing required field `{field}`")]
    DataFormat { row: u64, field: String },
    #[error("predicted bucket `{bucket}` is not a list of issues: {reason}")]
    InvalidBucket { bucket: String, reason: String },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
