use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VideoError {
    /// 帧源无法打开或初始化
    #[error("cannot open video source {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
    /// 读帧中途失败，正常结束不会用到
    #[error("failed to read frame {ordinal}: {reason}")]
    Read { ordinal: u64, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}
