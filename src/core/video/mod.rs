//! 关键帧提取：步长采样 + H-S 直方图场景变化检测
//!
//! 1. 步长过滤 - 只有 `ordinal % stride == 0` 的帧才计算签名
//! 2. 场景检测 - 与上一张被接受帧的 Bhattacharyya 距离超过阈值即接受
//! 3. 落盘 - 被接受的帧按 `frame_<index>.png` 写入，并生成 frames.json

pub mod detector;
pub mod error;
pub mod frame;
pub mod sampler;
pub mod signature;
pub mod sink;
pub mod source;

pub use detector::{DetectorState, SceneChangeDetector, SceneDecision};
pub use error::VideoError;
pub use frame::{Keyframe, RawFrame};
pub use sampler::{compute_stride, KeyframeSampler, Keyframes, SamplerConfig, SamplingStats};
pub use signature::SceneSignature;
pub use sink::{keyframe_file_name, write_frame_manifest, ImageSink, PngDirectorySink};
pub use source::{FrameSource, ImageSequenceSource, MemoryFrameSource};
