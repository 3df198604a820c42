//! 视频关键帧提取器

use crate::core::video::sink::MANIFEST_FILE_NAME;
use crate::core::video::{
    write_frame_manifest, FrameSource, ImageSequenceSource, Keyframe, KeyframeSampler,
    PngDirectorySink, SamplerConfig, SamplingStats, VideoError,
};
use log::{info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutput {
    pub keyframes: Vec<Keyframe>,
    pub stats: SamplingStats,
    pub manifest: PathBuf,
}

/// 关键帧提取器 - 场景变化去重 + PNG 落盘
///
/// ```ignore
/// let extractor = KeyframeExtractor::create(SamplerConfig::default());
/// let output = extractor.extract_dir("recording/", 30.0, "runs/42/frames")?;
/// ```
pub struct KeyframeExtractor {
    config: SamplerConfig,
}

impl KeyframeExtractor {
    pub fn create(config: SamplerConfig) -> Self {
        info!("🎬 KeyframeExtractor: created");
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// 从按 `fps` 解码的图片序列目录提取关键帧
    pub fn extract_dir(
        &self,
        frames_dir: impl AsRef<Path>,
        fps: f64,
        out_dir: impl AsRef<Path>,
    ) -> Result<ExtractionOutput, VideoError> {
        let mut source = ImageSequenceSource::open(frames_dir, fps)?;
        self.extract(&mut source, out_dir)
    }

    /// 采样 `source`，被接受的帧和 `frames.json` 写入 `out_dir`。
    /// 中途读帧失败时清单只包含失败前的关键帧，随后返回该错误。
    pub fn extract<S: FrameSource + ?Sized>(
        &self,
        source: &mut S,
        out_dir: impl AsRef<Path>,
    ) -> Result<ExtractionOutput, VideoError> {
        let out_dir = out_dir.as_ref();
        let sink = PngDirectorySink::create(out_dir)?;
        let mut sampler = KeyframeSampler::new(self.config.clone()).with_sink(Box::new(sink));

        let mut keyframes = Vec::new();
        let outcome = sampler.sample_into(source, &mut keyframes);

        // 中途读帧失败时，已落盘的关键帧也写进清单
        let manifest = out_dir.join(MANIFEST_FILE_NAME);
        write_frame_manifest(&manifest, &keyframes)?;
        if let Err(e) = outcome {
            warn!(
                "⚠️ KeyframeExtractor: stopped after {} keyframes, partial manifest {:?}: {}",
                keyframes.len(),
                manifest,
                e
            );
            return Err(e);
        }
        info!(
            "✅ KeyframeExtractor: {} keyframes -> {:?}",
            keyframes.len(),
            out_dir
        );

        Ok(ExtractionOutput {
            keyframes,
            stats: sampler.stats(),
            manifest,
        })
    }
}

impl Default for KeyframeExtractor {
    fn default() -> Self {
        Self::create(SamplerConfig::default())
    }
}
