use super::detector::{SceneChangeDetector, SceneDecision, DEFAULT_MIN_SCENE_DELTA};
use super::error::VideoError;
use super::frame::{effective_fps, Keyframe, RawFrame};
use super::signature::SceneSignature;
use super::sink::ImageSink;
use super::source::FrameSource;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::iter::FusedIterator;

#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub min_scene_delta: f64,
    /// 每秒候选帧上限，`None` 或 `<= 0` 时每帧都是候选
    pub fps_cap: Option<f64>,
    /// 并行计算签名的批大小，`0` 或 `1` 时完全串行
    pub batch_size: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_scene_delta: DEFAULT_MIN_SCENE_DELTA,
            fps_cap: Some(1.0),
            batch_size: 0,
        }
    }
}

impl SamplerConfig {
    pub fn parallel() -> Self {
        Self {
            batch_size: num_cpus::get() * 4,
            ..Default::default()
        }
    }
}

/// 采样步长 `max(1, floor(fps / fps_cap))`，没有可用上限时为 1
pub fn compute_stride(nominal_fps: f64, fps_cap: Option<f64>) -> u64 {
    match fps_cap {
        Some(cap) if cap.is_finite() && cap > 0.0 => {
            let ratio = (effective_fps(nominal_fps) / cap).floor();
            if ratio >= 1.0 {
                ratio as u64
            } else {
                1
            }
        }
        _ => 1,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SamplingStats {
    pub frames_read: u64,
    pub candidates: u64,
    pub keyframes: u64,
}

/// 单次遍历帧源时的位置
#[derive(Debug, Clone, Copy)]
struct Cursor {
    fps: f64,
    stride: u64,
    ordinal: u64,
    next_index: u32,
}

/// 关键帧采样器：按步长取候选帧，经场景变化检测后输出关键帧
pub struct KeyframeSampler {
    config: SamplerConfig,
    detector: SceneChangeDetector,
    sink: Option<Box<dyn ImageSink>>,
    stats: SamplingStats,
}

impl KeyframeSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            detector: SceneChangeDetector::with_threshold(config.min_scene_delta),
            config,
            sink: None,
            stats: SamplingStats::default(),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ImageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn stats(&self) -> SamplingStats {
        self.stats
    }

    pub fn reset(&mut self) {
        self.detector.reset();
        self.stats = SamplingStats::default();
    }

    /// 逐个产出关键帧；迭代器在第一个错误后结束，之前产出的关键帧仍然可用
    pub fn keyframes<'a, S: FrameSource + ?Sized>(
        &'a mut self,
        source: &'a mut S,
    ) -> Keyframes<'a, S> {
        let cursor = self.begin(source.nominal_fps());
        Keyframes {
            sampler: self,
            source,
            cursor,
            finished: false,
        }
    }

    pub fn sample<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<Vec<Keyframe>, VideoError> {
        let mut keyframes = Vec::new();
        self.sample_into(source, &mut keyframes)?;
        Ok(keyframes)
    }

    /// 采样结果追加到 `keyframes`，出错返回时已接受的关键帧仍保留在其中
    pub fn sample_into<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        keyframes: &mut Vec<Keyframe>,
    ) -> Result<(), VideoError> {
        if self.config.batch_size > 1 {
            let batch_size = self.config.batch_size;
            return self.sample_batched_into(source, batch_size, keyframes);
        }
        for keyframe in self.keyframes(source) {
            keyframes.push(keyframe?);
        }
        Ok(())
    }

    /// 候选帧签名按批并行计算，接受/拒绝仍按流顺序依次判定
    pub fn sample_batched<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        batch_size: usize,
    ) -> Result<Vec<Keyframe>, VideoError> {
        let mut keyframes = Vec::new();
        self.sample_batched_into(source, batch_size, &mut keyframes)?;
        Ok(keyframes)
    }

    fn sample_batched_into<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        batch_size: usize,
        keyframes: &mut Vec<Keyframe>,
    ) -> Result<(), VideoError> {
        let batch_size = batch_size.max(1);
        let mut cursor = self.begin(source.nominal_fps());

        loop {
            let mut batch = Vec::with_capacity(batch_size);
            let mut read_error = None;
            while batch.len() < batch_size {
                match self.next_candidate(source, &mut cursor) {
                    Ok(Some(frame)) => batch.push(frame),
                    Ok(None) => break,
                    Err(e) => {
                        read_error = Some(e);
                        break;
                    }
                }
            }
            let exhausted = batch.len() < batch_size;

            let signatures: Vec<SceneSignature> = batch
                .par_iter()
                .map(|frame| SceneSignature::from_image(&frame.image))
                .collect();

            // 出错前已读到的候选帧照常判定
            for (frame, signature) in batch.into_iter().zip(signatures) {
                if let Some(keyframe) = self.consider(frame, signature, &mut cursor)? {
                    keyframes.push(keyframe);
                }
            }

            if let Some(e) = read_error {
                return Err(e);
            }
            if exhausted {
                break;
            }
        }

        self.log_summary();
        Ok(())
    }

    fn begin(&mut self, nominal_fps: f64) -> Cursor {
        self.reset();
        let fps = effective_fps(nominal_fps);
        let stride = compute_stride(fps, self.config.fps_cap);
        info!(
            "🎬 KeyframeSampler: fps {:.3} (nominal {}), stride {}, min_scene_delta {}",
            fps, nominal_fps, stride, self.config.min_scene_delta
        );
        Cursor {
            fps,
            stride,
            ordinal: 0,
            next_index: 0,
        }
    }

    /// 读到下一个候选帧，非候选帧直接跳过，不计算签名
    fn next_candidate<S: FrameSource + ?Sized>(
        &mut self,
        source: &mut S,
        cursor: &mut Cursor,
    ) -> Result<Option<RawFrame>, VideoError> {
        loop {
            let ordinal = cursor.ordinal;
            if ordinal % cursor.stride != 0 {
                if !source.skip_frame()? {
                    return Ok(None);
                }
                cursor.ordinal += 1;
                self.stats.frames_read += 1;
                continue;
            }

            return match source.next_frame()? {
                Some(image) => {
                    cursor.ordinal += 1;
                    self.stats.frames_read += 1;
                    self.stats.candidates += 1;
                    Ok(Some(RawFrame::new(ordinal, cursor.fps, image)))
                }
                None => Ok(None),
            };
        }
    }

    fn consider(
        &mut self,
        frame: RawFrame,
        signature: SceneSignature,
        cursor: &mut Cursor,
    ) -> Result<Option<Keyframe>, VideoError> {
        let distance = match self.detector.offer(signature) {
            SceneDecision::Accept { distance } => distance,
            SceneDecision::Reject { distance } => {
                debug!("frame {} rejected, distance {:.2}", frame.ordinal, distance);
                return Ok(None);
            }
        };

        let index = cursor.next_index;
        cursor.next_index += 1;

        let image_ref = match self.sink.as_mut() {
            Some(sink) => Some(sink.save(index, &frame.image)?),
            None => None,
        };
        self.stats.keyframes += 1;

        debug!(
            "✅ keyframe {} <- frame {} @ {}ms (distance {:?})",
            index, frame.ordinal, frame.ts_ms, distance
        );
        Ok(Some(Keyframe {
            index,
            ts_ms: frame.ts_ms,
            ordinal: frame.ordinal,
            image_ref,
        }))
    }

    fn log_summary(&self) {
        info!(
            "📊 KeyframeSampler: {} frames read, {} candidates, {} keyframes",
            self.stats.frames_read, self.stats.candidates, self.stats.keyframes
        );
    }
}

pub struct Keyframes<'a, S: FrameSource + ?Sized> {
    sampler: &'a mut KeyframeSampler,
    source: &'a mut S,
    cursor: Cursor,
    finished: bool,
}

impl<S: FrameSource + ?Sized> Iterator for Keyframes<'_, S> {
    type Item = Result<Keyframe, VideoError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let frame = match self.sampler.next_candidate(&mut *self.source, &mut self.cursor) {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    self.finished = true;
                    self.sampler.log_summary();
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            let signature = SceneSignature::from_image(&frame.image);
            match self.sampler.consider(frame, signature, &mut self.cursor) {
                Ok(Some(keyframe)) => return Some(Ok(keyframe)),
                Ok(None) => continue,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<S: FrameSource + ?Sized> FusedIterator for Keyframes<'_, S> {}
