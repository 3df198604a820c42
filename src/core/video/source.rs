use super::error::VideoError;
use super::frame::rgb_from_i420;
use image::RgbImage;
use log::{debug, info};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// 帧源：按顺序产出已解码的帧，并给出标称帧率
///
/// `Ok(None)` 表示正常结束，读帧失败为 `Err(VideoError::Read)`。
pub trait FrameSource {
    fn nominal_fps(&self) -> f64;

    fn next_frame(&mut self) -> Result<Option<RgbImage>, VideoError>;

    /// 跳过一帧，到达末尾时返回 `false`。能免解码跳帧的帧源应覆盖此方法。
    fn skip_frame(&mut self) -> Result<bool, VideoError> {
        Ok(self.next_frame()?.is_some())
    }
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn nominal_fps(&self) -> f64 {
        (**self).nominal_fps()
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, VideoError> {
        (**self).next_frame()
    }

    fn skip_frame(&mut self) -> Result<bool, VideoError> {
        (**self).skip_frame()
    }
}

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// 图片序列帧源：目录内按文件名排序的静态图片
pub struct ImageSequenceSource {
    files: Vec<PathBuf>,
    position: usize,
    fps: f64,
}

impl ImageSequenceSource {
    pub fn open(dir: impl AsRef<Path>, fps: f64) -> Result<Self, VideoError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| VideoError::Decode {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| VideoError::Decode {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                })?
                .path();
            if path.is_file() && is_image_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        info!(
            "🎞️ ImageSequenceSource: {} frames in {:?} at {} fps",
            files.len(),
            dir,
            fps
        );
        Ok(Self {
            files,
            position: 0,
            fps,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn nominal_fps(&self) -> f64 {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, VideoError> {
        let Some(path) = self.files.get(self.position) else {
            return Ok(None);
        };
        let ordinal = self.position as u64;
        self.position += 1;

        debug!("decoding frame {} from {:?}", ordinal, path);
        let image = image::open(path).map_err(|e| VideoError::Read {
            ordinal,
            reason: format!("{}: {}", path.display(), e),
        })?;
        Ok(Some(image.to_rgb8()))
    }

    fn skip_frame(&mut self) -> Result<bool, VideoError> {
        if self.position < self.files.len() {
            self.position += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// 内存帧源：由调用方直接推入已解码的帧
pub struct MemoryFrameSource {
    frames: VecDeque<RgbImage>,
    fps: f64,
}

impl MemoryFrameSource {
    pub fn new(fps: f64) -> Self {
        Self {
            frames: VecDeque::new(),
            fps,
        }
    }

    pub fn from_frames(frames: Vec<RgbImage>, fps: f64) -> Self {
        Self {
            frames: frames.into(),
            fps,
        }
    }

    pub fn push(&mut self, frame: RgbImage) {
        self.frames.push_back(frame);
    }

    /// 推入一帧 I420 数据，平面尺寸不符时返回 `false`
    pub fn push_i420(
        &mut self,
        width: u32,
        height: u32,
        y_plane: &[u8],
        u_plane: &[u8],
        v_plane: &[u8],
    ) -> bool {
        match rgb_from_i420(width, height, y_plane, u_plane, v_plane) {
            Some(frame) => {
                self.frames.push_back(frame);
                true
            }
            None => false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for MemoryFrameSource {
    fn nominal_fps(&self) -> f64 {
        self.fps
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, VideoError> {
        Ok(self.frames.pop_front())
    }

    fn skip_frame(&mut self) -> Result<bool, VideoError> {
        Ok(self.frames.pop_front().is_some())
    }
}
