use super::error::VideoError;
use super::frame::Keyframe;
use image::{ImageFormat, RgbImage};
use log::debug;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE_NAME: &str = "frames.json";

/// 关键帧落盘，返回每帧的保存路径
pub trait ImageSink: Send {
    fn save(&mut self, index: u32, raster: &RgbImage) -> Result<PathBuf, VideoError>;
}

/// `frame_00012.png`
pub fn keyframe_file_name(index: u32) -> String {
    format!("frame_{:05}.png", index)
}

/// 将关键帧以 PNG 写入目录
pub struct PngDirectorySink {
    dir: PathBuf,
}

impl PngDirectorySink {
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, VideoError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSink for PngDirectorySink {
    fn save(&mut self, index: u32, raster: &RgbImage) -> Result<PathBuf, VideoError> {
        let path = self.dir.join(keyframe_file_name(index));
        raster.save_with_format(&path, ImageFormat::Png)?;
        debug!("💾 keyframe {} -> {:?}", index, path);
        Ok(path)
    }
}

/// 写出 `[{index, ts_ms, path}]` 清单，供下游生成报告
pub fn write_frame_manifest(path: &Path, keyframes: &[Keyframe]) -> Result<(), VideoError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, keyframes)?;
    Ok(())
}

pub fn read_frame_manifest(path: &Path) -> Result<Vec<Keyframe>, VideoError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_file_name_zero_padded() {
        assert_eq!(keyframe_file_name(0), "frame_00000.png");
        assert_eq!(keyframe_file_name(42), "frame_00042.png");
        assert_eq!(keyframe_file_name(123456), "frame_123456.png");
    }

    #[test]
    fn test_png_sink_writes_decodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngDirectorySink::create(dir.path().join("frames")).unwrap();

        let raster = RgbImage::from_pixel(8, 6, Rgb([12, 34, 56]));
        let path = sink.save(3, &raster).unwrap();

        assert_eq!(path, dir.path().join("frames").join("frame_00003.png"));
        let reloaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reloaded, raster);
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join(MANIFEST_FILE_NAME);
        let keyframes = vec![
            Keyframe {
                index: 0,
                ts_ms: 0,
                ordinal: 0,
                image_ref: Some(dir.path().join("frame_00000.png")),
            },
            Keyframe {
                index: 1,
                ts_ms: 4000,
                ordinal: 120,
                image_ref: Some(dir.path().join("frame_00001.png")),
            },
        ];

        write_frame_manifest(&manifest, &keyframes).unwrap();
        assert_eq!(read_frame_manifest(&manifest).unwrap(), keyframes);
    }
}
