use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 帧源没有给出可用帧率时采用的默认值
pub const DEFAULT_FPS: f64 = 30.0;

/// 解码后的原始帧，只在采样循环内存活
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub ordinal: u64,
    pub ts_ms: u32,
    pub image: RgbImage,
}

impl RawFrame {
    pub fn new(ordinal: u64, nominal_fps: f64, image: RgbImage) -> Self {
        Self {
            ordinal,
            ts_ms: timestamp_ms(ordinal, nominal_fps),
            image,
        }
    }
}

/// 时间戳 `ordinal * 1000 / fps` 向下取整，帧率不可用时按 [`DEFAULT_FPS`] 计算
pub fn timestamp_ms(ordinal: u64, nominal_fps: f64) -> u32 {
    let fps = effective_fps(nominal_fps);
    let ms = (ordinal as f64 * 1000.0 / fps).floor();
    if ms >= u32::MAX as f64 {
        u32::MAX
    } else {
        ms as u32
    }
}

pub fn effective_fps(nominal_fps: f64) -> f64 {
    if nominal_fps.is_finite() && nominal_fps > 0.0 {
        nominal_fps
    } else {
        DEFAULT_FPS
    }
}

/// I420 (YUV 4:2:0 planar) 转 RGB
pub fn rgb_from_i420(
    width: u32,
    height: u32,
    y_plane: &[u8],
    u_plane: &[u8],
    v_plane: &[u8],
) -> Option<RgbImage> {
    let w = width as usize;
    let h = height as usize;
    let chroma_w = w.div_ceil(2);
    let chroma_len = chroma_w * h.div_ceil(2);
    if y_plane.len() < w * h || u_plane.len() < chroma_len || v_plane.len() < chroma_len {
        return None;
    }

    let mut rgb = vec![0u8; w * h * 3];
    for y in 0..h {
        for x in 0..w {
            let y_idx = y * w + x;
            let uv_idx = (y / 2) * chroma_w + x / 2;

            let y_val = y_plane[y_idx] as f32;
            let u_val = u_plane[uv_idx] as f32 - 128.0;
            let v_val = v_plane[uv_idx] as f32 - 128.0;

            let rgb_idx = y_idx * 3;
            rgb[rgb_idx] = (y_val + 1.402 * v_val).clamp(0.0, 255.0) as u8;
            rgb[rgb_idx + 1] = (y_val - 0.344136 * u_val - 0.714136 * v_val).clamp(0.0, 255.0) as u8;
            rgb[rgb_idx + 2] = (y_val + 1.772 * u_val).clamp(0.0, 255.0) as u8;
        }
    }

    RgbImage::from_raw(width, height, rgb)
}

/// 被选中的关键帧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// 在关键帧中的序号，从 0 连续递增
    pub index: u32,
    pub ts_ms: u32,
    /// 该帧在解码流中的位置
    #[serde(default)]
    pub ordinal: u64,
    #[serde(rename = "path", default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_frame_timestamp_from_ordinal() {
        let frame = RawFrame::new(45, 15.0, RgbImage::new(4, 2));
        assert_eq!(frame.ordinal, 45);
        assert_eq!(frame.ts_ms, 3000);
        assert_eq!(frame.image.dimensions(), (4, 2));
    }

    #[test]
    fn test_timestamp_truncates() {
        assert_eq!(timestamp_ms(0, 29.97), 0);
        assert_eq!(timestamp_ms(1, 30.0), 33);
        assert_eq!(timestamp_ms(2, 30.0), 66);
        assert_eq!(timestamp_ms(90, 30.0), 3000);
    }

    #[test]
    fn test_timestamp_falls_back_on_bad_fps() {
        assert_eq!(timestamp_ms(30, 0.0), 1000);
        assert_eq!(timestamp_ms(30, -5.0), 1000);
        assert_eq!(timestamp_ms(30, f64::NAN), 1000);
    }

    #[test]
    fn test_yuv_to_rgb() {
        let width = 64;
        let height = 64;
        let y_plane = vec![128u8; (width * height) as usize];
        let u_plane = vec![128u8; (width * height / 4) as usize];
        let v_plane = vec![128u8; (width * height / 4) as usize];

        let rgb = rgb_from_i420(width, height, &y_plane, &u_plane, &v_plane).expect("valid planes");
        assert_eq!(rgb.width(), width);
        assert_eq!(rgb.height(), height);
        assert!(rgb.pixels().all(|p| p.0 == [128, 128, 128]));
    }

    #[test]
    fn test_yuv_rejects_short_planes() {
        assert!(rgb_from_i420(4, 4, &[0u8; 8], &[0u8; 4], &[0u8; 4]).is_none());
    }

    #[test]
    fn test_keyframe_manifest_shape() {
        let keyframe = Keyframe {
            index: 0,
            ts_ms: 0,
            ordinal: 0,
            image_ref: Some(PathBuf::from("frames/frame_00000.png")),
        };
        let json = serde_json::to_value(&keyframe).unwrap();
        assert_eq!(json["path"], "frames/frame_00000.png");
        assert_eq!(json["index"], 0);

        let bare = Keyframe { image_ref: None, ..keyframe };
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("path").is_none());
    }
}
