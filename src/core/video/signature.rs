//! 用于区分场景的色相/饱和度直方图

use image::RgbImage;

pub const HUE_BINS: usize = 50;
pub const SAT_BINS: usize = 60;
/// 8 位色相范围（角度 / 2）
pub const HUE_RANGE: u32 = 180;
pub const SAT_RANGE: u32 = 256;

/// 帧的颜色分布签名：50×60 的 H-S 直方图，归一化为和为 1
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSignature {
    bins: Vec<f32>,
}

impl SceneSignature {
    pub fn from_image(image: &RgbImage) -> Self {
        let mut counts = vec![0u32; HUE_BINS * SAT_BINS];
        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            let (hue, sat) = hue_saturation(r, g, b);
            let h_bin = (hue * HUE_BINS as u32 / HUE_RANGE) as usize;
            let s_bin = (sat * SAT_BINS as u32 / SAT_RANGE) as usize;
            counts[h_bin * SAT_BINS + s_bin] += 1;
        }
        Self::from_counts(&counts)
    }

    /// 按总和归一化原始计数，全零直方图保持全零
    pub fn from_counts(counts: &[u32]) -> Self {
        let mut bins = vec![0.0f32; HUE_BINS * SAT_BINS];
        let total: u64 = counts.iter().map(|&c| c as u64).sum();
        if total > 0 {
            for (bin, &count) in bins.iter_mut().zip(counts) {
                *bin = (count as f64 / total as f64) as f32;
            }
        }
        Self { bins }
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn bin(&self, hue_bin: usize, sat_bin: usize) -> f32 {
        self.bins[hue_bin * SAT_BINS + sat_bin]
    }

    pub fn sum(&self) -> f64 {
        self.bins.iter().map(|&v| v as f64).sum()
    }

    pub fn is_degenerate(&self) -> bool {
        self.bins.iter().all(|&v| v == 0.0)
    }

    /// `[0, 1]` 内的 Bhattacharyya 距离：分布相同为 0，不相交或任一侧退化为 1
    pub fn bhattacharyya_distance(&self, other: &SceneSignature) -> f64 {
        let mut coefficient = 0.0f64;
        let mut s1 = 0.0f64;
        let mut s2 = 0.0f64;
        for (&a, &b) in self.bins.iter().zip(other.bins.iter()) {
            let (a, b) = (a as f64, b as f64);
            coefficient += (a * b).sqrt();
            s1 += a;
            s2 += b;
        }

        let scale = s1 * s2;
        let scale = if scale.abs() > f64::from(f32::EPSILON) {
            1.0 / scale.sqrt()
        } else {
            1.0
        };
        (1.0 - coefficient * scale).max(0.0).sqrt()
    }
}

/// 8 位 HSV 转换：色相 `0..180`，饱和度 `0..=255`
fn hue_saturation(r: u8, g: u8, b: u8) -> (u32, u32) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let sat = if max > 0.0 { 255.0 * delta / max } else { 0.0 };
    if delta == 0.0 {
        return (0, sat.round() as u32);
    }

    let mut hue = if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let hue = (hue / 2.0).round() as u32;
    let hue = if hue >= HUE_RANGE { 0 } else { hue };
    (hue, (sat.round() as u32).min(255))
}
