use super::signature::SceneSignature;

pub const DEFAULT_MIN_SCENE_DELTA: f64 = 25.0;

/// 检测器状态：最近一次被接受帧的签名
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorState {
    last_accepted: Option<SceneSignature>,
}

impl DetectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_last_accepted(signature: SceneSignature) -> Self {
        Self {
            last_accepted: Some(signature),
        }
    }

    pub fn last_accepted(&self) -> Option<&SceneSignature> {
        self.last_accepted.as_ref()
    }

    /// 顺序折叠的一步：被拒绝的候选不改变状态，被接受的替换 `last_accepted`
    pub fn transition(
        self,
        candidate: SceneSignature,
        min_scene_delta: f64,
    ) -> (DetectorState, SceneDecision) {
        match self.last_accepted {
            None => (
                DetectorState::with_last_accepted(candidate),
                SceneDecision::Accept { distance: None },
            ),
            Some(last) => {
                let distance = scene_distance(&last, &candidate);
                if distance > min_scene_delta {
                    (
                        DetectorState::with_last_accepted(candidate),
                        SceneDecision::Accept {
                            distance: Some(distance),
                        },
                    )
                } else {
                    (
                        DetectorState {
                            last_accepted: Some(last),
                        },
                        SceneDecision::Reject { distance },
                    )
                }
            }
        }
    }
}

/// 缩放到 `[0, 100]` 的 Bhattacharyya 距离
pub fn scene_distance(a: &SceneSignature, b: &SceneSignature) -> f64 {
    a.bhattacharyya_distance(b) * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneDecision {
    /// 第一个候选帧没有可比较的对象，`distance` 为 `None`
    Accept { distance: Option<f64> },
    Reject { distance: f64 },
}

impl SceneDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, SceneDecision::Accept { .. })
    }
}

pub struct SceneChangeDetector {
    state: DetectorState,
    min_scene_delta: f64,
    candidate_count: u64,
}

impl SceneChangeDetector {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_MIN_SCENE_DELTA)
    }

    pub fn with_threshold(min_scene_delta: f64) -> Self {
        Self::with_state(min_scene_delta, DetectorState::new())
    }

    /// 从已有状态继续，例如接续上一段视频的末尾
    pub fn with_state(min_scene_delta: f64, state: DetectorState) -> Self {
        Self {
            state,
            min_scene_delta,
            candidate_count: 0,
        }
    }

    pub fn offer(&mut self, candidate: SceneSignature) -> SceneDecision {
        self.candidate_count += 1;

        let (new_state, decision) =
            std::mem::take(&mut self.state).transition(candidate, self.min_scene_delta);
        self.state = new_state;

        decision
    }

    pub fn current_state(&self) -> &DetectorState {
        &self.state
    }

    pub fn into_state(self) -> DetectorState {
        self.state
    }

    pub fn min_scene_delta(&self) -> f64 {
        self.min_scene_delta
    }

    pub fn candidate_count(&self) -> u64 {
        self.candidate_count
    }

    pub fn reset(&mut self) {
        self.state = DetectorState::new();
        self.candidate_count = 0;
    }
}

impl Default for SceneChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::signature::{HUE_BINS, SAT_BINS};
    use image::{Rgb, RgbImage};

    fn signature(color: [u8; 3]) -> SceneSignature {
        SceneSignature::from_image(&RgbImage::from_pixel(16, 16, Rgb(color)))
    }

    #[test]
    fn test_first_candidate_always_accepted() {
        let mut detector = SceneChangeDetector::new();
        assert!(detector.current_state().last_accepted().is_none());

        let decision = detector.offer(signature([10, 10, 10]));
        assert_eq!(decision, SceneDecision::Accept { distance: None });
        assert!(detector.current_state().last_accepted().is_some());
    }

    #[test]
    fn test_identical_frames() {
        let mut detector = SceneChangeDetector::new();
        assert!(detector.offer(signature([200, 30, 30])).is_accept());
        assert!(!detector.offer(signature([200, 30, 30])).is_accept());
    }

    #[test]
    fn test_different_frames() {
        let mut detector = SceneChangeDetector::new();
        assert!(detector.offer(signature([255, 0, 0])).is_accept());
        match detector.offer(signature([0, 0, 255])) {
            SceneDecision::Accept { distance: Some(d) } => assert!((d - 100.0).abs() < 1e-6),
            other => panic!("expected scene change, got {other:?}"),
        }
    }

    #[test]
    fn test_brightness_only_change_is_not_a_scene_change() {
        // black and grey share hue 0 / saturation 0
        let mut detector = SceneChangeDetector::new();
        assert!(detector.offer(signature([0, 0, 0])).is_accept());
        assert!(!detector.offer(signature([128, 128, 128])).is_accept());
    }

    #[test]
    fn test_compares_against_last_accepted_not_previous() {
        let red = signature([255, 0, 0]);
        let mut counts = vec![0u32; HUE_BINS * SAT_BINS];
        // mostly red with a little blue: close to red, far from blue
        counts[59] = 9;
        counts[33 * SAT_BINS + 59] = 1;
        let reddish = SceneSignature::from_counts(&counts);

        let mut detector = SceneChangeDetector::with_threshold(25.0);
        assert!(detector.offer(red.clone()).is_accept());
        // rejected, so the reference stays pure red
        assert!(!detector.offer(reddish.clone()).is_accept());
        assert_eq!(detector.current_state().last_accepted(), Some(&red));
        assert!(!detector.offer(reddish).is_accept());
        assert_eq!(detector.candidate_count(), 3);
    }

    #[test]
    fn test_transition_with_injected_state() {
        let state = DetectorState::with_last_accepted(signature([0, 255, 0]));

        let (state, decision) = state.transition(signature([0, 255, 0]), 25.0);
        assert!(matches!(decision, SceneDecision::Reject { .. }));

        let (state, decision) = state.transition(signature([0, 0, 255]), 25.0);
        assert!(decision.is_accept());
        assert_eq!(state.last_accepted(), Some(&signature([0, 0, 255])));
    }

    #[test]
    fn test_threshold_is_strict() {
        let state = DetectorState::with_last_accepted(signature([255, 0, 0]));
        // disjoint histograms sit exactly at 100
        let (_, decision) = state.transition(signature([0, 0, 255]), 100.0);
        assert!(!decision.is_accept());
    }

    #[test]
    fn test_reset() {
        let mut detector = SceneChangeDetector::with_state(
            25.0,
            DetectorState::with_last_accepted(signature([1, 2, 3])),
        );
        detector.offer(signature([1, 2, 3]));
        detector.reset();

        assert!(detector.current_state().last_accepted().is_none());
        assert_eq!(detector.candidate_count(), 0);
        assert!(detector.offer(signature([1, 2, 3])).is_accept());
    }
}
