//! Landmark-to-placement mapping with confidence gating.

use tracing::trace;

use crate::model::scene::Transform;

use super::landmarks::{PoseFrame, LEFT_ANKLE, LEFT_FOOT_POINT, RIGHT_ANKLE, RIGHT_FOOT_POINT};

/// Horizontal span of the 3D coordinate range the normalized image maps to.
const SCALE_X: f32 = 4.0;
/// Vertical span; image Y grows downward, world Y grows upward.
const SCALE_Y: f32 = 3.0;
/// Depth scale applied to the estimator's relative depth.
const SCALE_Z: f32 = 2.0;
/// Normalized image center subtracted before scaling.
const IMAGE_CENTER: f32 = 0.5;

/// Default confidence threshold below which placements are not applied.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Default vertical offset so the shoe sits just below the foot center.
pub const DEFAULT_MODEL_Y_OFFSET: f32 = -0.3;

/// Tracker tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootTrackerConfig {
    /// Placements at or below this confidence leave the model untouched.
    pub confidence_threshold: f32,
    /// Vertical offset applied to the model, not to the reported placement.
    pub model_y_offset: f32,
}

impl Default for FootTrackerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            model_y_offset: DEFAULT_MODEL_Y_OFFSET,
        }
    }
}

/// Ephemeral per-frame placement estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootPlacement {
    /// Foot center mapped into the 3D coordinate range.
    pub position: [f32; 3],
    /// Foot orientation about the vertical axis, radians.
    pub yaw: f32,
    /// Minimum visibility over the four required landmarks, in [0, 1].
    pub confidence: f32,
}

/// Maps pose landmarks to the shoe model's placement transform.
///
/// Requires the two ankle and two foot-point landmarks; a frame missing any
/// of them produces no opinion. The held model transform only follows
/// placements whose confidence clears the threshold.
#[derive(Debug, Clone)]
pub struct FootTracker {
    config: FootTrackerConfig,
    placement: Option<FootPlacement>,
    model_transform: Transform,
}

impl Default for FootTracker {
    fn default() -> Self {
        Self::new(FootTrackerConfig::default())
    }
}

impl FootTracker {
    pub fn new(config: FootTrackerConfig) -> Self {
        Self {
            config,
            placement: None,
            model_transform: Transform::default(),
        }
    }

    /// Compute this frame's placement from landmarks.
    ///
    /// Returns `None` without side effects when any required landmark is
    /// absent. Otherwise returns the placement - even a low-confidence one,
    /// for observability - and moves the held model transform only when the
    /// confidence exceeds the threshold.
    pub fn update(&mut self, frame: &PoseFrame) -> Option<FootPlacement> {
        let left_ankle = frame.get(LEFT_ANKLE)?;
        let right_ankle = frame.get(RIGHT_ANKLE)?;
        let left_foot = frame.get(LEFT_FOOT_POINT)?;
        let right_foot = frame.get(RIGHT_FOOT_POINT)?;

        // Foot center in normalized image coordinates.
        let cx = (left_foot.x + right_foot.x) / 2.0;
        let cy = (left_foot.y + right_foot.y) / 2.0;
        let cz = (left_foot.z + right_foot.z) / 2.0;

        // Fixed scale-and-recenter into the render coordinate range.
        let position = [
            (cx - IMAGE_CENTER) * SCALE_X,
            -(cy - IMAGE_CENTER) * SCALE_Y,
            cz * SCALE_Z,
        ];
        let yaw = (right_foot.y - left_foot.y).atan2(right_foot.x - left_foot.x);
        let confidence = left_ankle
            .visibility
            .min(right_ankle.visibility)
            .min(left_foot.visibility)
            .min(right_foot.visibility);

        let placement = FootPlacement {
            position,
            yaw,
            confidence,
        };

        if confidence > self.config.confidence_threshold {
            self.model_transform.translation = [
                position[0],
                position[1] + self.config.model_y_offset,
                position[2],
            ];
            self.model_transform.yaw = yaw;
        } else {
            trace!(confidence, "placement below threshold, holding transform");
        }

        self.placement = Some(placement);
        Some(placement)
    }

    /// The most recent placement estimate, gated or not.
    pub fn placement(&self) -> Option<FootPlacement> {
        self.placement
    }

    /// The transform the presentation layer should apply to the model
    /// instance. Follows confident placements only.
    pub fn model_transform(&self) -> Transform {
        self.model_transform
    }

    /// Whether the last update cleared the confidence threshold.
    pub fn is_confident(&self) -> bool {
        self.placement
            .is_some_and(|p| p.confidence > self.config.confidence_threshold)
    }
}
