//! Foot tracking.
//!
//! Maps externally-computed pose landmarks to a placement transform for the
//! shoe model. The adapter holds the last applied transform and only moves
//! it when the landmark confidence clears a threshold, so a noisy frame
//! never snaps the shoe to a bad estimate.

mod adapter;
mod landmarks;

pub use adapter::{
    FootPlacement, FootTracker, FootTrackerConfig, DEFAULT_CONFIDENCE_THRESHOLD,
    DEFAULT_MODEL_Y_OFFSET,
};
pub use landmarks::{
    Landmark, PoseFrame, LEFT_ANKLE, LEFT_FOOT_POINT, RIGHT_ANKLE, RIGHT_FOOT_POINT,
};
