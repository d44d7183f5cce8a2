//! Pose landmark input types.
//!
//! Landmarks arrive from an external pose-estimation engine as normalized
//! image coordinates with a visibility score. Index assignments follow the
//! standard 33-point body pose convention.

use serde::{Deserialize, Serialize};

/// Left ankle landmark index.
pub const LEFT_ANKLE: usize = 27;
/// Right ankle landmark index.
pub const RIGHT_ANKLE: usize = 28;
/// Left foot point (toe) landmark index.
pub const LEFT_FOOT_POINT: usize = 31;
/// Right foot point (toe) landmark index.
pub const RIGHT_FOOT_POINT: usize = 32;

/// One tracked body keypoint.
///
/// `x` and `y` are normalized image coordinates in [0, 1]; `z` is relative
/// depth; `visibility` is the estimator's confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }
}

/// One frame of pose landmarks, sparsely indexed.
///
/// The estimator may omit any landmark in any frame; absent indices read
/// as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    landmarks: Vec<Option<Landmark>>,
}

impl PoseFrame {
    /// Empty frame with no landmarks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame from a dense landmark array (every index present).
    pub fn from_dense(landmarks: Vec<Landmark>) -> Self {
        Self {
            landmarks: landmarks.into_iter().map(Some).collect(),
        }
    }

    /// Set the landmark at `index`, growing the frame as needed.
    pub fn set(&mut self, index: usize, landmark: Landmark) {
        if self.landmarks.len() <= index {
            self.landmarks.resize(index + 1, None);
        }
        self.landmarks[index] = Some(landmark);
    }

    /// Builder-style [`PoseFrame::set`].
    pub fn with(mut self, index: usize, landmark: Landmark) -> Self {
        self.set(index, landmark);
        self
    }

    /// The landmark at `index`, if present this frame.
    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_indices_read_none() {
        let frame = PoseFrame::new();
        assert_eq!(frame.get(LEFT_ANKLE), None);
        assert_eq!(frame.get(1000), None);
    }

    #[test]
    fn test_set_grows_frame() {
        let mut frame = PoseFrame::new();
        frame.set(RIGHT_FOOT_POINT, Landmark::new(0.5, 0.5, 0.0, 1.0));
        assert!(frame.get(RIGHT_FOOT_POINT).is_some());
        assert_eq!(frame.get(LEFT_FOOT_POINT), None);
    }

    #[test]
    fn test_from_dense_keeps_positions() {
        let frame = PoseFrame::from_dense(vec![
            Landmark::new(0.1, 0.2, 0.0, 0.9),
            Landmark::new(0.3, 0.4, 0.0, 0.8),
        ]);
        assert_eq!(frame.get(1).unwrap().x, 0.3);
    }
}
