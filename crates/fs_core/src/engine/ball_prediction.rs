//! Ball Prediction lookup
//!
//! The host regenerates a time-ascending list of predicted ball states every
//! tick. This module owns that list and answers "where will the ball be at
//! game time `t`" with a binary search.

use super::types::Vec3;
use serde::{Deserialize, Serialize};

/// One predicted ball state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictedSlice {
    /// Absolute game time of the sample (seconds).
    pub game_seconds: f32,
    pub location: Vec3,
    #[serde(default = "Vec3::zeros")]
    pub velocity: Vec3,
}

impl PredictedSlice {
    pub fn new(game_seconds: f32, location: Vec3, velocity: Vec3) -> Self {
        Self { game_seconds, location, velocity }
    }

    pub fn height(&self) -> f32 {
        self.location.z
    }
}

/// Find the first slice at or after `target_time`.
///
/// `slices` must be sorted by ascending `game_seconds`. Returns `None` for an
/// empty input, a NaN target, or a target past the last sample. A target
/// before the first sample yields the first sample.
pub fn sample_at(slices: &[PredictedSlice], target_time: f32) -> Option<&PredictedSlice> {
    if target_time.is_nan() {
        return None;
    }
    let idx = slices.partition_point(|slice| slice.game_seconds < target_time);
    slices.get(idx)
}

/// Owned, time-ascending prediction for the current tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PredictedSlice>", into = "Vec<PredictedSlice>")]
pub struct BallPrediction {
    slices: Vec<PredictedSlice>,
}

impl From<Vec<PredictedSlice>> for BallPrediction {
    fn from(slices: Vec<PredictedSlice>) -> Self {
        Self::new(slices)
    }
}

impl From<BallPrediction> for Vec<PredictedSlice> {
    fn from(prediction: BallPrediction) -> Self {
        prediction.slices
    }
}

impl BallPrediction {
    /// Take ownership of the host's slices.
    ///
    /// Slices with a non-finite timestamp are dropped; out-of-order input is
    /// re-sorted so lookups can stay logarithmic.
    pub fn new(mut slices: Vec<PredictedSlice>) -> Self {
        slices.retain(|slice| slice.game_seconds.is_finite());
        if !slices.windows(2).all(|w| w[0].game_seconds <= w[1].game_seconds) {
            tracing::debug!(count = slices.len(), "ball prediction out of order, sorting");
            slices.sort_by(|a, b| a.game_seconds.total_cmp(&b.game_seconds));
        }
        Self { slices }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// See [`sample_at`].
    pub fn sample_at(&self, target_time: f32) -> Option<&PredictedSlice> {
        sample_at(&self.slices, target_time)
    }

    /// Timestamp of the last sample (the covered horizon).
    pub fn horizon(&self) -> Option<f32> {
        self.slices.last().map(|slice| slice.game_seconds)
    }

    pub fn first(&self) -> Option<&PredictedSlice> {
        self.slices.first()
    }

    pub fn slices(&self) -> &[PredictedSlice] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}
