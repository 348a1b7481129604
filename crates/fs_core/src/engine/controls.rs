//! Control output record
//!
//! One actuation frame: two buttons plus five analog axes. Every field
//! defaults to neutral, so templates only spell out what they press.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlOutput {
    pub throttle: f32,
    pub steer: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub jump: bool,
    pub boost: bool,
}

#[inline]
fn axis(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

impl ControlOutput {
    /// All axes centered, no buttons.
    pub const NEUTRAL: ControlOutput = ControlOutput {
        throttle: 0.0,
        steer: 0.0,
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
        jump: false,
        boost: false,
    };

    pub const fn neutral() -> Self {
        Self::NEUTRAL
    }

    pub fn with_throttle(mut self, value: f32) -> Self {
        self.throttle = axis(value);
        self
    }

    pub fn with_steer(mut self, value: f32) -> Self {
        self.steer = axis(value);
        self
    }

    pub fn with_pitch(mut self, value: f32) -> Self {
        self.pitch = axis(value);
        self
    }

    pub fn with_yaw(mut self, value: f32) -> Self {
        self.yaw = axis(value);
        self
    }

    pub fn with_roll(mut self, value: f32) -> Self {
        self.roll = axis(value);
        self
    }

    pub fn with_jump(mut self, pressed: bool) -> Self {
        self.jump = pressed;
        self
    }

    pub fn with_boost(mut self, pressed: bool) -> Self {
        self.boost = pressed;
        self
    }

    /// True when every analog axis lies in [-1, 1] (and is not NaN).
    pub fn is_within_range(&self) -> bool {
        [self.throttle, self.steer, self.pitch, self.yaw, self.roll]
            .iter()
            .all(|v| (-1.0..=1.0).contains(v))
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        assert!(ControlOutput::default().is_neutral());
        assert_eq!(ControlOutput::neutral(), ControlOutput::default());
    }

    #[test]
    fn test_builder_clamps_axes() {
        let c = ControlOutput::neutral().with_pitch(-3.0).with_roll(2.0).with_yaw(f32::NAN);
        assert_eq!(c.pitch, -1.0);
        assert_eq!(c.roll, 1.0);
        assert_eq!(c.yaw, 0.0);
        assert!(c.is_within_range());
    }

    #[test]
    fn test_builder_sets_buttons() {
        let c = ControlOutput::neutral().with_jump(true).with_boost(true);
        assert!(c.jump && c.boost);
        assert!(!c.is_neutral());
    }

    #[test]
    fn test_partial_json_fills_neutral() {
        let c: ControlOutput = serde_json::from_str(r#"{"boost": true, "pitch": -0.4}"#).unwrap();
        assert!(c.boost);
        assert!(!c.jump);
        assert_eq!(c.pitch, -0.4);
        assert_eq!(c.throttle, 0.0);
    }
}
