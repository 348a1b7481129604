//! Ground behavior and driving configuration

use crate::engine::trick_catalog::TrickKind;
use serde::{Deserialize, Serialize};

/// A ground trick trigger: grounded, speed strictly inside the band, and
/// distance to the ball above `min_distance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundRule {
    pub trick: TrickKind,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_distance: f32,
}

impl GroundRule {
    pub fn new(trick: TrickKind, min_speed: f32, max_speed: f32, min_distance: f32) -> Self {
        Self { trick, min_speed, max_speed, min_distance }
    }

    pub fn matches(&self, speed: f32, distance: f32, grounded: bool) -> bool {
        grounded && self.min_speed < speed && speed < self.max_speed && distance > self.min_distance
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Checked in order; first match wins.
    pub rules: Vec<GroundRule>,

    // === Target prediction ===
    /// Drive at a predicted ball position beyond this distance (기본: 1200)
    pub predict_beyond_distance: f32,
    /// Distance per second of target lookahead (기본: 1000)
    pub predict_distance_scale: f32,
    /// Target lookahead cap in seconds (기본: 2.0)
    pub predict_max_lookahead: f32,

    // === Boost while driving ===
    /// Boost only beyond this distance (기본: 1500)
    pub boost_min_distance: f32,
    /// Boost only with more reserve than this (기본: 20)
    pub boost_min_reserve: f32,
    /// Boost only below this speed (기본: 2200)
    pub boost_max_speed: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                // Standstill launch (kickoff-like)
                GroundRule::new(TrickKind::SpeedFlip, 0.0, 200.0, 1500.0),
                GroundRule::new(TrickKind::DiagonalFlip, 900.0, 1100.0, 800.0),
                GroundRule::new(TrickKind::SpeedFlip, 1200.0, 1400.0, 1000.0),
            ],

            predict_beyond_distance: 1200.0,
            predict_distance_scale: 1000.0,
            predict_max_lookahead: 2.0,

            boost_min_distance: 1500.0,
            boost_min_reserve: 20.0,
            boost_max_speed: 2200.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Steer per radian of heading error before clamping (기본: 5.0)
    pub steer_gain: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self { steer_gain: 5.0 }
    }
}
