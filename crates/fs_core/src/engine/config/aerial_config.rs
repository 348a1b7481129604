//! Aerial decision thresholds

use serde::{Deserialize, Serialize};

/// Gates and lookahead for the aerial path. Comparisons are strict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AerialConfig {
    /// Master switch for the aerial path (기본: true)
    pub enabled: bool,

    // === Eligibility ===
    /// Ball must be above this height (기본: 350)
    pub min_ball_height: f32,
    /// Horizontal distance must be above this (기본: 400)
    pub min_distance: f32,
    /// Horizontal distance must be below this (기본: 2200)
    pub max_distance: f32,
    /// Boost must be above this (기본: 35)
    pub min_boost: f32,
    /// Seconds since the last aerial must exceed this (기본: 3.0)
    pub cooldown: f32,

    // === Lookahead ===
    /// Lookahead floor in seconds (기본: 0.5)
    pub base_lookahead: f32,
    /// Distance per extra second of lookahead (기본: 1500)
    pub lookahead_distance_scale: f32,
    /// Lookahead cap in seconds (기본: 2.5)
    pub max_lookahead: f32,
    /// Predicted target must be above this height (기본: 400)
    pub min_target_height: f32,

    // === Heuristics ===
    /// Rough boost cost per 100 units of air travel (기본: 10). Not a physical law.
    pub boost_per_100_units: f32,
    /// Cone half-angle in radians for "facing the target" (기본: 0.5)
    pub facing_max_angle: f32,
}

impl Default for AerialConfig {
    fn default() -> Self {
        Self {
            enabled: true,

            min_ball_height: 350.0,
            min_distance: 400.0,
            max_distance: 2200.0,
            min_boost: 35.0,
            cooldown: 3.0,

            base_lookahead: 0.5,
            lookahead_distance_scale: 1500.0,
            max_lookahead: 2.5,
            min_target_height: 400.0,

            boost_per_100_units: 10.0,
            facing_max_angle: 0.5,
        }
    }
}
