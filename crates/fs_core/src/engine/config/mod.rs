//! # Controller Configuration
//!
//! 모든 튜닝 상수를 중앙에서 관리하는 설정 시스템.
//!
//! Every threshold the controller compares against lives here, with
//! defaults equal to the tuned values the bot ships with. Configs load from
//! JSON or YAML; missing fields keep their defaults.
//!
//! ## Usage
//! ```rust
//! use fs_core::engine::config::ControllerConfig;
//!
//! let config = ControllerConfig::default();
//! let testing = ControllerConfig::testing();
//! assert_eq!(testing.seed, Some(0));
//! ```
//!
//! ## Environment Variables
//!
//! - `FS_CONTROLLER_PROFILE`: Select preset (default, testing, ground_only)

mod aerial_config;
mod ground_config;
mod trick_config;

pub use aerial_config::AerialConfig;
pub use ground_config::{GroundConfig, GroundRule, SteeringConfig};
pub use trick_config::{TrickTier, TrickTiers};

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const PROFILE_ENV_VAR: &str = "FS_CONTROLLER_PROFILE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ControllerConfig {
    pub aerial: AerialConfig,
    pub tricks: TrickTiers,
    pub ground: GroundConfig,
    pub steering: SteeringConfig,
    /// RNG seed for trick selection. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl ControllerConfig {
    /// Fixed seed, everything else default.
    pub fn testing() -> Self {
        Self { seed: Some(0), ..Self::default() }
    }

    /// Aerial path switched off; only ground tricks and driving.
    pub fn ground_only() -> Self {
        let mut cfg = Self::default();
        cfg.aerial.enabled = false;
        cfg
    }

    pub fn from_profile(profile: &str) -> Option<Self> {
        match profile.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "testing" => Some(Self::testing()),
            "ground_only" => Some(Self::ground_only()),
            _ => None,
        }
    }

    /// Preset named by `FS_CONTROLLER_PROFILE`, or the default.
    pub fn from_env_or_default() -> Self {
        match env::var(PROFILE_ENV_VAR) {
            Ok(profile) => Self::from_profile(&profile).unwrap_or_else(|| {
                tracing::warn!(%profile, "unknown controller profile, using default");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a config file; the format follows the extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Err(ConfigError::UnsupportedFormat { path: path.display().to_string() }),
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let a = &self.aerial;
        for (field, value) in [
            ("aerial.min_ball_height", a.min_ball_height),
            ("aerial.min_distance", a.min_distance),
            ("aerial.min_boost", a.min_boost),
            ("aerial.cooldown", a.cooldown),
            ("aerial.base_lookahead", a.base_lookahead),
            ("aerial.boost_per_100_units", a.boost_per_100_units),
            ("aerial.facing_max_angle", a.facing_max_angle),
            ("ground.predict_max_lookahead", self.ground.predict_max_lookahead),
            ("ground.boost_min_reserve", self.ground.boost_min_reserve),
        ] {
            non_negative(field, value)?;
        }
        if a.max_distance <= a.min_distance {
            return Err(ConfigError::invalid(
                "aerial.max_distance",
                format!("must exceed min_distance ({})", a.min_distance),
            ));
        }
        if a.max_lookahead < a.base_lookahead {
            return Err(ConfigError::invalid(
                "aerial.max_lookahead",
                format!("must be at least base_lookahead ({})", a.base_lookahead),
            ));
        }
        positive("aerial.lookahead_distance_scale", a.lookahead_distance_scale)?;
        positive("ground.predict_distance_scale", self.ground.predict_distance_scale)?;

        for (i, rule) in self.ground.rules.iter().enumerate() {
            if rule.min_speed.is_nan()
                || rule.max_speed.is_nan()
                || rule.min_speed >= rule.max_speed
            {
                return Err(ConfigError::invalid(
                    format!("ground.rules[{}]", i),
                    format!("empty speed band {}..{}", rule.min_speed, rule.max_speed),
                ));
            }
        }
        for (i, tier) in self.tricks.tiers.iter().enumerate() {
            if let Some(threshold) = tier.boost_above {
                non_negative(&format!("tricks.tiers[{}].boost_above", i), threshold)?;
            }
        }
        if !self.steering.steer_gain.is_finite() {
            return Err(ConfigError::invalid("steering.steer_gain", "must be finite"));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be a finite non-negative number, got {}", value),
        ))
    }
}

fn positive(field: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {}", value)))
    }
}

// ========== Tests ==========
