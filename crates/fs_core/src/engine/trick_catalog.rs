//! Trick Catalog
//!
//! Hand-tuned control templates for every behavior the controller can start.
//! The values are tuned against the game's physics and are kept verbatim;
//! they are data, not something the engine derives.
//!
//! Override files (JSON or YAML) only need the tricks they change; missing
//! entries keep the standard template. An override without `quick_chat`
//! keeps the standard chat line for that trick.
//!
//! A full catalog document (what [`TrickCatalog::to_yaml_string`] writes) is
//! validated on deserialization, so every `TrickCatalog` value in hand has a
//! non-empty template for every trick.

use super::controls::ControlOutput;
use super::sequence::{ControlStep, TimedSequence};
use super::side_channel::QuickChat;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrickKind {
    Tornado,
    KuxirTwist,
    AirRollShot,
    CeilingShuffle,
    SpinningAerial,
    BasicAerial,
    Psycho,
    MustyFlick,
    FlipReset,
    DiagonalFlip,
    SpeedFlip,
}

impl TrickKind {
    pub const ALL: [TrickKind; 11] = [
        TrickKind::Tornado,
        TrickKind::KuxirTwist,
        TrickKind::AirRollShot,
        TrickKind::CeilingShuffle,
        TrickKind::SpinningAerial,
        TrickKind::BasicAerial,
        TrickKind::Psycho,
        TrickKind::MustyFlick,
        TrickKind::FlipReset,
        TrickKind::DiagonalFlip,
        TrickKind::SpeedFlip,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TrickKind::Tornado => "tornado",
            TrickKind::KuxirTwist => "kuxir_twist",
            TrickKind::AirRollShot => "air_roll_shot",
            TrickKind::CeilingShuffle => "ceiling_shuffle",
            TrickKind::SpinningAerial => "spinning_aerial",
            TrickKind::BasicAerial => "basic_aerial",
            TrickKind::Psycho => "psycho",
            TrickKind::MustyFlick => "musty_flick",
            TrickKind::FlipReset => "flip_reset",
            TrickKind::DiagonalFlip => "diagonal_flip",
            TrickKind::SpeedFlip => "speed_flip",
        }
    }

    /// Ground tricks start from the controller's ground rules, not aerial selection.
    pub fn is_ground(self) -> bool {
        matches!(self, TrickKind::DiagonalFlip | TrickKind::SpeedFlip)
    }
}

impl fmt::Display for TrickKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrickKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        TrickKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::invalid("trick", format!("unknown trick '{}'", s)))
    }
}

/// Steps plus the chat line announced when the trick starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrickTemplate {
    #[serde(default)]
    pub quick_chat: Option<QuickChat>,
    pub steps: Vec<ControlStep>,
}

impl TrickTemplate {
    pub fn total_duration(&self) -> f32 {
        self.steps.iter().map(|s| s.duration).sum()
    }
}

type TemplateMap = BTreeMap<TrickKind, TrickTemplate>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TemplateMap", into = "TemplateMap")]
pub struct TrickCatalog {
    templates: TemplateMap,
}

impl TryFrom<TemplateMap> for TrickCatalog {
    type Error = ConfigError;

    fn try_from(templates: TemplateMap) -> Result<Self> {
        let catalog = Self { templates };
        catalog.validate()?;
        Ok(catalog)
    }
}

impl From<TrickCatalog> for TemplateMap {
    fn from(catalog: TrickCatalog) -> Self {
        catalog.templates
    }
}

impl Default for TrickCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl TrickCatalog {
    /// The tuned templates shipped with the bot.
    pub fn standard() -> Self {
        let templates = TrickKind::ALL
            .into_iter()
            .map(|kind| {
                let template = TrickTemplate {
                    quick_chat: standard_chat(kind),
                    steps: standard_steps(kind),
                };
                (kind, template)
            })
            .collect();
        Self { templates }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let overrides: TemplateMap = serde_json::from_str(json)?;
        Self::standard().with_overrides(overrides)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let overrides: TemplateMap = serde_yaml::from_str(yaml)?;
        Self::standard().with_overrides(overrides)
    }

    /// Load an override file; the format follows the extension.
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

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn with_overrides(mut self, overrides: TemplateMap) -> Result<Self> {
        for (kind, mut template) in overrides {
            tracing::debug!(trick = %kind, steps = template.steps.len(), "trick template override");
            if template.quick_chat.is_none() {
                template.quick_chat = self.quick_chat(kind);
            }
            self.templates.insert(kind, template);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        for kind in TrickKind::ALL {
            let template = self
                .templates
                .get(&kind)
                .ok_or_else(|| ConfigError::invalid(kind.name(), "missing template"))?;
            if template.steps.is_empty() {
                return Err(ConfigError::invalid(kind.name(), "template has no steps"));
            }
            for (i, step) in template.steps.iter().enumerate() {
                if !step.duration.is_finite() || step.duration < 0.0 {
                    return Err(ConfigError::invalid(
                        format!("{}.steps[{}].duration", kind, i),
                        format!("must be a finite non-negative number, got {}", step.duration),
                    ));
                }
                if !step.controls.is_within_range() {
                    return Err(ConfigError::invalid(
                        format!("{}.steps[{}].controls", kind, i),
                        "analog values must lie in [-1, 1]",
                    ));
                }
            }
            if template.total_duration() <= 0.0 {
                return Err(ConfigError::invalid(kind.name(), "total duration must be positive"));
            }
        }
        Ok(())
    }

    pub fn template(&self, kind: TrickKind) -> Option<&TrickTemplate> {
        self.templates.get(&kind)
    }

    pub fn steps(&self, kind: TrickKind) -> &[ControlStep] {
        self.templates.get(&kind).map(|t| t.steps.as_slice()).unwrap_or(&[])
    }

    pub fn quick_chat(&self, kind: TrickKind) -> Option<QuickChat> {
        self.templates.get(&kind).and_then(|t| t.quick_chat)
    }

    /// Fresh pending sequence for `kind`.
    pub fn sequence_for(&self, kind: TrickKind) -> TimedSequence {
        TimedSequence::new(self.steps(kind).to_vec())
    }
}

fn standard_chat(kind: TrickKind) -> Option<QuickChat> {
    match kind {
        TrickKind::Tornado | TrickKind::FlipReset => Some(QuickChat::Calculated),
        TrickKind::KuxirTwist | TrickKind::Psycho | TrickKind::SpeedFlip => {
            Some(QuickChat::Siiiick)
        }
        TrickKind::AirRollShot | TrickKind::MustyFlick => Some(QuickChat::Wow),
        TrickKind::CeilingShuffle => Some(QuickChat::NoProblem),
        TrickKind::SpinningAerial => Some(QuickChat::Omg),
        TrickKind::BasicAerial => Some(QuickChat::IGotIt),
        TrickKind::DiagonalFlip => None,
    }
}

// ============================================================================
// Standard templates
// ============================================================================

fn c() -> ControlOutput {
    ControlOutput::neutral()
}

/// Boost held.
fn b() -> ControlOutput {
    c().with_boost(true)
}

/// Jump + boost held.
fn jb() -> ControlOutput {
    b().with_jump(true)
}

fn step(duration: f32, controls: ControlOutput) -> ControlStep {
    ControlStep::new(duration, controls)
}

/// First jump, release, second jump with `pitch`. Shared by most aerials.
fn double_jump(pitch: f32) -> [ControlStep; 3] {
    [step(0.1, jb()), step(0.05, b()), step(0.1, jb().with_pitch(pitch))]
}

fn standard_steps(kind: TrickKind) -> Vec<ControlStep> {
    match kind {
        TrickKind::Tornado => {
            let mut steps = double_jump(-0.4).to_vec();
            steps.extend([
                step(0.15, b().with_pitch(-0.3).with_roll(1.0).with_yaw(1.0)),
                step(0.15, b().with_pitch(-0.2).with_roll(1.0).with_yaw(-1.0)),
                step(0.15, b().with_pitch(-0.3).with_roll(1.0).with_yaw(1.0)),
                step(0.15, b().with_pitch(-0.2).with_roll(1.0).with_yaw(-1.0)),
                step(0.2, b().with_pitch(-0.9).with_roll(0.5)),
                step(0.4, c().with_pitch(1.0)),
            ]);
            steps
        }
        TrickKind::KuxirTwist => {
            let mut steps = double_jump(1.0).to_vec();
            steps.extend([
                step(0.2, b().with_pitch(0.5).with_roll(-1.0).with_yaw(0.8)),
                step(0.2, b().with_pitch(0.3).with_roll(-1.0).with_yaw(-0.8)),
                step(0.2, b().with_pitch(0.5).with_roll(-1.0).with_yaw(0.8)),
                step(0.2, b().with_pitch(-0.5).with_roll(0.5)),
                step(0.4, c().with_pitch(1.0)),
            ]);
            steps
        }
        TrickKind::AirRollShot => {
            let mut steps = double_jump(-0.5).to_vec();
            steps.extend([
                step(0.25, b().with_pitch(-0.4).with_roll(1.0)),
                step(0.25, b().with_pitch(-0.4).with_roll(1.0)),
                step(0.25, b().with_pitch(-0.5).with_roll(1.0)),
                step(0.15, b().with_pitch(-1.0)),
                step(0.4, c().with_pitch(1.0)),
            ]);
            steps
        }
        TrickKind::CeilingShuffle => vec![
            step(0.1, jb()),
            step(0.05, b()),
            step(0.15, jb().with_pitch(0.5).with_roll(-1.0)),
            step(0.15, b().with_pitch(-0.2).with_roll(1.0).with_yaw(0.5)),
            step(0.15, b().with_pitch(-0.2).with_roll(-1.0).with_yaw(-0.5)),
            step(0.15, b().with_pitch(-0.3).with_roll(1.0).with_yaw(0.5)),
            step(0.15, b().with_pitch(-0.3).with_roll(-1.0).with_yaw(-0.5)),
            step(0.2, b().with_pitch(-0.8)),
            step(0.4, c().with_pitch(1.0)),
        ],
        TrickKind::SpinningAerial => {
            let mut steps = double_jump(-0.4).to_vec();
            steps.extend([
                step(0.3, b().with_pitch(-0.3).with_roll(-1.0)),
                step(0.3, b().with_pitch(-0.4).with_roll(-1.0)),
                step(0.2, b().with_pitch(-0.8)),
                step(0.4, c().with_pitch(1.0)),
            ]);
            steps
        }
        TrickKind::BasicAerial => {
            let mut steps = double_jump(-0.5).to_vec();
            steps.extend([
                step(0.2, b().with_pitch(-0.4).with_roll(-1.0).with_yaw(0.3)),
                step(0.2, b().with_pitch(-0.5).with_roll(1.0).with_yaw(-0.3)),
                step(0.25, b().with_pitch(-0.7)),
                step(0.4, c().with_pitch(1.0)),
            ]);
            steps
        }
        TrickKind::Psycho => vec![
            step(0.1, jb().with_pitch(0.3)),
            step(0.05, b()),
            step(0.1, jb().with_pitch(0.8)),
            step(0.2, b().with_pitch(0.6).with_roll(1.0).with_yaw(0.5)),
            step(0.2, b().with_pitch(0.4).with_roll(1.0).with_yaw(-0.5)),
            step(0.2, b().with_pitch(0.5).with_roll(1.0).with_yaw(0.5)),
            step(0.2, b().with_pitch(0.3).with_roll(1.0).with_yaw(-0.5)),
            step(0.15, b().with_pitch(-0.5).with_roll(1.0)),
            step(0.15, b().with_pitch(-0.8).with_roll(0.5)),
            step(0.5, c().with_pitch(1.0)),
        ],
        TrickKind::MustyFlick => {
            let mut steps = double_jump(-0.3).to_vec();
            steps.extend([
                step(0.15, b().with_pitch(0.6)),
                step(0.15, b().with_pitch(0.8)),
                step(0.15, b().with_pitch(1.0)),
                // Backflip with the ball resting on the roof; boost released.
                step(0.1, c().with_jump(true).with_pitch(1.0)),
                step(0.2, c().with_pitch(1.0)),
                step(0.5, c().with_pitch(-1.0)),
                step(0.3, c().with_pitch(1.0)),
            ]);
            steps
        }
        TrickKind::FlipReset => {
            let mut steps = double_jump(-0.4).to_vec();
            steps.extend([
                step(0.2, b().with_pitch(-0.3)),
                step(0.15, b().with_pitch(0.6).with_roll(0.3)),
                step(0.15, b().with_pitch(0.8).with_roll(-0.3)),
                // Wheels onto the ball to regain the flip.
                step(0.15, b().with_pitch(0.9)),
                step(0.1, b().with_pitch(-0.3)),
                step(0.05, jb()),
                step(0.2, jb().with_pitch(-1.0).with_yaw(0.4)),
                step(0.5, c().with_pitch(1.0)),
            ]);
            steps
        }
        TrickKind::DiagonalFlip => vec![
            step(0.05, c().with_jump(true)),
            step(0.05, c()),
            step(0.2, c().with_jump(true).with_pitch(-1.0).with_yaw(0.4)),
            step(0.8, c()),
        ],
        TrickKind::SpeedFlip => vec![
            step(0.05, jb().with_pitch(0.2)),
            step(0.05, b()),
            step(0.12, jb().with_pitch(-1.0).with_yaw(-0.25)),
            // Flip cancel: pull back and air roll to land on the wheels.
            step(0.18, b().with_pitch(1.0).with_yaw(-0.15).with_roll(-0.4)),
            step(0.15, b().with_pitch(0.3).with_roll(-0.5)),
            step(0.3, b().with_throttle(1.0)),
        ],
    }
}
