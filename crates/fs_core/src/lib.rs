//! # fs_core - Freestyle Decision and Control Engine
//!
//! Decision-and-control core for an autonomous car-and-ball game agent.
//! Each tick the [`FreestyleController`] either keeps playing back the
//! active timed control sequence or picks a new behavior ("trick") from the
//! current snapshot and ball prediction.
//!
//! ## Features
//! - Time-based control sequence playback (open loop, deterministic)
//! - O(log n) ball prediction lookup
//! - Tiered, no-immediate-repeat trick selection (seedable RNG)
//! - Tuning constants and trick templates loadable from JSON/YAML

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]

pub mod engine;
pub mod error;

pub use engine::ball_prediction::{sample_at, BallPrediction, PredictedSlice};
pub use engine::config::{AerialConfig, ControllerConfig, GroundConfig, SteeringConfig, TrickTiers};
pub use engine::controller::{ControllerPhase, DecisionState, FreestyleController};
pub use engine::controls::ControlOutput;
pub use engine::sequence::{ControlStep, SequenceState, TimedSequence};
pub use engine::side_channel::{DebugFrame, NoopChannel, OutputChannel, QuickChat, RecordingChannel};
pub use engine::trick_catalog::{TrickCatalog, TrickKind};
pub use engine::types::{BallState, CarState, Physics, Rotator, TickPacket, Vec3};
pub use error::{ConfigError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
