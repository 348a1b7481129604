//! Freestyle engine
//!
//! Leaves first:
//! - `ball_prediction`: predicted ball slices and the time lookup
//! - `sequence`: timed control sequence playback
//! - `trick_catalog` / `trick_selection`: behavior templates and choice
//! - `aerial` / `steering`: geometry helpers used by the decision logic
//! - `controller`: the per-tick decision controller

pub mod aerial;
pub mod ball_prediction;
pub mod config;
pub mod controller;
pub mod controls;
pub mod sequence;
pub mod side_channel;
pub mod steering;
pub mod trick_catalog;
pub mod trick_selection;
pub mod types;

pub use ball_prediction::{sample_at, BallPrediction, PredictedSlice};
pub use controller::{ControllerPhase, DecisionState, FreestyleController};
pub use controls::ControlOutput;
pub use sequence::{ControlStep, SequenceState, TimedSequence};
pub use trick_catalog::{TrickCatalog, TrickKind};
