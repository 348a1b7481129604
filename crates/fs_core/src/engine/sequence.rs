//! Timed Control Sequence
//!
//! An open-loop plan of `(duration, controls)` steps played back against the
//! game clock. The first `advance` latches the start time; every later call
//! derives the elapsed time from the clock it is given and moves the cursor
//! forward past every step whose cumulative end time has been reached.
//!
//! ```text
//! Pending --advance--> Active --elapsed >= total--> Done (terminal)
//! ```
//!
//! Precondition: the clock passed to `advance` must be monotonic for a given
//! sequence instance. An earlier clock never moves the cursor back.

use super::controls::ControlOutput;
use serde::{Deserialize, Serialize};

/// One step of a sequence: hold `controls` for `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlStep {
    pub duration: f32,
    #[serde(default)]
    pub controls: ControlOutput,
}

impl ControlStep {
    pub const fn new(duration: f32, controls: ControlOutput) -> Self {
        Self { duration, controls }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    /// Built, never advanced.
    Pending,
    /// Elapsed time is inside the planned duration.
    Active,
    /// Plan exhausted. Never leaves this state.
    Done,
}

#[derive(Debug, Clone)]
pub struct TimedSequence {
    steps: Vec<ControlStep>,
    /// Cumulative end time of each step, relative to the start.
    step_ends: Vec<f32>,
    start_time: Option<f32>,
    elapsed: f32,
    cursor: usize,
    done: bool,
}

impl TimedSequence {
    /// Build a pending sequence. Negative or non-finite durations count as zero.
    pub fn new(steps: Vec<ControlStep>) -> Self {
        let mut total = 0.0_f32;
        let step_ends = steps
            .iter()
            .map(|step| {
                if step.duration.is_finite() && step.duration > 0.0 {
                    total += step.duration;
                }
                total
            })
            .collect();

        Self { steps, step_ends, start_time: None, elapsed: 0.0, cursor: 0, done: false }
    }

    /// Build a sequence whose clock origin is already fixed.
    pub fn started_at(steps: Vec<ControlStep>, start_time: f32) -> Self {
        let mut sequence = Self::new(steps);
        sequence.start_time = Some(start_time);
        sequence
    }

    /// Tick the sequence with the current game clock.
    ///
    /// Returns the controls of the active step, or `None` once the elapsed
    /// time reaches the total planned duration. `None` is sticky.
    pub fn advance(&mut self, now: f32) -> Option<ControlOutput> {
        if self.done {
            return None;
        }

        let start = *self.start_time.get_or_insert(now);
        self.elapsed = now - start;
        if self.elapsed.is_nan() {
            // A broken clock ends the plan rather than replaying a step forever.
            self.cursor = self.steps.len();
        }

        while self.cursor < self.step_ends.len() && self.step_ends[self.cursor] <= self.elapsed {
            self.cursor += 1;
        }

        match self.steps.get(self.cursor) {
            Some(step) => Some(step.controls),
            None => {
                self.done = true;
                None
            }
        }
    }

    /// Step that would be active at `elapsed` seconds after the start,
    /// independent of the cursor. `None` past the end of the plan.
    pub fn step_index_at(&self, elapsed: f32) -> Option<usize> {
        let idx = self.step_ends.partition_point(|&end| end <= elapsed);
        (idx < self.steps.len()).then_some(idx)
    }

    pub fn state(&self) -> SequenceState {
        if self.done {
            SequenceState::Done
        } else if self.start_time.is_none() {
            SequenceState::Pending
        } else {
            SequenceState::Active
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Index of the step returned by the last `advance`, if still running.
    pub fn active_index(&self) -> Option<usize> {
        match self.state() {
            SequenceState::Active => Some(self.cursor),
            _ => None,
        }
    }

    pub fn total_duration(&self) -> f32 {
        self.step_ends.last().copied().unwrap_or(0.0)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn remaining(&self) -> f32 {
        (self.total_duration() - self.elapsed).max(0.0)
    }

    pub fn start_time(&self) -> Option<f32> {
        self.start_time
    }

    pub fn steps(&self) -> &[ControlStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
