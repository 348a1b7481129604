//! Side-channel output (quick chat + debug draws)
//!
//! Fire-and-forget hooks the controller calls at fixed points: once when a
//! new sequence starts, once per decision tick for the debug overlay. Nothing
//! written here feeds back into decisions.

use super::types::Vec3;
use serde::{Deserialize, Serialize};

/// Fixed quick-chat catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickChat {
    Calculated,
    Siiiick,
    Wow,
    NoProblem,
    Omg,
    IGotIt,
}

impl QuickChat {
    pub fn text(self) -> &'static str {
        match self {
            QuickChat::Calculated => "Calculated.",
            QuickChat::Siiiick => "Siiiick!",
            QuickChat::Wow => "Wow!",
            QuickChat::NoProblem => "No problem.",
            QuickChat::Omg => "OMG!",
            QuickChat::IGotIt => "I got it!",
        }
    }
}

/// Per-tick overlay data.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugFrame {
    pub car_location: Vec3,
    pub ball_location: Vec3,
    pub speed: f32,
    pub boost: f32,
    pub distance: f32,
    pub tricks_performed: u32,
    /// Rough seconds to reach the ball at current speed.
    pub time_to_reach: f32,
    /// Whether the boost reserve covers the distance by the boost heuristic.
    pub boost_covers_distance: bool,
    pub facing_ball: bool,
}

impl DebugFrame {
    pub fn info_text(&self) -> String {
        format!(
            "Speed: {:.0} | Boost: {:.0} | Tricks: {}",
            self.speed, self.boost, self.tricks_performed
        )
    }

    pub fn distance_label(&self) -> String {
        format!("{:.0}u", self.distance)
    }

    /// Where the distance label sits: halfway along the car-to-ball line.
    pub fn midpoint(&self) -> Vec3 {
        self.car_location + (self.ball_location - self.car_location) * 0.5
    }
}

/// Sink for side-channel output.
pub trait OutputChannel: Send {
    fn quick_chat(&mut self, chat: QuickChat);

    fn draw(&mut self, frame: &DebugFrame);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopChannel;

impl OutputChannel for NoopChannel {
    fn quick_chat(&mut self, _chat: QuickChat) {}

    fn draw(&mut self, _frame: &DebugFrame) {}
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    pub chats: Vec<QuickChat>,
    pub frames: Vec<DebugFrame>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_frame(&self) -> Option<&DebugFrame> {
        self.frames.last()
    }

    pub fn clear(&mut self) {
        self.chats.clear();
        self.frames.clear();
    }
}

impl OutputChannel for RecordingChannel {
    fn quick_chat(&mut self, chat: QuickChat) {
        self.chats.push(chat);
    }

    fn draw(&mut self, frame: &DebugFrame) {
        self.frames.push(frame.clone());
    }
}
