//! Aerial trick tiers

use crate::engine::trick_catalog::TrickKind;
use serde::{Deserialize, Serialize};

/// Tricks unlocked when boost is strictly above `boost_above`.
/// `None` means always unlocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrickTier {
    #[serde(default)]
    pub boost_above: Option<f32>,
    pub tricks: Vec<TrickKind>,
}

impl TrickTier {
    pub fn is_unlocked(&self, boost: f32) -> bool {
        self.boost_above.map_or(true, |threshold| boost > threshold)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrickTiers {
    pub tiers: Vec<TrickTier>,
}

impl Default for TrickTiers {
    fn default() -> Self {
        Self {
            tiers: vec![
                TrickTier {
                    boost_above: Some(60.0),
                    tricks: vec![
                        TrickKind::Tornado,
                        TrickKind::CeilingShuffle,
                        TrickKind::KuxirTwist,
                        TrickKind::FlipReset,
                        TrickKind::Psycho,
                    ],
                },
                TrickTier {
                    boost_above: Some(40.0),
                    tricks: vec![
                        TrickKind::AirRollShot,
                        TrickKind::MustyFlick,
                        TrickKind::FlipReset,
                    ],
                },
                TrickTier {
                    boost_above: None,
                    tricks: vec![TrickKind::BasicAerial, TrickKind::SpinningAerial],
                },
            ],
        }
    }
}
