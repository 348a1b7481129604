//! Decision Controller
//!
//! Owns at most one active [`TimedSequence`]. Each tick it either plays the
//! active sequence back untouched or, once that sequence is done, decides
//! what to do next:
//!
//! 1. aerial: eligibility gates → predicted intercept → tiered random trick
//! 2. ground tricks: first matching speed/distance rule
//! 3. direct driving: full throttle, proportional steer, boost when far
//!
//! ```text
//! Idle --trigger--> Executing --sequence done--> Idle
//! ```
//!
//! A running sequence cannot be interrupted from here. Starting a new one
//! replaces the slot outright; the old plan is dropped, never resumed.
//! One controller per car; nothing is shared between instances.

use super::aerial::{
    aerial_rejection, find_aerial_target, has_boost_for_distance, is_facing_target, time_to_reach,
    AerialInputs,
};
use super::ball_prediction::BallPrediction;
use super::config::ControllerConfig;
use super::controls::ControlOutput;
use super::sequence::TimedSequence;
use super::side_channel::{DebugFrame, NoopChannel, OutputChannel};
use super::steering::steer_toward_target;
use super::trick_catalog::{TrickCatalog, TrickKind};
use super::trick_selection::{candidate_pool, choose_trick};
use super::types::{CarState, TickPacket, Vec3};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Executing,
}

/// Bookkeeping that survives across ticks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecisionState {
    /// Game time the last aerial was committed to.
    pub last_aerial_time: f32,
    /// Aerial tricks started over the controller's lifetime.
    pub tricks_performed: u32,
    /// Last aerial trick picked; excluded from the next pick.
    pub last_trick: Option<TrickKind>,
}

#[derive(Debug, Clone)]
struct ActiveTrick {
    kind: TrickKind,
    sequence: TimedSequence,
}

pub struct FreestyleController<C: OutputChannel = NoopChannel> {
    car_index: usize,
    config: ControllerConfig,
    catalog: TrickCatalog,
    rng: ChaCha8Rng,
    channel: C,
    active: Option<ActiveTrick>,
    state: DecisionState,
}

fn rng_from_seed(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

impl FreestyleController<NoopChannel> {
    pub fn new(car_index: usize, config: ControllerConfig) -> Self {
        let rng = rng_from_seed(config.seed);
        Self {
            car_index,
            config,
            catalog: TrickCatalog::standard(),
            rng,
            channel: NoopChannel,
            active: None,
            state: DecisionState::default(),
        }
    }
}

impl<C: OutputChannel> FreestyleController<C> {
    /// Swap the side channel (quick chat + overlay sink).
    pub fn with_channel<D: OutputChannel>(self, channel: D) -> FreestyleController<D> {
        FreestyleController {
            car_index: self.car_index,
            config: self.config,
            catalog: self.catalog,
            rng: self.rng,
            channel,
            active: self.active,
            state: self.state,
        }
    }

    pub fn with_catalog(mut self, catalog: TrickCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(mut self, rng: ChaCha8Rng) -> Self {
        self.rng = rng;
        self
    }

    /// One decision tick. Always produces a control output.
    pub fn update(&mut self, packet: &TickPacket, prediction: &BallPrediction) -> ControlOutput {
        let now = packet.seconds_elapsed;

        if let Some(active) = self.active.as_mut() {
            if !active.sequence.is_done() {
                if let Some(controls) = active.sequence.advance(now) {
                    trace!(
                        trick = %active.kind,
                        step = ?active.sequence.active_index(),
                        "sequence tick"
                    );
                    return controls;
                }
                debug!(
                    trick = %active.kind,
                    elapsed = active.sequence.elapsed(),
                    "sequence finished"
                );
            }
        }

        let Some(car) = packet.car(self.car_index).copied() else {
            warn!(car_index = self.car_index, cars = packet.cars.len(), "car missing from packet");
            return ControlOutput::neutral();
        };

        let ball_location = packet.ball.physics.location;
        let distance = (ball_location - car.physics.location).norm();
        let speed = car.physics.speed();

        self.draw_debug(&car, &ball_location, speed, distance);

        // === Aerial ===
        let inputs = AerialInputs::gather(&car, packet, self.state.last_aerial_time);
        let aerial = &self.config.aerial;
        match aerial_rejection(&inputs, aerial) {
            None => match find_aerial_target(prediction, now, inputs.distance, aerial) {
                Some(target) => {
                    self.state.last_aerial_time = now;
                    if let Some(controls) = self.start_aerial(car.boost, target, now) {
                        return controls;
                    }
                }
                None => debug!(distance = inputs.distance, "no aerial target in prediction"),
            },
            Some(reason) => trace!(?reason, "aerial skipped"),
        }

        // === Ground ===
        self.ground_game(&car, &ball_location, prediction, now, distance, speed)
    }

    fn start_aerial(&mut self, boost: f32, target: Vec3, now: f32) -> Option<ControlOutput> {
        let pool = candidate_pool(boost, &self.config.tricks);
        let Some(kind) = choose_trick(&pool, self.state.last_trick, &mut self.rng) else {
            debug!(boost, "no aerial trick unlocked");
            return None;
        };

        let first = self.start_sequence(kind, now);
        self.state.last_trick = Some(kind);
        self.state.tricks_performed += 1;
        info!(
            trick = %kind,
            boost,
            intercept = ?target,
            tricks = self.state.tricks_performed,
            "aerial trick started"
        );
        Some(first)
    }

    fn ground_game(
        &mut self,
        car: &CarState,
        ball_location: &Vec3,
        prediction: &BallPrediction,
        now: f32,
        distance: f32,
        speed: f32,
    ) -> ControlOutput {
        let ground = &self.config.ground;

        let mut target = *ball_location;
        if distance > ground.predict_beyond_distance {
            let lookahead =
                (distance / ground.predict_distance_scale).min(ground.predict_max_lookahead);
            if let Some(slice) = prediction.sample_at(now + lookahead) {
                target = slice.location;
            }
        }

        let rule_trick = ground
            .rules
            .iter()
            .find(|rule| rule.matches(speed, distance, car.has_wheel_contact))
            .map(|rule| rule.trick);
        if let Some(kind) = rule_trick {
            debug!(trick = %kind, speed, distance, "ground trick started");
            return self.start_sequence(kind, now);
        }

        let boost = distance > ground.boost_min_distance
            && car.boost > ground.boost_min_reserve
            && speed < ground.boost_max_speed;

        ControlOutput::neutral()
            .with_throttle(1.0)
            .with_steer(steer_toward_target(car, &target, self.config.steering.steer_gain))
            .with_boost(boost)
    }

    /// Replace the active slot with a fresh `kind` sequence and return its
    /// first output.
    fn start_sequence(&mut self, kind: TrickKind, now: f32) -> ControlOutput {
        if let Some(chat) = self.catalog.quick_chat(kind) {
            self.channel.quick_chat(chat);
        }

        let mut sequence = self.catalog.sequence_for(kind);
        let first = sequence.advance(now).unwrap_or_default();
        self.active = Some(ActiveTrick { kind, sequence });
        first
    }

    fn draw_debug(&mut self, car: &CarState, ball_location: &Vec3, speed: f32, distance: f32) {
        let aerial = &self.config.aerial;
        let frame = DebugFrame {
            car_location: car.physics.location,
            ball_location: *ball_location,
            speed,
            boost: car.boost,
            distance,
            tricks_performed: self.state.tricks_performed,
            time_to_reach: time_to_reach(
                &car.physics.location,
                ball_location,
                &car.physics.velocity,
            ),
            boost_covers_distance: has_boost_for_distance(
                distance,
                car.boost,
                aerial.boost_per_100_units,
            ),
            facing_ball: is_facing_target(car, ball_location, aerial.facing_max_angle),
        };
        self.channel.draw(&frame);
    }

    /// Drop the active sequence and all decision bookkeeping.
    pub fn reset(&mut self) {
        self.active = None;
        self.state = DecisionState::default();
    }

    pub fn phase(&self) -> ControllerPhase {
        match &self.active {
            Some(active) if !active.sequence.is_done() => ControllerPhase::Executing,
            _ => ControllerPhase::Idle,
        }
    }

    pub fn active_trick(&self) -> Option<TrickKind> {
        self.active.as_ref().filter(|a| !a.sequence.is_done()).map(|a| a.kind)
    }

    pub fn active_sequence(&self) -> Option<&TimedSequence> {
        self.active.as_ref().map(|a| &a.sequence)
    }

    pub fn decision_state(&self) -> &DecisionState {
        &self.state
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TrickCatalog {
        &self.catalog
    }

    pub fn car_index(&self) -> usize {
        self.car_index
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ball_prediction::PredictedSlice;
    use crate::engine::side_channel::{QuickChat, RecordingChannel};
    use crate::engine::types::{BallState, Physics};

    fn car_at(location: Vec3, velocity: Vec3, boost: f32) -> CarState {
        CarState {
            physics: Physics { location, velocity, ..Physics::default() },
            boost,
            has_wheel_contact: true,
            is_super_sonic: false,
        }
    }

    fn packet(now: f32, car: CarState, ball: Vec3) -> TickPacket {
        TickPacket {
            seconds_elapsed: now,
            cars: vec![car],
            ball: BallState { physics: Physics::at(ball) },
        }
    }

    /// Ball parked at `location` for six seconds of 60 Hz samples.
    fn parked(now: f32, location: Vec3) -> BallPrediction {
        BallPrediction::new(
            (0..360)
                .map(|i| PredictedSlice::new(now + i as f32 / 60.0, location, Vec3::zeros()))
                .collect(),
        )
    }

    fn recording(seed: u64) -> FreestyleController<RecordingChannel> {
        FreestyleController::new(0, ControllerConfig::testing())
            .with_seed(seed)
            .with_channel(RecordingChannel::new())
    }

    const AERIAL_BALL: Vec3 = Vec3::new(600.0, 800.0, 500.0);

    #[test]
    fn test_aerial_scenario_starts_trick() {
        let mut ctl = recording(1);
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 70.0);
        let out = ctl.update(&packet(5.0, car, AERIAL_BALL), &parked(5.0, AERIAL_BALL));

        let kind = ctl.active_trick().expect("aerial should start a sequence");
        assert!(!kind.is_ground());
        assert_eq!(out, ctl.catalog().steps(kind)[0].controls);
        assert!(out.jump && out.boost);
        assert_eq!(ctl.phase(), ControllerPhase::Executing);

        let state = ctl.decision_state();
        assert_eq!(state.tricks_performed, 1);
        assert_eq!(state.last_trick, Some(kind));
        assert_eq!(state.last_aerial_time, 5.0);
        assert_eq!(ctl.channel().chats.len(), 1);
        assert_eq!(ctl.channel().chats[0], ctl.catalog().quick_chat(kind).unwrap());
    }

    #[test]
    fn test_low_boost_aerial_uses_base_tier() {
        let mut ctl = recording(2);
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 38.0);
        ctl.update(&packet(5.0, car, AERIAL_BALL), &parked(5.0, AERIAL_BALL));
        let kind = ctl.active_trick().unwrap();
        assert!(matches!(kind, TrickKind::BasicAerial | TrickKind::SpinningAerial));
    }

    #[test]
    fn test_active_sequence_preempts_decisions() {
        let mut ctl = recording(3);
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 70.0);
        ctl.update(&packet(5.0, car, AERIAL_BALL), &parked(5.0, AERIAL_BALL));
        let kind = ctl.active_trick().unwrap();
        let steps = ctl.catalog().steps(kind).to_vec();
        let frames_before = ctl.channel().frames.len();

        // Completely different world state: the plan keeps playing.
        let airborne = CarState { has_wheel_contact: false, boost: 0.0, ..car };
        let out = ctl.update(&packet(5.12, airborne, Vec3::zeros()), &BallPrediction::empty());
        assert_eq!(out, steps[1].controls);
        assert_eq!(ctl.channel().frames.len(), frames_before);
        assert_eq!(ctl.decision_state().tricks_performed, 1);
    }

    #[test]
    fn test_cooldown_blocks_back_to_back_aerials() {
        let mut ctl = recording(4);
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 100.0);
        ctl.update(&packet(5.0, car, AERIAL_BALL), &parked(5.0, AERIAL_BALL));
        let total = ctl.active_sequence().unwrap().total_duration();

        // Sequence over, but only ~2s since the aerial.
        let now = 5.0 + total + 0.05;
        assert!(now - 5.0 < 3.0);
        let out = ctl.update(&packet(now, car, AERIAL_BALL), &parked(now, AERIAL_BALL));
        assert_eq!(ctl.decision_state().tricks_performed, 1);
        assert_eq!(ctl.phase(), ControllerPhase::Idle);
        assert_eq!(out.throttle, 1.0);
    }

    #[test]
    fn test_consecutive_aerials_never_repeat() {
        let mut ctl = recording(5);
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 100.0);
        let mut picks = Vec::new();
        for i in 1..=25 {
            let now = 10.0 * i as f32;
            ctl.update(&packet(now, car, AERIAL_BALL), &parked(now, AERIAL_BALL));
            picks.push(ctl.active_trick().unwrap());
        }
        assert_eq!(ctl.decision_state().tricks_performed, 25);
        for pair in picks.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_same_seed_same_picks() {
        let run = |seed| {
            let mut ctl = FreestyleController::new(0, ControllerConfig::testing()).with_seed(seed);
            let car = car_at(Vec3::zeros(), Vec3::zeros(), 100.0);
            (1..=10)
                .map(|i| {
                    let now = 10.0 * i as f32;
                    ctl.update(&packet(now, car, AERIAL_BALL), &parked(now, AERIAL_BALL));
                    ctl.active_trick().unwrap()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn test_missing_prediction_falls_back_to_ground() {
        let mut ctl = recording(6);
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 70.0);
        let out = ctl.update(&packet(5.0, car, AERIAL_BALL), &BallPrediction::empty());
        assert_eq!(ctl.decision_state().tricks_performed, 0);
        assert_eq!(ctl.decision_state().last_aerial_time, 0.0);
        assert_eq!(ctl.phase(), ControllerPhase::Idle);
        assert_eq!(out.throttle, 1.0);
    }

    #[test]
    fn test_low_target_falls_back_to_ground() {
        let mut ctl = recording(7);
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 70.0);
        let dropping = Vec3::new(600.0, 800.0, 150.0);
        ctl.update(&packet(5.0, car, AERIAL_BALL), &parked(5.0, dropping));
        assert!(ctl.active_trick().is_none());
    }

    #[test]
    fn test_slow_and_far_triggers_speed_flip() {
        let mut ctl = recording(8);
        let car = car_at(Vec3::zeros(), Vec3::new(150.0, 0.0, 0.0), 50.0);
        let ball = Vec3::new(1800.0, 0.0, 0.0);
        let out = ctl.update(&packet(5.0, car, ball), &parked(5.0, ball));

        assert_eq!(ctl.active_trick(), Some(TrickKind::SpeedFlip));
        assert_eq!(out, ControlOutput::neutral().with_jump(true).with_boost(true).with_pitch(0.2));
        assert_eq!(ctl.channel().chats, vec![QuickChat::Siiiick]);
        // Ground tricks are not counted as freestyle tricks.
        assert_eq!(ctl.decision_state().tricks_performed, 0);
        assert_eq!(ctl.decision_state().last_trick, None);
    }

    #[test]
    fn test_medium_speed_triggers_diagonal_flip() {
        let mut ctl = recording(9);
        let car = car_at(Vec3::zeros(), Vec3::new(1000.0, 0.0, 0.0), 50.0);
        let ball = Vec3::new(900.0, 0.0, 0.0);
        ctl.update(&packet(5.0, car, ball), &parked(5.0, ball));
        assert_eq!(ctl.active_trick(), Some(TrickKind::DiagonalFlip));
        assert!(ctl.channel().chats.is_empty());
    }

    #[test]
    fn test_fast_and_far_triggers_speed_flip() {
        let mut ctl = recording(10);
        let car = car_at(Vec3::zeros(), Vec3::new(1300.0, 0.0, 0.0), 50.0);
        let ball = Vec3::new(1100.0, 0.0, 0.0);
        ctl.update(&packet(5.0, car, ball), &parked(5.0, ball));
        assert_eq!(ctl.active_trick(), Some(TrickKind::SpeedFlip));
    }

    #[test]
    fn test_airborne_car_never_starts_ground_trick() {
        let mut ctl = recording(11);
        let car = CarState {
            has_wheel_contact: false,
            ..car_at(Vec3::zeros(), Vec3::new(150.0, 0.0, 0.0), 50.0)
        };
        let ball = Vec3::new(1800.0, 0.0, 0.0);
        ctl.update(&packet(5.0, car, ball), &parked(5.0, ball));
        assert!(ctl.active_trick().is_none());
    }

    #[test]
    fn test_direct_drive_boosts_when_far() {
        let mut ctl = recording(12);
        let car = car_at(Vec3::zeros(), Vec3::new(500.0, 0.0, 0.0), 50.0);
        let ball = Vec3::new(2000.0, 0.0, 93.0);
        let out = ctl.update(&packet(5.0, car, ball), &parked(5.0, ball));
        assert_eq!(out.throttle, 1.0);
        assert!(out.boost);
        assert!(out.steer.abs() < 1e-3);
        assert!(!out.jump);
    }

    #[test]
    fn test_direct_drive_boost_gates() {
        let mut ctl = recording(13);
        let near = Vec3::new(1000.0, 0.0, 93.0);
        let car = car_at(Vec3::zeros(), Vec3::new(500.0, 0.0, 0.0), 50.0);
        assert!(!ctl.update(&packet(5.0, car, near), &parked(5.0, near)).boost);

        let far = Vec3::new(3000.0, 0.0, 93.0);
        let empty_tank = car_at(Vec3::zeros(), Vec3::new(500.0, 0.0, 0.0), 20.0);
        assert!(!ctl.update(&packet(5.1, empty_tank, far), &parked(5.1, far)).boost);

        let fast = car_at(Vec3::zeros(), Vec3::new(2200.0, 0.0, 0.0), 80.0);
        assert!(!ctl.update(&packet(5.2, fast, far), &parked(5.2, far)).boost);
    }

    #[test]
    fn test_far_target_uses_prediction() {
        let mut ctl = recording(14);
        let car = car_at(Vec3::zeros(), Vec3::new(500.0, 0.0, 0.0), 50.0);
        // Ball dead ahead now, predicted to end up to the right.
        let ball = Vec3::new(2000.0, 0.0, 93.0);
        let future = Vec3::new(2000.0, 1500.0, 93.0);
        let out = ctl.update(&packet(5.0, car, ball), &parked(5.0, future));
        assert!(out.steer > 0.5);

        // Within 1200 the current ball position is used.
        let close = Vec3::new(1000.0, 0.0, 93.0);
        let out = ctl.update(&packet(5.1, car, close), &parked(5.1, future));
        assert!(out.steer.abs() < 1e-3);
    }

    #[test]
    fn test_missing_car_gives_neutral() {
        let mut ctl = FreestyleController::new(3, ControllerConfig::testing());
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 70.0);
        let out = ctl.update(&packet(5.0, car, AERIAL_BALL), &parked(5.0, AERIAL_BALL));
        assert!(out.is_neutral());
    }

    #[test]
    fn test_ground_only_profile_skips_aerials() {
        let mut ctl = FreestyleController::new(0, ControllerConfig::ground_only());
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 70.0);
        ctl.update(&packet(5.0, car, AERIAL_BALL), &parked(5.0, AERIAL_BALL));
        assert_eq!(ctl.decision_state().tricks_performed, 0);
    }

    #[test]
    fn test_debug_frame_each_decision_tick() {
        let mut ctl = recording(15);
        let car = car_at(Vec3::zeros(), Vec3::new(500.0, 0.0, 0.0), 50.0);
        let ball = Vec3::new(2000.0, 0.0, 0.0);
        ctl.update(&packet(5.0, car, ball), &parked(5.0, ball));
        ctl.update(&packet(5.1, car, ball), &parked(5.1, ball));
        let frames = &ctl.channel().frames;
        assert_eq!(frames.len(), 2);
        let frame = &frames[0];
        assert!((frame.distance - 2000.0).abs() < 1e-3);
        assert!((frame.time_to_reach - 4.0).abs() < 1e-3);
        assert!(frame.facing_ball);
        assert!(!frame.boost_covers_distance);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut ctl = recording(16);
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 70.0);
        ctl.update(&packet(5.0, car, AERIAL_BALL), &parked(5.0, AERIAL_BALL));
        ctl.reset();
        assert_eq!(ctl.phase(), ControllerPhase::Idle);
        assert!(ctl.active_sequence().is_none());
        assert_eq!(ctl.decision_state(), &DecisionState::default());
    }

    #[test]
    fn test_deserialized_catalog_drives_aerial() {
        // An empty document never becomes a catalog.
        assert!(serde_json::from_str::<TrickCatalog>("{}").is_err());

        let yaml = TrickCatalog::standard().to_yaml_string().unwrap();
        let catalog: TrickCatalog = serde_yaml::from_str(&yaml).unwrap();
        let mut ctl = recording(17).with_catalog(catalog);
        let car = car_at(Vec3::zeros(), Vec3::zeros(), 70.0);
        let out = ctl.update(&packet(5.0, car, AERIAL_BALL), &parked(5.0, AERIAL_BALL));

        assert!(out.jump && out.boost);
        assert_eq!(ctl.phase(), ControllerPhase::Executing);
        assert_eq!(ctl.decision_state().tricks_performed, 1);
        assert_eq!(ctl.decision_state().last_trick, ctl.active_trick());
    }

    #[test]
    fn test_controllers_are_independent() {
        let mut blue = FreestyleController::new(0, ControllerConfig::testing());
        let mut orange = FreestyleController::new(1, ControllerConfig::testing());
        let ready = car_at(Vec3::zeros(), Vec3::zeros(), 70.0);
        let parked_car = car_at(Vec3::new(0.0, 5000.0, 0.0), Vec3::zeros(), 0.0);
        let tick = TickPacket {
            seconds_elapsed: 5.0,
            cars: vec![ready, parked_car],
            ball: BallState { physics: Physics::at(AERIAL_BALL) },
        };
        let prediction = parked(5.0, AERIAL_BALL);
        blue.update(&tick, &prediction);
        orange.update(&tick, &prediction);
        assert_eq!(blue.decision_state().tricks_performed, 1);
        assert_eq!(orange.decision_state().tricks_performed, 0);
    }
}
