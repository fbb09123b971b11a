//! Sitting/walking state machine.
//!
//! `start` arms one repeating tick for the controller's whole life and
//! enters `Walking`. From there each state entry draws a fresh duration and
//! arms a single one-shot deadline; when it fires the pet switches to the
//! other state. Ticks only do work while walking.

use crate::config::{tick_period, WanderConfig, SIT_SECS, WALK_SECS};
use crate::error::Result;
use crate::model::{MotionState, PetState};
use crate::motion;
use crate::rng::RandomSource;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::sink::{RenderSink, SpriteKind};
use std::time::Duration;
use tracing::{debug, info, trace};

pub struct WanderController<R> {
    cfg: WanderConfig,
    rng: R,
    state: PetState,
    motion: MotionState,
    tick: Option<TimerHandle>,
    deadline: Option<TimerHandle>,
    phase_length: Duration,
    transitions: u64,
}

impl<R: RandomSource> WanderController<R> {
    /// Validates `cfg`; an invalid configuration never yields a controller.
    pub fn new(cfg: WanderConfig, rng: R) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            rng,
            state: PetState::Sitting,
            motion: MotionState::default(),
            tick: None,
            deadline: None,
            phase_length: Duration::ZERO,
            transitions: 0,
        })
    }

    pub fn state(&self) -> PetState {
        self.state
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// Length drawn for the current state.
    pub fn phase_length(&self) -> Duration {
        self.phase_length
    }

    /// Number of state entries since start.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn deadline(&self) -> Option<TimerHandle> {
        self.deadline
    }

    /// Arm the tick and begin with a walk. Calling it again is a no-op.
    pub fn start(&mut self, sched: &mut impl Scheduler, sink: &mut impl RenderSink) {
        if self.is_running() {
            return;
        }
        info!(
            strip_width = self.cfg.strip_width,
            sprite_width = self.cfg.sprite_width,
            "wander controller starting"
        );
        self.tick = Some(sched.every(tick_period()));
        sink.set_position(self.motion.position);
        self.enter_walking(sched, sink);
    }

    /// Cancel both timers. State and motion are left as they are.
    pub fn shutdown(&mut self, sched: &mut impl Scheduler) {
        if let Some(h) = self.tick.take() {
            sched.cancel(h);
        }
        if let Some(h) = self.deadline.take() {
            sched.cancel(h);
        }
        debug!(transitions = self.transitions, "wander controller stopped");
    }

    /// Route a fired timer. Returns false for handles this controller does
    /// not own (stale or foreign).
    pub fn handle_timer(
        &mut self,
        handle: TimerHandle,
        sched: &mut impl Scheduler,
        sink: &mut impl RenderSink,
    ) -> bool {
        if self.tick == Some(handle) {
            self.on_tick(sink);
            true
        } else if self.deadline == Some(handle) {
            // no-op once the queue has popped it
            sched.cancel(handle);
            self.deadline = None;
            self.on_deadline(sched, sink);
            true
        } else {
            false
        }
    }

    /// One physics frame.
    pub fn on_tick(&mut self, sink: &mut impl RenderSink) {
        if self.state != PetState::Walking {
            return;
        }

        let m = self.motion;
        let step = motion::step(m.position, m.target, m.velocity, &self.cfg);
        if step.arrived {
            // Never idle mid-walk: head for the far side instead. Facing
            // follows velocity, so the turn shows on the next step.
            let target = motion::arrival_target(m.position, &self.cfg);
            trace!(position = m.position, to = target, "arrived, turning around");
            self.motion.target = target;
        } else {
            self.motion.position = step.position;
            self.motion.velocity = step.velocity;
            if step.velocity != 0.0 {
                self.face(step.velocity > 0.0, sink);
            }
        }
        sink.set_position(self.motion.position);
    }

    /// The current state's time is up.
    pub fn on_deadline(&mut self, sched: &mut impl Scheduler, sink: &mut impl RenderSink) {
        match self.state.other() {
            PetState::Walking => self.enter_walking(sched, sink),
            PetState::Sitting => self.enter_sitting(sched, sink),
        }
    }

    fn enter_walking(&mut self, sched: &mut impl Scheduler, sink: &mut impl RenderSink) {
        self.state = PetState::Walking;
        let target = random_target(self.motion.position, &self.cfg, &mut self.rng);
        self.motion.target = target;
        self.motion.facing_right = target > self.motion.position;
        sink.set_sprite(SpriteKind::walking(self.motion.facing_right));

        let length = draw_duration(PetState::Walking, &mut self.rng);
        self.arm_deadline(sched, length);
        debug!(
            from = self.motion.position,
            to = target,
            secs = length.as_secs_f64(),
            "walking"
        );
    }

    fn enter_sitting(&mut self, sched: &mut impl Scheduler, sink: &mut impl RenderSink) {
        self.state = PetState::Sitting;
        sink.set_sprite(SpriteKind::Sitting);

        let length = draw_duration(PetState::Sitting, &mut self.rng);
        self.arm_deadline(sched, length);
        debug!(
            at = self.motion.position,
            secs = length.as_secs_f64(),
            "sitting"
        );
    }

    fn arm_deadline(&mut self, sched: &mut impl Scheduler, length: Duration) {
        if let Some(old) = self.deadline.take() {
            sched.cancel(old);
        }
        self.deadline = Some(sched.after(length));
        self.phase_length = length;
        self.transitions += 1;
    }

    fn face(&mut self, right: bool, sink: &mut impl RenderSink) {
        if right != self.motion.facing_right {
            self.motion.facing_right = right;
            sink.set_sprite(SpriteKind::walking(right));
        }
    }
}

/// Pick a walk target at least a third of the usable strip away, when
/// there is room for it in the chosen direction.
pub fn random_target(position: f64, cfg: &WanderConfig, rng: &mut impl RandomSource) -> f64 {
    let (min_x, max_x) = (cfg.min_target(), cfg.max_target());
    let min_distance = (max_x - min_x) / 3.0;

    let target = if rng.coin() {
        (position + min_distance + rng.uniform(0.0..=min_distance)).min(max_x)
    } else {
        (position - min_distance - rng.uniform(0.0..=min_distance)).max(min_x)
    };
    target.clamp(min_x, max_x)
}

/// How long the given state should last.
pub fn draw_duration(state: PetState, rng: &mut impl RandomSource) -> Duration {
    let range = match state {
        PetState::Walking => WALK_SECS,
        PetState::Sitting => SIT_SECS,
    };
    Duration::from_secs_f64(rng.uniform(range))
}
