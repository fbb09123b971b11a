use crate::config::WanderConfig;
use crate::controller::WanderController;
use crate::error::Result;
use crate::rng::RandomSource;
use crate::scheduler::TimerQueue;
use crate::sink::RenderSink;
use std::time::Duration;
use tracing::debug;

/// Longest stretch of missed time replayed in one call. Anything beyond it
/// (a suspended host, a debugger pause) is skipped with the pet frozen.
pub const MAX_CATCH_UP: Duration = Duration::from_secs(60);

/// A controller wired to a virtual-time queue and a sink.
///
/// The host only reports elapsed time; every timer that came due in between
/// is dispatched in order, so a slow frame catches up exactly.
pub struct PetRuntime<R, S> {
    queue: TimerQueue,
    controller: WanderController<R>,
    sink: S,
}

impl<R: RandomSource, S: RenderSink> PetRuntime<R, S> {
    pub fn new(cfg: WanderConfig, rng: R, sink: S) -> Result<Self> {
        Ok(Self {
            queue: TimerQueue::new(),
            controller: WanderController::new(cfg, rng)?,
            sink,
        })
    }

    pub fn start(&mut self) {
        self.controller.start(&mut self.queue, &mut self.sink);
    }

    /// Run everything due up to `elapsed` (time since start). Returns how
    /// many callbacks ran. At most [`MAX_CATCH_UP`] of virtual time is
    /// replayed; the rest is skipped.
    pub fn advance_to(&mut self, elapsed: Duration) -> usize {
        let behind = elapsed.saturating_sub(self.queue.now());
        if behind > MAX_CATCH_UP {
            let skipped = behind - MAX_CATCH_UP;
            debug!(secs = skipped.as_secs_f64(), "host stalled, skipping missed time");
            self.queue.shift(skipped);
        }

        let mut ran = 0;
        while let Some(handle) = self.queue.pop_due(elapsed) {
            if self
                .controller
                .handle_timer(handle, &mut self.queue, &mut self.sink)
            {
                ran += 1;
            }
        }
        self.queue.settle(elapsed);
        ran
    }

    pub fn advance_by(&mut self, dt: Duration) -> usize {
        let until = self.queue.now() + dt;
        self.advance_to(until)
    }

    pub fn shutdown(&mut self) {
        self.controller.shutdown(&mut self.queue);
    }

    pub fn now(&self) -> Duration {
        self.queue.now()
    }

    /// Time left in the current sitting/walking phase.
    pub fn phase_remaining(&self) -> Option<Duration> {
        let due = self.queue.due_at(self.controller.deadline()?)?;
        Some(due.saturating_sub(self.queue.now()))
    }

    pub fn controller(&self) -> &WanderController<R> {
        &self.controller
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
