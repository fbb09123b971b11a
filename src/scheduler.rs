//! Timer primitives the wander controller is driven by.
//!
//! The controller never reads a clock. It asks a [`Scheduler`] for a
//! repeating tick and one-shot deadlines, and the host hands fired handles
//! back to it. [`TimerQueue`] is a virtual-time scheduler: the host tells it
//! how much time has passed and drains whatever came due, so the same state
//! machine runs under a terminal loop, a game loop or a test.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

pub trait Scheduler {
    /// Fire every `period`, first one `period` from now.
    fn every(&mut self, period: Duration) -> TimerHandle;

    /// Fire once, `delay` from now.
    fn after(&mut self, delay: Duration) -> TimerHandle;

    /// Drop a pending timer. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    handle: TimerHandle,
    due: Duration,
    period: Option<Duration>,
}

#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time of the last fired timer (or the last `settle`).
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// When `handle` fires next, if it is still pending.
    pub fn due_at(&self, handle: TimerHandle) -> Option<Duration> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.due)
    }

    /// Pop the earliest timer due at or before `until`.
    ///
    /// Virtual time jumps to that timer's due instant, so anything scheduled
    /// while handling it is measured from when it fired. Ties go to the
    /// older timer. Repeating timers are re-armed one period later.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerHandle> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.handle))
            .map(|(i, _)| i)?;

        let Entry {
            handle,
            due,
            period,
        } = self.entries[idx];
        self.now = self.now.max(due);
        match period {
            Some(p) => self.entries[idx].due = due + p,
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(handle)
    }

    /// Slide the clock and every pending timer forward by `by`, as if time
    /// had stood still. Nothing fires.
    pub fn shift(&mut self, by: Duration) {
        self.now += by;
        for e in &mut self.entries {
            e.due += by;
        }
    }

    /// Move virtual time forward once nothing more is due.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due: self.now + delay,
            period,
        });
        handle
    }
}

impl Scheduler for TimerQueue {
    fn every(&mut self, period: Duration) -> TimerHandle {
        // A zero period would spin forever inside pop_due.
        let period = period.max(Duration::from_nanos(1));
        self.push(period, Some(period))
    }

    fn after(&mut self, delay: Duration) -> TimerHandle {
        self.push(delay, None)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn drain(q: &mut TimerQueue, until: Duration) -> Vec<(TimerHandle, Duration)> {
        let mut out = Vec::new();
        while let Some(h) = q.pop_due(until) {
            out.push((h, q.now()));
        }
        q.settle(until);
        out
    }

    #[test]
    fn one_shot_fires_once() {
        let mut q = TimerQueue::new();
        let h = q.after(ms(100));
        assert!(drain(&mut q, ms(99)).is_empty());
        assert_eq!(drain(&mut q, ms(100)), vec![(h, ms(100))]);
        assert!(drain(&mut q, ms(1_000)).is_empty());
        assert!(!q.is_pending(h));
    }

    #[test]
    fn repeating_fires_each_period_in_order() {
        let mut q = TimerQueue::new();
        let tick = q.every(ms(10));
        let fired = drain(&mut q, ms(35));
        assert_eq!(
            fired,
            vec![(tick, ms(10)), (tick, ms(20)), (tick, ms(30))]
        );
        assert_eq!(q.due_at(tick), Some(ms(40)));
        assert_eq!(q.now(), ms(35));
    }

    #[test]
    fn interleaves_by_due_time_then_age() {
        let mut q = TimerQueue::new();
        let tick = q.every(ms(10));
        let deadline = q.after(ms(20));
        let fired: Vec<_> = drain(&mut q, ms(30)).into_iter().map(|(h, _)| h).collect();
        assert_eq!(fired, vec![tick, tick, deadline, tick]);
    }

    #[test]
    fn timers_armed_while_draining_count_from_fire_time() {
        let mut q = TimerQueue::new();
        let first = q.after(ms(100));
        assert_eq!(q.pop_due(ms(1_000)), Some(first));
        let second = q.after(ms(50));
        assert_eq!(q.due_at(second), Some(ms(150)));
        assert_eq!(q.pop_due(ms(1_000)), Some(second));
        assert_eq!(q.now(), ms(150));
    }

    #[test]
    fn shift_delays_everything_without_firing() {
        let mut q = TimerQueue::new();
        let tick = q.every(ms(10));
        let deadline = q.after(ms(25));
        drain(&mut q, ms(15));
        q.shift(ms(1_000));
        assert_eq!(q.now(), ms(1_015));
        assert_eq!(q.due_at(tick), Some(ms(1_020)));
        assert_eq!(q.due_at(deadline), Some(ms(1_025)));
        let fired: Vec<_> = drain(&mut q, ms(1_025)).into_iter().map(|(h, _)| h).collect();
        assert_eq!(fired, vec![tick, deadline]);
    }

    #[test]
    fn cancel_removes_pending() {
        let mut q = TimerQueue::new();
        let a = q.after(ms(10));
        let b = q.every(ms(10));
        q.cancel(a);
        q.cancel(a);
        assert_eq!(q.pending(), 1);
        q.cancel(b);
        assert!(drain(&mut q, ms(100)).is_empty());
    }
}
