/// Tick scheduler: two independent periodic timers on one thread.
///
///   - Render timer: fixed period, armed for the whole session.
///   - Logic timer: period = current speed. Armed when the game starts
///     and replaced (cancel, then recreate) on every level-up.
///
/// Time is a caller-supplied monotonic millisecond count so the
/// scheduler can be driven deterministically in tests.

/// Identifies one incarnation of the logic timer.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug)]
struct Timer {
    handle: TimerHandle,
    period_ms: u64,
    next_due_ms: u64,
}

impl Timer {
    fn new(handle: TimerHandle, period_ms: u64, now_ms: u64) -> Self {
        Timer { handle, period_ms: period_ms.max(1), next_due_ms: now_ms + period_ms.max(1) }
    }

    /// Fires at most once per call. A timer that fell behind re-anchors
    /// on `now_ms` instead of firing a burst of catch-up ticks.
    fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms += self.period_ms;
        if self.next_due_ms <= now_ms {
            self.next_due_ms = now_ms + self.period_ms;
        }
        true
    }
}

/// Which drivers fired on a poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Due {
    pub logic: bool,
    pub render: bool,
}

pub struct Scheduler {
    render: Timer,
    logic: Option<Timer>,
    next_handle: u64,
}

impl Scheduler {
    /// Render timer starts immediately; the logic timer is idle until
    /// `start_logic()`.
    pub fn new(render_tick_ms: u64, now_ms: u64) -> Self {
        Scheduler {
            render: Timer::new(TimerHandle(0), render_tick_ms, now_ms),
            logic: None,
            next_handle: 1,
        }
    }

    /// Arm the logic timer. Any existing logic timer is cancelled first.
    pub fn start_logic(&mut self, period_ms: u64, now_ms: u64) -> TimerHandle {
        self.cancel_logic();
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.logic = Some(Timer::new(handle, period_ms, now_ms));
        handle
    }

    /// Cancel-then-recreate at a new period. The in-flight period of the
    /// old timer is dropped, not drained: the first tick of the new timer
    /// is a full `period_ms` after `now_ms`.
    pub fn restart_logic(&mut self, period_ms: u64, now_ms: u64) -> TimerHandle {
        let handle = self.start_logic(period_ms, now_ms);
        log::debug!("logic timer {:?} restarted at {} ms", handle, period_ms);
        handle
    }

    pub fn cancel_logic(&mut self) {
        self.logic = None;
    }

    pub fn logic_handle(&self) -> Option<TimerHandle> {
        self.logic.map(|t| t.handle)
    }

    pub fn logic_period_ms(&self) -> Option<u64> {
        self.logic.map(|t| t.period_ms)
    }

    pub fn poll(&mut self, now_ms: u64) -> Due {
        Due {
            logic: self.logic.as_mut().map_or(false, |t| t.poll(now_ms)),
            render: self.render.poll(now_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fires_on_fixed_cadence() {
        let mut s = Scheduler::new(20, 0);
        assert!(!s.poll(19).render);
        assert!(s.poll(20).render);
        assert!(!s.poll(21).render);
        assert!(s.poll(40).render);
    }

    #[test]
    fn logic_idle_until_started() {
        let mut s = Scheduler::new(20, 0);
        assert!(!s.poll(1000).logic);
        assert_eq!(s.logic_handle(), None);
        s.start_logic(100, 1000);
        assert!(!s.poll(1099).logic);
        assert!(s.poll(1100).logic);
    }

    #[test]
    fn late_poll_fires_once_and_reanchors() {
        let mut s = Scheduler::new(20, 0);
        s.start_logic(100, 0);
        assert!(s.poll(350).logic);
        assert!(!s.poll(360).logic);
        assert!(!s.poll(449).logic);
        assert!(s.poll(450).logic);
    }

    #[test]
    fn restart_abandons_in_flight_period() {
        let mut s = Scheduler::new(20, 0);
        let first = s.start_logic(100, 0);
        assert!(s.poll(100).logic);
        // 90 ms into the next period, level-up switches to 80 ms.
        let second = s.restart_logic(80, 190);
        assert_ne!(first, second);
        assert_eq!(s.logic_handle(), Some(second));
        assert_eq!(s.logic_period_ms(), Some(80));
        // The old timer would have fired at 200; the new one waits a full period.
        assert!(!s.poll(200).logic);
        assert!(s.poll(270).logic);
        assert!(s.poll(350).logic);
    }

    #[test]
    fn render_unaffected_by_logic_restart() {
        let mut s = Scheduler::new(20, 0);
        s.start_logic(100, 0);
        s.restart_logic(60, 10);
        assert!(s.poll(20).render);
    }

    #[test]
    fn cancel_stops_logic() {
        let mut s = Scheduler::new(20, 0);
        s.start_logic(50, 0);
        s.cancel_logic();
        assert!(!s.poll(500).logic);
    }
}
