//! Session-owned scheduled tasks
//!
//! Delayed one-shots and repeating timers are plain data owned by the
//! session. Nothing here holds a callback: the session matches on the
//! returned [`TimerKind`] at the start of a tick and checks liveness before
//! mutating anything. Clearing the scheduler voids every pending task.

use std::time::Duration;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Spawn one more patrolling enemy (repeating)
    SpawnEnemy,
    /// Super-power mode runs out
    EndSuperPower,
    /// Boss hit-flash window closes
    ClearBossFlash,
    /// Level-complete delay elapsed, move to the next level
    AdvanceLevel,
    /// Final-level victory screen starts accepting the exit input
    ArmExitConfirm,
}

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

#[derive(Debug, Clone)]
struct Task {
    id: TimerId,
    kind: TimerKind,
    due: Duration,
    repeat: Option<Duration>,
}

/// Clock plus the set of pending tasks
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    tasks: Vec<Task>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on this scheduler's clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire once after `delay`
    pub fn after(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        self.push(delay, None, kind)
    }

    /// Fire every `interval`, first time one interval from now
    pub fn every(&mut self, interval: Duration, kind: TimerKind) -> TimerId {
        self.push(interval, Some(interval), kind)
    }

    fn push(&mut self, delay: Duration, repeat: Option<Duration>, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.tasks.push(Task {
            id,
            kind,
            due: self.now + delay,
            repeat,
        });
        id
    }

    /// Cancel a pending task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Cancel every pending task of a kind
    pub fn cancel_kind(&mut self, kind: TimerKind) {
        self.tasks.retain(|t| t.kind != kind);
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        if !self.tasks.is_empty() {
            log::debug!("Cancelling {} pending timers", self.tasks.len());
        }
        self.tasks.clear();
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.tasks.iter().any(|t| t.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance the clock and return every task that came due, earliest first.
    ///
    /// A repeating task fires at most once per call and is rescheduled from
    /// its previous due time so it does not drift.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerKind> {
        self.now += dt;

        let mut due: Vec<(Duration, u32, TimerKind)> = Vec::new();
        let now = self.now;
        self.tasks.retain_mut(|task| {
            if task.due > now {
                return true;
            }
            due.push((task.due, task.id.0, task.kind));
            match task.repeat {
                Some(interval) => {
                    task.due += interval;
                    if task.due <= now {
                        task.due = now + interval;
                    }
                    true
                }
                None => false,
            }
        });

        due.sort_by_key(|&(at, id, _)| (at, id));
        due.into_iter().map(|(_, _, kind)| kind).collect()
    }
}
