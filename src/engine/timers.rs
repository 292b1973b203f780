//! Delayed mutations on a caller-driven clock.
//!
//! Tasks are never cancelled. Each carries the state it was scheduled under
//! (question epoch, and for excess clears the slot revision) and the session
//! re-checks that snapshot when the task fires.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Wrong status back to neutral, if the slot still shows wrong.
    RevertWrong { slot: String },
    /// Excess placement removed from its slot.
    ClearExcess { slot: String, revision: u64 },
    /// Formula mode: last question answered, enter the settle phase.
    BeginSettle,
    /// Settle phase over, level complete.
    Settle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    pub due: Duration,
    pub epoch: u64,
    pub kind: TaskKind,
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
    next_seq: u64,
}

impl Scheduler {
    pub fn schedule(&mut self, due: Duration, epoch: u64, kind: TaskKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(ScheduledTask {
            due,
            epoch,
            kind,
            seq,
        });
    }

    /// Earliest task due at or before `now`; ties go to the first scheduled.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledTask> {
        let pos = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        Some(self.tasks.swap_remove(pos))
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.iter().map(|t| t.due).min()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
