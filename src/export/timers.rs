use std::collections::BTreeMap;

use crate::foundation::core::Millis;

/// What a workflow timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Settle delay elapsed; start buffering.
    StartBuffering,
    /// Capture duration elapsed; stop buffering.
    StopBuffering,
}

/// A due timer, tagged with the session that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredTimer {
    pub kind: TimerKind,
    pub session: u64,
    pub deadline: Millis,
}

/// One-shot timers on a millisecond timeline.
///
/// Timers fire in deadline order; timers sharing a deadline fire in scheduling order. Nothing is
/// ever cancelled: the workflow discards firings whose session is gone.
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: BTreeMap<(Millis, u64), (TimerKind, u64)>,
    seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` for `session` at `now + delay`.
    pub fn schedule(&mut self, now: Millis, delay: Millis, kind: TimerKind, session: u64) -> Millis {
        let deadline = now.saturating_add(delay);
        self.pending.insert((deadline, self.seq), (kind, session));
        self.seq += 1;
        deadline
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.keys().next().map(|(d, _)| *d)
    }

    /// Remove and return the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<FiredTimer> {
        let (&(deadline, seq), _) = self.pending.iter().next()?;
        if deadline > now {
            return None;
        }
        let (kind, session) = self.pending.remove(&(deadline, seq))?;
        Some(FiredTimer {
            kind,
            session,
            deadline,
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/timers.rs"]
mod tests;
