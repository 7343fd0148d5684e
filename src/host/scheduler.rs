use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A timer that came due
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<K> {
    pub id: TimerId,
    pub deadline: Duration,
    pub kind: K,
}

#[derive(Debug, Clone)]
struct Entry<K> {
    kind: K,
    period: Option<Duration>,
}

/// Cooperative timer queue over a host-supplied clock.
///
/// Nothing here sleeps or reads the wall clock: the host asks for due timers
/// with `pop_due` as its own clock advances. Timers sharing a deadline fire
/// in the order they were scheduled.
#[derive(Debug, Clone)]
pub struct Scheduler<K> {
    queue: BTreeMap<(Duration, TimerId), Entry<K>>,
    deadlines: HashMap<TimerId, Duration>,
    next_id: u64,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Scheduler<K> {
    pub fn new() -> Self {
        Scheduler {
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }

    /// Fire `kind` once, `delay` after `now`
    pub fn once(&mut self, now: Duration, delay: Duration, kind: K) -> TimerId {
        self.insert(now + delay, kind, None)
    }

    /// Fire `kind` every `period`, starting one period after `now`.
    /// A zero period is treated as one millisecond so the queue always advances.
    pub fn every(&mut self, now: Duration, period: Duration, kind: K) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(now + period, kind, Some(period))
    }

    /// Cancel a pending timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.queue.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    fn insert(&mut self, deadline: Duration, kind: K, period: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.insert((deadline, id), Entry { kind, period });
        self.deadlines.insert(id, deadline);
        id
    }
}

impl<K: Clone> Scheduler<K> {
    /// Remove and return the earliest timer due at or before `until`.
    /// Periodic timers are re-armed one period after their deadline under
    /// the same id.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<K>> {
        let (&(deadline, id), _) = self.queue.iter().next()?;
        if deadline > until {
            return None;
        }
        let entry = self.queue.remove(&(deadline, id))?;
        match entry.period {
            Some(period) => {
                let next = deadline + period;
                self.deadlines.insert(id, next);
                self.queue.insert(
                    (next, id),
                    Entry {
                        kind: entry.kind.clone(),
                        period: entry.period,
                    },
                );
            }
            None => {
                self.deadlines.remove(&id);
            }
        }
        Some(Fired {
            id,
            deadline,
            kind: entry.kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(s: &mut Scheduler<&'static str>, until: u64) -> Vec<(u64, &'static str)> {
        let mut out = Vec::new();
        while let Some(f) = s.pop_due(ms(until)) {
            out.push((f.deadline.as_millis() as u64, f.kind));
        }
        out
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut s = Scheduler::new();
        s.once(ms(0), ms(300), "c");
        s.once(ms(0), ms(100), "a");
        s.once(ms(0), ms(200), "b");
        assert_eq!(drain(&mut s, 1000), vec![(100, "a"), (200, "b"), (300, "c")]);
        assert!(s.is_empty());
    }

    #[test]
    fn same_deadline_keeps_schedule_order() {
        let mut s = Scheduler::new();
        s.once(ms(0), ms(500), "first");
        s.once(ms(0), ms(500), "second");
        assert_eq!(drain(&mut s, 500), vec![(500, "first"), (500, "second")]);
    }

    #[test]
    fn nothing_fires_before_deadline() {
        let mut s = Scheduler::new();
        s.once(ms(10), ms(100), "x");
        assert_eq!(drain(&mut s, 109), vec![]);
        assert_eq!(s.next_deadline(), Some(ms(110)));
    }

    #[test]
    fn periodic_rearms_until_cancelled() {
        let mut s = Scheduler::new();
        let id = s.every(ms(0), ms(100), "tick");
        assert_eq!(
            drain(&mut s, 350),
            vec![(100, "tick"), (200, "tick"), (300, "tick")]
        );
        assert!(s.is_pending(id));
        assert!(s.cancel(id));
        assert_eq!(drain(&mut s, 1000), vec![]);
    }

    #[test]
    fn cancel_fired_or_unknown_is_false() {
        let mut s = Scheduler::new();
        let id = s.once(ms(0), ms(10), "x");
        assert_eq!(drain(&mut s, 10).len(), 1);
        assert!(!s.cancel(id));
        assert!(!s.cancel(id));
    }

    #[test]
    fn clear_drops_everything() {
        let mut s = Scheduler::new();
        s.once(ms(0), ms(10), "x");
        s.every(ms(0), ms(10), "y");
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.next_deadline(), None);
    }
}
