//! Event scheduler driving simulated time
//!
//! The clock is a binary-heap agenda of pending resumptions keyed by
//! `(time, submission sequence)`. Resumptions at the same instant fire in the
//! order they were scheduled, which keeps runs reproducible for a fixed
//! random stream.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Simulated time in minutes
pub type SimTime = f64;

#[derive(Debug)]
struct Scheduled<T> {
    time: SimTime,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    // Reversed so that the max-heap pops the earliest entry first
    fn cmp(&self, other: &Self) -> Ordering {
        other.time.total_cmp(&self.time).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Time-ordered agenda of pending resumptions
#[derive(Debug)]
pub struct Clock<T> {
    now: SimTime,
    next_seq: u64,
    agenda: BinaryHeap<Scheduled<T>>,
}

impl<T> Default for Clock<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clock<T> {
    /// Create a clock at time zero with an empty agenda
    pub fn new() -> Self {
        Self { now: 0.0, next_seq: 0, agenda: BinaryHeap::new() }
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Number of pending resumptions
    pub fn pending(&self) -> usize {
        self.agenda.len()
    }

    /// Time of the earliest pending resumption
    pub fn next_time(&self) -> Option<SimTime> {
        self.agenda.peek().map(|entry| entry.time)
    }

    /// Enqueue `payload` to resume at `now + delay`
    ///
    /// Negative and NaN delays resume immediately. An infinite delay means
    /// "never" and is dropped; the return value tells whether the payload
    /// was scheduled.
    pub fn schedule_after(&mut self, delay: SimTime, payload: T) -> bool {
        let delay = if delay.is_nan() || delay < 0.0 { 0.0 } else { delay };
        if delay.is_infinite() {
            return false;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.agenda.push(Scheduled { time: self.now + delay, seq, payload });
        true
    }

    /// Enqueue `payload` to resume at the current instant, after anything
    /// already scheduled for it
    pub fn schedule_now(&mut self, payload: T) {
        self.schedule_after(0.0, payload);
    }

    /// Pop the earliest resumption due at or before `until`, advancing `now`
    pub fn pop_due(&mut self, until: SimTime) -> Option<T> {
        match self.agenda.peek() {
            Some(entry) if entry.time <= until => {}
            _ => return None,
        }
        let entry = self.agenda.pop()?;
        self.now = entry.time;
        Some(entry.payload)
    }

    /// Resume pending payloads in time order until none is due at or before
    /// `until`
    ///
    /// The handler may schedule further work on the clock. A handler error
    /// stops the run and is returned as is. On normal completion `now`
    /// advances to `until`, even if the agenda ran dry earlier.
    pub fn run_until<E, F>(&mut self, until: SimTime, mut handler: F) -> Result<(), E>
    where
        F: FnMut(&mut Self, T) -> Result<(), E>,
    {
        while let Some(payload) = self.pop_due(until) {
            handler(self, payload)?;
        }
        if until.is_finite() && until > self.now {
            self.now = until;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(clock: &mut Clock<&'static str>, until: SimTime) -> Vec<(SimTime, &'static str)> {
        let mut seen = Vec::new();
        clock
            .run_until(until, |clock, label| -> Result<(), ()> {
                seen.push((clock.now(), label));
                Ok(())
            })
            .unwrap();
        seen
    }

    #[test]
    fn test_resumes_in_time_order() {
        let mut clock = Clock::new();
        clock.schedule_after(5.0, "late");
        clock.schedule_after(1.0, "early");
        clock.schedule_after(3.0, "middle");

        let seen = drain(&mut clock, 10.0);
        assert_eq!(seen, vec![(1.0, "early"), (3.0, "middle"), (5.0, "late")]);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn test_ties_preserve_submission_order() {
        let mut clock = Clock::new();
        clock.schedule_after(2.0, "first");
        clock.schedule_after(2.0, "second");
        clock.schedule_now("zero");
        clock.schedule_after(2.0, "third");

        let labels: Vec<_> = drain(&mut clock, 2.0).into_iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["zero", "first", "second", "third"]);
    }

    #[test]
    fn test_horizon_is_inclusive() {
        let mut clock = Clock::new();
        clock.schedule_after(10.0, "at horizon");
        clock.schedule_after(10.5, "after horizon");

        let seen = drain(&mut clock, 10.0);
        assert_eq!(seen, vec![(10.0, "at horizon")]);
        assert_eq!(clock.pending(), 1);
        assert_eq!(clock.next_time(), Some(10.5));
    }

    #[test]
    fn test_degenerate_delays() {
        let mut clock: Clock<u8> = Clock::new();
        assert!(clock.schedule_after(-3.0, 1));
        assert!(clock.schedule_after(f64::NAN, 2));
        assert!(!clock.schedule_after(f64::INFINITY, 3));
        assert_eq!(clock.pending(), 2);

        assert_eq!(clock.pop_due(0.0), Some(1));
        assert_eq!(clock.pop_due(0.0), Some(2));
        assert_eq!(clock.pop_due(100.0), None);
    }

    #[test]
    fn test_handler_can_schedule_and_fail() {
        let mut clock = Clock::new();
        clock.schedule_now(0_u32);

        let result = clock.run_until(100.0, |clock, n| {
            if n == 3 {
                return Err(format!("stopped at {}", clock.now()));
            }
            clock.schedule_after(10.0, n + 1);
            Ok(())
        });

        assert_eq!(result, Err("stopped at 30".to_string()));
        assert_eq!(clock.now(), 30.0);
    }

    #[test]
    fn test_empty_agenda_ends_early() {
        let mut clock: Clock<()> = Clock::new();
        drain_unit(&mut clock, 50.0);
        assert_eq!(clock.now(), 50.0);
    }

    fn drain_unit(clock: &mut Clock<()>, until: SimTime) {
        clock.run_until(until, |_, _| -> Result<(), ()> { Ok(()) }).unwrap();
    }
}
