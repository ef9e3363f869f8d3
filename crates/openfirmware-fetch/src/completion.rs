//! One-shot completion slot shared between a waiting caller and a loader
//! callback.
//!
//! The slot is reused across sequential fetches. Each fetch arms it with a
//! fresh generation; a callback only lands its result if the generation it
//! captured is still the armed one, so a late callback from an abandoned
//! (timed-out) fetch can never answer a newer one.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Generation of a slot that accepts no callback. Fetch generations start at 1.
const DISARMED: u64 = 0;

/// Result delivered by a loader callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The loader delivered a non-empty resource.
    Loaded(Vec<u8>),
    /// The loader failed or delivered nothing.
    Failed(String),
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    outcome: Option<FetchOutcome>,
}

/// Lock + condition variable pair carrying at most one [`FetchOutcome`].
#[derive(Debug, Default)]
pub struct Completion {
    slot: Mutex<Slot>,
    signal: Condvar,
}

impl Completion {
    /// Create an empty, unarmed slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare the slot for the fetch identified by `generation`, discarding
    /// anything left over from earlier fetches.
    pub fn arm(&self, generation: u64) {
        let mut slot = self.slot.lock();
        slot.generation = generation;
        slot.outcome = None;
    }

    /// Deliver `outcome` for `generation` and wake the waiter.
    ///
    /// Returns `false` (and drops the outcome) if the slot has been re-armed
    /// for another fetch or already holds a result.
    pub fn complete(&self, generation: u64, outcome: FetchOutcome) -> bool {
        let mut slot = self.slot.lock();
        if slot.generation != generation || slot.outcome.is_some() {
            return false;
        }
        slot.outcome = Some(outcome);
        drop(slot);

        self.signal.notify_one();
        true
    }

    /// Block until the outcome for `generation` arrives.
    ///
    /// With `timeout == None` this waits indefinitely. Returns `None` only
    /// when the timeout expires first.
    pub fn wait(&self, generation: u64, timeout: Option<Duration>) -> Option<FetchOutcome> {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut slot = self.slot.lock();
        loop {
            if slot.generation == generation
                && let Some(outcome) = slot.outcome.take()
            {
                return Some(outcome);
            }
            match deadline {
                None => self.signal.wait(&mut slot),
                Some(deadline) => {
                    if self.signal.wait_until(&mut slot, deadline).timed_out() {
                        if slot.generation != generation {
                            return None;
                        }
                        let outcome = slot.outcome.take();
                        if outcome.is_none() {
                            // Disarm so the late callback is rejected.
                            slot.generation = DISARMED;
                        }
                        return outcome;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_outcome_delivered_before_wait() {
        let completion = Completion::new();
        completion.arm(1);
        assert!(completion.complete(1, FetchOutcome::Loaded(vec![1, 2])));
        assert_eq!(
            completion.wait(1, None),
            Some(FetchOutcome::Loaded(vec![1, 2]))
        );
    }

    #[test]
    fn test_outcome_delivered_from_other_thread() {
        let completion = Arc::new(Completion::new());
        completion.arm(7);

        let producer = {
            let completion = Arc::clone(&completion);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                completion.complete(7, FetchOutcome::Failed("denied".into()))
            })
        };

        assert_eq!(
            completion.wait(7, None),
            Some(FetchOutcome::Failed("denied".into()))
        );
        assert!(matches!(producer.join(), Ok(true)));
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let completion = Completion::new();
        completion.arm(2);
        assert!(!completion.complete(1, FetchOutcome::Loaded(vec![0xFF])));
        assert!(completion.complete(2, FetchOutcome::Loaded(vec![0x01])));
        assert_eq!(
            completion.wait(2, None),
            Some(FetchOutcome::Loaded(vec![0x01]))
        );
    }

    #[test]
    fn test_second_completion_is_dropped() {
        let completion = Completion::new();
        completion.arm(3);
        assert!(completion.complete(3, FetchOutcome::Loaded(vec![1])));
        assert!(!completion.complete(3, FetchOutcome::Loaded(vec![2])));
    }

    #[test]
    fn test_wait_times_out() {
        let completion = Completion::new();
        completion.arm(4);
        assert_eq!(completion.wait(4, Some(Duration::from_millis(10))), None);
    }

    #[test]
    fn test_late_completion_after_timeout_is_dropped() {
        let completion = Completion::new();
        completion.arm(8);
        assert_eq!(completion.wait(8, Some(Duration::from_millis(10))), None);
        assert!(!completion.complete(8, FetchOutcome::Loaded(vec![8])));
    }

    #[test]
    fn test_rearm_clears_leftover_outcome() {
        let completion = Completion::new();
        completion.arm(5);
        assert!(completion.complete(5, FetchOutcome::Loaded(vec![5])));
        completion.arm(6);
        assert_eq!(completion.wait(6, Some(Duration::from_millis(10))), None);
    }
}
