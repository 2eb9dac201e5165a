use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, trace};

use crate::{
    error::{Result, SchedulerError},
    types::EventHandle,
};

/// Queue ordering key: fire time, then priority, then insertion order.
type QueueKey = (DateTime<Utc>, u8, u64);

struct Slot<A> {
    key: QueueKey,
    /// `Some` for recurring timers.
    period: Option<Duration>,
    action: A,
}

/// Time-ordered queue of deferred actions, advanced only by [`run_pending`].
///
/// Nothing runs in the background; "now" is always supplied by the caller,
/// which keeps the queue deterministic under test.
///
/// [`run_pending`]: Scheduler::run_pending
pub struct Scheduler<A> {
    queue: BTreeMap<QueueKey, EventHandle>,
    slots: HashMap<EventHandle, Slot<A>>,
    next_seq: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            queue: BTreeMap::new(),
            slots: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<A: Clone> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to fire once, `delay` after `now`.
    pub fn enter(&mut self, delay: Duration, priority: u8, action: A, now: DateTime<Utc>) -> EventHandle {
        self.insert(now + delay, priority, None, action)
    }

    /// Queue `action` to fire `delay` after `now` and then every `period`.
    ///
    /// The returned handle stays valid until cancelled.
    pub fn enter_recurring(
        &mut self,
        delay: Duration,
        period: Duration,
        priority: u8,
        action: A,
        now: DateTime<Utc>,
    ) -> EventHandle {
        self.insert(now + delay, priority, Some(period), action)
    }

    /// Remove a pending action. Fails when the handle is no longer queued.
    pub fn cancel(&mut self, handle: EventHandle) -> Result<()> {
        let slot = self
            .slots
            .remove(&handle)
            .ok_or(SchedulerError::EventNotFound { handle })?;
        self.queue.remove(&slot.key);
        debug!(%handle, "event cancelled");
        Ok(())
    }

    pub fn is_pending(&self, handle: EventHandle) -> bool {
        self.slots.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Fire time of the earliest queued action.
    pub fn next_fire_at(&self) -> Option<DateTime<Utc>> {
        self.queue.keys().next().map(|(at, _, _)| *at)
    }

    /// Pop every action due at or before `now`, in queue order.
    ///
    /// Recurring timers are re-armed at their next occurrence after `now`;
    /// occurrences missed while nobody polled collapse into a single firing.
    pub fn run_pending(&mut self, now: DateTime<Utc>) -> Vec<A> {
        let mut fired = Vec::new();
        while let Some((&key, &handle)) = self.queue.first_key_value() {
            if key.0 > now {
                break;
            }
            self.queue.remove(&key);
            let Some(mut slot) = self.slots.remove(&handle) else {
                continue;
            };
            trace!(%handle, at = %key.0, "event fired");

            match slot.period {
                Some(period) if period > Duration::zero() => {
                    let mut next = key.0 + period;
                    while next <= now {
                        next += period;
                    }
                    let rearmed = (next, key.1, self.bump_seq());
                    fired.push(slot.action.clone());
                    slot.key = rearmed;
                    self.queue.insert(rearmed, handle);
                    self.slots.insert(handle, slot);
                }
                _ => fired.push(slot.action),
            }
        }
        fired
    }

    fn insert(
        &mut self,
        at: DateTime<Utc>,
        priority: u8,
        period: Option<Duration>,
        action: A,
    ) -> EventHandle {
        let seq = self.bump_seq();
        let handle = EventHandle(seq);
        let key = (at, priority, seq);
        self.queue.insert(key, handle);
        self.slots.insert(handle, Slot { key, period, action });
        handle
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
