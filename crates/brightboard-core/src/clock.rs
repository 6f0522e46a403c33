//! Deterministic timers. The session advances a millisecond clock and
//! collects due timer events; the host decides how wall time maps onto it.

use crate::stroke::{AssistPointId, StrokeId};

/// Milliseconds since session start.
pub type Millis = u64;

/// What a due timer means to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The visibility delay for an assistance point has elapsed.
    ArmSparkle(AssistPointId),
    /// Reveal the next character of a typing ai-text stroke.
    TypeTick(StrokeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    due: Millis,
    event: TimerEvent,
}

/// A queue of one-shot timers keyed against the virtual clock.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Millis,
    next_id: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    /// Schedule `event` to fire `delay` ms from now.
    pub fn schedule(&mut self, delay: Millis, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due: self.now + delay,
            event,
        });
        id
    }

    /// Cancel a pending timer. Cancelling an already-fired timer is a no-op.
    pub fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|e| e.id != id);
    }

    /// Cancel every pending type tick for the given stroke.
    pub fn cancel_typing(&mut self, stroke: StrokeId) {
        self.entries.retain(|e| e.event != TimerEvent::TypeTick(stroke));
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Advance the clock by `delta` ms and drain timers that came due,
    /// in due-time order (FIFO among equal due times).
    pub fn advance(&mut self, delta: Millis) -> Vec<TimerEvent> {
        self.now += delta;
        let now = self.now;
        let mut due: Vec<(usize, Millis)> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .map(|(i, e)| (i, e.due))
            .collect();
        due.sort_by_key(|&(i, due)| (due, i));
        let fired: Vec<TimerEvent> = due
            .iter()
            .map(|&(i, _)| self.entries[i].event)
            .collect();
        self.entries.retain(|e| e.due > now);
        fired
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.due).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_fires_in_due_order() {
        let mut q = TimerQueue::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        q.schedule(200, TimerEvent::ArmSparkle(a));
        q.schedule(100, TimerEvent::ArmSparkle(b));
        let fired = q.advance(250);
        assert_eq!(
            fired,
            vec![TimerEvent::ArmSparkle(b), TimerEvent::ArmSparkle(a)]
        );
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn test_partial_advance() {
        let mut q = TimerQueue::new();
        let a = Uuid::new_v4();
        q.schedule(3000, TimerEvent::ArmSparkle(a));
        assert!(q.advance(2999).is_empty());
        assert_eq!(q.advance(1), vec![TimerEvent::ArmSparkle(a)]);
    }

    #[test]
    fn test_cancel() {
        let mut q = TimerQueue::new();
        let a = Uuid::new_v4();
        let id = q.schedule(100, TimerEvent::ArmSparkle(a));
        q.cancel(id);
        assert!(q.advance(200).is_empty());
    }

    #[test]
    fn test_cancel_typing_only_hits_one_stroke() {
        let mut q = TimerQueue::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        q.schedule(100, TimerEvent::TypeTick(a));
        q.schedule(100, TimerEvent::TypeTick(b));
        q.cancel_typing(a);
        assert_eq!(q.advance(100), vec![TimerEvent::TypeTick(b)]);
    }
}
