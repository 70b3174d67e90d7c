//! Single process-wide bounded event queue (§4.11). A `VecDeque` behind one
//! mutex provides the storage; `head`/`tail` are separate atomic counters so
//! `count`/`is_empty`/`peek` can be read without taking the lock, matching
//! the spec's "poll reads head/tail atomically without locking" contract,
//! while push/pop take the lock only long enough to move one element.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::event::{Event, EventKind, EVENT_KIND_COUNT};

const DEFAULT_CAPACITY: usize = 256;

fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// The ring had no room; the newest event (the one being pushed) was
    /// dropped, per §4.11's overflow policy.
    Full,
}

pub struct AsyncEventQueue {
    capacity: usize,
    inner: Mutex<VecDeque<Event>>,
    head: AtomicUsize,
    tail: AtomicUsize,
    wake: Condvar,
}

impl Default for AsyncEventQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl AsyncEventQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = next_power_of_two(capacity);
        Self {
            capacity,
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            wake: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Thread-safe, non-blocking push. Serialized by `inner`'s mutex, which
    /// stands in for the producer-side lock the spec calls for; overflow
    /// drops the newest event and reports `PushError::Full`.
    pub fn push(&self, event: Event) -> Result<(), PushError> {
        let mut guard = self.inner.lock().expect("event queue mutex poisoned");
        if guard.len() >= self.capacity {
            tracing::warn!(target: "events.queue", capacity = self.capacity, "queue full, dropping newest event");
            return Err(PushError::Full);
        }
        guard.push_back(event);
        self.tail.fetch_add(1, Ordering::AcqRel);
        drop(guard);
        self.wake.notify_one();
        Ok(())
    }

    /// Number of queued events, readable without blocking on the producer
    /// mutex.
    pub fn count(&self) -> usize {
        self.tail.load(Ordering::Acquire).wrapping_sub(self.head.load(Ordering::Acquire))
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Non-consuming look at the next event, if any.
    pub fn peek(&self) -> Option<Event> {
        self.inner.lock().expect("event queue mutex poisoned").front().cloned()
    }

    /// Alias for `!is_empty()`, named to match the spec's operation list.
    pub fn poll(&self) -> bool {
        !self.is_empty()
    }

    /// Pop the next event in FIFO order.
    pub fn pop(&self) -> Option<Event> {
        let mut guard = self.inner.lock().expect("event queue mutex poisoned");
        let event = guard.pop_front();
        drop(guard);
        if event.is_some() {
            self.head.fetch_add(1, Ordering::AcqRel);
        }
        event
    }

    /// Block the calling thread until an event arrives or `timeout` elapses.
    /// Returns whether the queue is non-empty when it returns. The host
    /// loop's only suspension point outside `event_source.read` (§5).
    pub fn wait(&self, timeout: Duration) -> bool {
        if !self.is_empty() {
            return true;
        }
        let guard = self.inner.lock().expect("event queue mutex poisoned");
        let (_guard, _result) = self.wake.wait_timeout(guard, timeout).expect("event queue mutex poisoned");
        !self.is_empty()
    }

    /// Drain and drop every queued event, releasing any owned payloads.
    pub fn drain(&self) {
        let mut guard = self.inner.lock().expect("event queue mutex poisoned");
        let drained = guard.len();
        guard.clear();
        drop(guard);
        self.head.fetch_add(drained, Ordering::AcqRel);
    }

    /// Pop every queued event in order, dispatching each through `table`.
    pub fn dispatch_all<Ctx>(&self, ctx: &mut Ctx, table: &mut HandlerTable<Ctx>) {
        while let Some(event) = self.pop() {
            table.dispatch(ctx, &event);
        }
    }
}

/// Fixed-size table of per-`EventKind` handlers (§4.11: "handler
/// registration is a fixed-size table indexed by event type").
pub struct HandlerTable<Ctx> {
    handlers: [Option<Box<dyn FnMut(&mut Ctx, &Event) + Send>>; EVENT_KIND_COUNT],
}

impl<Ctx> Default for HandlerTable<Ctx> {
    fn default() -> Self {
        Self { handlers: [None, None, None, None, None, None, None] }
    }
}

impl<Ctx> HandlerTable<Ctx> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: EventKind, handler: impl FnMut(&mut Ctx, &Event) + Send + 'static) {
        self.handlers[kind as usize] = Some(Box::new(handler));
    }

    pub fn dispatch(&mut self, ctx: &mut Ctx, event: &Event) {
        if let Some(handler) = self.handlers[event.kind() as usize].as_mut() {
            handler(ctx, event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyCode, KeyEvent};

    #[test]
    fn capacity_rounds_up_to_power_of_two() {
        let q = AsyncEventQueue::with_capacity(200);
        assert_eq!(q.capacity(), 256);
    }

    #[test]
    fn fifo_order_preserved() {
        let q = AsyncEventQueue::with_capacity(4);
        q.push(Event::Command("a".into())).unwrap();
        q.push(Event::Command("b".into())).unwrap();
        assert_eq!(q.pop(), Some(Event::Command("a".into())));
        assert_eq!(q.pop(), Some(Event::Command("b".into())));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn overflow_drops_newest_and_reports_full() {
        let q = AsyncEventQueue::with_capacity(1);
        q.push(Event::Quit).unwrap();
        let err = q.push(Event::Command("x".into())).unwrap_err();
        assert_eq!(err, PushError::Full);
        assert_eq!(q.count(), 1);
        assert_eq!(q.pop(), Some(Event::Quit));
    }

    #[test]
    fn dispatch_all_routes_by_kind() {
        let q = AsyncEventQueue::with_capacity(8);
        q.push(Event::Key(KeyEvent::plain(KeyCode::Char('x')))).unwrap();
        q.push(Event::Quit).unwrap();
        let mut table = HandlerTable::<Vec<String>>::new();
        table.register(EventKind::Key, |ctx, _| ctx.push("key".into()));
        table.register(EventKind::Quit, |ctx, _| ctx.push("quit".into()));
        let mut seen = Vec::new();
        q.dispatch_all(&mut seen, &mut table);
        assert_eq!(seen, vec!["key".to_string(), "quit".to_string()]);
    }

    #[test]
    fn drain_empties_queue() {
        let q = AsyncEventQueue::with_capacity(4);
        q.push(Event::Quit).unwrap();
        q.push(Event::Quit).unwrap();
        q.drain();
        assert!(q.is_empty());
    }
}
