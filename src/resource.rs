//! A capacity-limited service point with a bounded FIFO wait queue.

use crate::Error;
use std::collections::VecDeque;

/// Outcome of asking a [`Resource`] for one of its copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission<Requester> {
    /// A copy was free. The requester holds it as of now and is handed back to continue its process.
    Granted(Requester),
    /// Every copy is out. The requester now sits at the back of the wait queue and will be returned by a later
    /// [`Resource::release()`].
    Queued,
    /// Every copy is out and the wait queue is full. The requester is handed back untouched and was never queued.
    Rejected(Requester),
}

/// A pool of identical copies (`capacity`) with a wait queue of at most `max_queue_size` requesters.
///
/// Requesters are stored by value while they wait, so the queue is the only place a waiting process lives. The queue
/// is served strictly in arrival order. When a copy is released while someone is waiting, the copy passes straight to
/// the head of the queue at the same instant and `in_use` does not change.
#[derive(Debug, Clone)]
pub struct Resource<Requester> {
    capacity: usize,
    in_use: usize,
    max_queue_size: usize,
    wait_queue: VecDeque<Requester>,
}

impl<Requester> Resource<Requester> {
    /// Create a resource with all copies available and an empty wait queue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `capacity` is zero.
    pub fn new(capacity: usize, max_queue_size: usize) -> crate::Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidConfiguration(
                "a resource needs at least one copy".into(),
            ));
        }

        Ok(Self {
            capacity,
            in_use: 0,
            max_queue_size,
            wait_queue: VecDeque::with_capacity(max_queue_size),
        })
    }

    /// Grant a free copy, else queue the requester if there is room, else reject it.
    pub fn try_acquire(&mut self, requester: Requester) -> Admission<Requester> {
        if self.in_use < self.capacity {
            self.in_use += 1;
            Admission::Granted(requester)
        } else if self.wait_queue.len() < self.max_queue_size {
            self.wait_queue.push_back(requester);
            Admission::Queued
        } else {
            Admission::Rejected(requester)
        }
    }

    /// Give back one copy. If anyone is waiting, the head of the queue takes the copy over and is returned so its
    /// process can continue at the current instant.
    pub fn release(&mut self) -> Option<Requester> {
        debug_assert!(self.in_use > 0, "released a copy that was never acquired");

        let next = self.wait_queue.pop_front();
        if next.is_none() {
            self.in_use = self.in_use.saturating_sub(1);
        }
        next
    }

    /// Number of copies this resource was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Copies currently held by requesters.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Longest the wait queue may grow before arrivals are rejected.
    pub fn max_queue_size(&self) -> usize {
        self.max_queue_size
    }

    /// Number of requesters currently waiting.
    pub fn queue_len(&self) -> usize {
        self.wait_queue.len()
    }

    /// Waiting requesters, head of the queue first.
    pub fn waiting(&self) -> impl Iterator<Item = &Requester> {
        self.wait_queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grants_until_capacity_then_queues_then_rejects() {
        let mut copies = Resource::new(2, 1).unwrap();

        assert_eq!(Admission::Granted("a"), copies.try_acquire("a"));
        assert_eq!(Admission::Granted("b"), copies.try_acquire("b"));
        assert_eq!(Admission::Queued, copies.try_acquire("c"));
        assert_eq!(Admission::Rejected("d"), copies.try_acquire("d"));

        assert_eq!(2, copies.in_use());
        assert_eq!(1, copies.queue_len());
    }

    #[test]
    fn release_hands_copy_to_queue_head_in_fifo_order() {
        let mut copies = Resource::new(1, 3).unwrap();
        copies.try_acquire(0);
        for waiting in 1..=3 {
            assert_eq!(Admission::Queued, copies.try_acquire(waiting));
        }

        assert_eq!(Some(1), copies.release());
        assert_eq!(1, copies.in_use(), "copy should pass straight to the next requester");
        assert_eq!(vec![2, 3], copies.waiting().copied().collect::<Vec<_>>());

        assert_eq!(Some(2), copies.release());
        assert_eq!(Some(3), copies.release());
        assert_eq!(None, copies.release());
        assert_eq!(0, copies.in_use());
    }

    #[test]
    fn zero_queue_bound_still_grants_free_copies() {
        let mut copies = Resource::new(1, 0).unwrap();
        assert_eq!(Admission::Granted(1), copies.try_acquire(1));
        assert_eq!(Admission::Rejected(2), copies.try_acquire(2));
        assert_eq!(0, copies.queue_len());

        copies.release();
        assert_eq!(Admission::Granted(3), copies.try_acquire(3));
    }

    #[test]
    fn zero_capacity_is_a_configuration_error() {
        assert!(matches!(
            Resource::<u32>::new(0, 5),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
