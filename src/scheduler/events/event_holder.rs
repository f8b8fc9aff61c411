use super::Event;
use crate::{SimState, SimTime};
use std::cmp::Ordering;

/// Helper struct for the event queue. Holds a [`Box`] to the event itself alongside its sort key: the due time and the
/// sequence number assigned when it was scheduled.
///
/// The implementation of [`Ord`] compares due times first and sequence numbers only to break ties, so events due at
/// the same instant execute in the order they were scheduled.
#[derive(Debug)]
pub(super) struct EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    pub due_time: Time,
    pub sequence: usize,
    pub event: Box<dyn Event<State, Time>>,
}

impl<State, Time> PartialEq<Self> for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence && self.due_time == other.due_time
    }
}

impl<State, Time> Eq for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
}

impl<State, Time> PartialOrd<Self> for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<State, Time> Ord for EventHolder<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_time
            .cmp(&other.due_time)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}
