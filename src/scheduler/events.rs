mod event_holder;
pub(super) mod event_traits;

use crate::{SimState, SimTime};
use event_holder::EventHolder;
use event_traits::Event;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::ops::Add;

/// Priority queue of scheduled events, and the owner of the simulation clock.
///
/// Events execute in ascending order of due time, with ties broken by the order in which they were scheduled. Every
/// scheduling call stamps the event with the next value of a strictly increasing counter, which is what makes runs
/// with equal timestamps reproducible.
///
/// The clock only moves when [`Simulation::run_until()`] pops an event (jumping to its due time) or when a bounded
/// run stops at its horizon. Popping is not part of the public interface.
///
/// # Errors
///
/// Every scheduling method compares the resulting execution time against the current clock time. Attempting to
/// schedule an event in the past, which for [`schedule_with_delay()`] means passing a negative delay, results in an
/// [`Error::InvalidDelay`] without modifying the queue.
///
/// [`Simulation::run_until()`]: crate::scheduler::Simulation::run_until
/// [`schedule_with_delay()`]: EventQueue::schedule_with_delay
/// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
#[derive(Debug)]
pub struct EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    events: BinaryHeap<Reverse<EventHolder<State, Time>>>,
    last_execution_time: Time,
    events_added: usize,
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Construct a new [`EventQueue`] with no scheduled events and a clock initialized to the provided time.
    pub(crate) fn new(start_time: Time) -> Self {
        Self {
            events: BinaryHeap::default(),
            last_execution_time: start_time,
            events_added: 0,
        }
    }

    /// Schedule the provided event at the specified time.
    ///
    /// # Errors
    ///
    /// If `time` is less than the current clock time, returns an [`Error::InvalidDelay`] with no modifications to the
    /// queue.
    ///
    /// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
    pub fn schedule<EventType>(&mut self, event: EventType, time: Time) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        if time < self.last_execution_time {
            return Err(crate::Error::InvalidDelay);
        }

        let sequence = self.increment_event_count();
        self.events.push(Reverse(EventHolder {
            due_time: time,
            sequence,
            event: Box::new(event),
        }));
        Ok(())
    }

    /// Makes sure incrementing the internal count of added events occurs the same way across all scheduling methods.
    fn increment_event_count(&mut self) -> usize {
        let count = self.events_added;
        self.events_added += 1;
        count
    }

    /// Pop the earliest event if it is due no later than `until`, advancing the clock to its due time. Events due
    /// after `until` stay in the queue and the clock does not move.
    pub(crate) fn next_due(&mut self, until: &Time) -> Option<Box<dyn Event<State, Time>>> {
        let due = matches!(self.events.peek(), Some(Reverse(holder)) if holder.due_time <= *until);
        if !due {
            return None;
        }

        let Reverse(holder) = self.events.pop()?;
        self.last_execution_time = holder.due_time;
        Some(holder.event)
    }

    /// Move the clock forward to `time` without executing anything. Never moves the clock backwards.
    pub(crate) fn advance_to(&mut self, time: Time) {
        if time > self.last_execution_time {
            self.last_execution_time = time;
        }
    }

    /// Get a shared reference to the simulation's current clock time.
    pub fn current_time(&self) -> &Time {
        &self.last_execution_time
    }

    /// Number of events waiting to execute.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are waiting to execute.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone,
{
    /// Schedule the provided event to execute at the current sim time. Events previously scheduled for "now" will still
    /// execute before this event does.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::InvalidDelay`] only if cloning the current time somehow yields an earlier time.
    ///
    /// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
    pub fn schedule_now<EventType>(&mut self, event: EventType) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        let event_time = self.last_execution_time.clone();
        self.schedule(event, event_time)
    }
}

impl<State, Time> EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone + Add<Output = Time>,
{
    /// Schedule the provided event after the specified delay. The event's execution time will be equal to the result of
    /// `self.current_time().clone() + delay`.
    ///
    /// # Errors
    ///
    /// If the delay is negative, so that the execution time is less than the current clock time, or if the execution
    /// time overflows the clock type, returns an [`Error::InvalidDelay`] with no modifications to the queue.
    ///
    /// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
    pub fn schedule_with_delay<EventType>(&mut self, event: EventType, delay: Time) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        let event_time = self
            .last_execution_time
            .delayed_by(delay)
            .ok_or(crate::Error::InvalidDelay)?;
        self.schedule(event, event_time)
    }
}

impl<State, Time> std::fmt::Display for EventQueue<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            formatter,
            "EventQueue with {} scheduled events at current time {:?}",
            self.events.len(),
            self.last_execution_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[derive(Debug, Default)]
    struct Log {
        executed: Vec<&'static str>,
    }

    impl SimState<i64> for Log {}

    #[derive(Debug)]
    struct Mark(&'static str);

    impl Event<Log, i64> for Mark {
        fn execute(&mut self, simulation_state: &mut Log, _: &mut EventQueue<Log, i64>) -> crate::Result {
            simulation_state.executed.push(self.0);
            Ok(())
        }
    }

    fn drain(queue: &mut EventQueue<Log, i64>, until: i64) -> Log {
        let mut log = Log::default();
        while let Some(mut event) = queue.next_due(&until) {
            event.execute(&mut log, queue).unwrap();
        }
        log
    }

    #[test]
    fn ties_execute_in_scheduling_order() {
        let mut queue = EventQueue::new(0);
        queue.schedule(Mark("late"), 5).unwrap();
        queue.schedule(Mark("first"), 2).unwrap();
        queue.schedule(Mark("second"), 2).unwrap();
        queue.schedule(Mark("third"), 2).unwrap();

        let log = drain(&mut queue, 10);
        assert_eq!(vec!["first", "second", "third", "late"], log.executed);
        assert_eq!(5, *queue.current_time());
    }

    #[test]
    fn negative_delay_is_rejected_without_touching_queue() {
        let mut queue = EventQueue::new(3);
        queue.schedule(Mark("kept"), 4).unwrap();

        assert!(matches!(
            queue.schedule_with_delay(Mark("rejected"), -1),
            Err(Error::InvalidDelay)
        ));
        assert!(matches!(queue.schedule(Mark("rejected"), 2), Err(Error::InvalidDelay)));
        assert_eq!(1, queue.len());
    }

    #[test]
    fn delay_past_the_end_of_the_clock_is_rejected() {
        let mut queue = EventQueue::new(i64::MAX - 2);
        assert!(matches!(
            queue.schedule_with_delay(Mark("overflow"), 5),
            Err(Error::InvalidDelay)
        ));
        queue.schedule_with_delay(Mark("last"), 2).unwrap();
        assert_eq!(1, queue.len());
    }

    #[test]
    fn zero_delay_runs_after_events_already_due_now() {
        let mut queue = EventQueue::new(7);
        queue.schedule(Mark("earlier"), 7).unwrap();
        queue.schedule_with_delay(Mark("zero delay"), 0).unwrap();
        queue.schedule_now(Mark("now")).unwrap();

        let log = drain(&mut queue, 7);
        assert_eq!(vec!["earlier", "zero delay", "now"], log.executed);
    }

    #[test]
    fn events_beyond_horizon_stay_queued() {
        let mut queue = EventQueue::new(0);
        queue.schedule(Mark("inside"), 10).unwrap();
        queue.schedule(Mark("outside"), 11).unwrap();

        let log = drain(&mut queue, 10);
        assert_eq!(vec!["inside"], log.executed);
        assert_eq!(1, queue.len());
        assert_eq!(10, *queue.current_time());
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut queue: EventQueue<Log, i64> = EventQueue::new(4);
        queue.advance_to(2);
        assert_eq!(4, *queue.current_time());
        queue.advance_to(9);
        assert_eq!(9, *queue.current_time());
    }
}
