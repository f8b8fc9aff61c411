use super::{Event, EventQueue};
use crate::{SimState, SimTime};

use std::fmt::Formatter;
use std::ops::Add;

/// Contains the event queue and other state belonging to a simulation.
///
/// A [`Simulation`] owns both its state and its event queue, providing shared and mutable access to each so clients
/// can set up and tear down runs as needed - for example, scheduling the first arrival or reading the final
/// statistics.
///
/// The expected workflow for a Simulation is:
///
/// 1. Initialize a struct that implements [`SimState`].
/// 2. Pass this struct and the start time to [`new()`].
/// 3. Schedule at least one initial event.
/// 4. Call [`run_until()`] with the horizon. Handle any error it might return.
/// 5. Use the [`state()`] accessor to collect the results.
///
/// [`new()`]: Simulation::new
/// [`run_until()`]: Simulation::run_until
/// [`state()`]: Simulation::state
#[derive(Debug)]
pub struct Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// A priority queue of events that have been scheduled to execute, ordered ascending by execution time.
    event_queue: EventQueue<State, Time>,
    /// The current shared state of the Simulation. Exclusive access will be granted to each event that executes.
    state: State,
}

impl<State, Time> Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Initialize a Simulation instance with the provided starting state and an event queue with clock set to the
    /// provided starting time.
    pub fn new(initial_state: State, start_time: Time) -> Self {
        Self {
            event_queue: EventQueue::new(start_time),
            state: initial_state,
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
        self.event_queue.schedule(event, time)
    }

    /// Get a shared reference to the current clock time.
    pub fn current_time(&self) -> &Time {
        self.event_queue.current_time()
    }

    /// Get a shared reference to the simulation state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Get an exclusive reference to the simulation state.
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Get a shared reference to the event queue.
    pub fn event_queue(&self) -> &EventQueue<State, Time> {
        &self.event_queue
    }

    /// Consume the simulation, keeping only its state.
    pub fn into_state(self) -> State {
        self.state
    }
}

impl<State, Time> Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone,
{
    /// Execute events from the priority queue, one at a time, in ascending order by execution time, up to and
    /// including events due exactly at `until`.
    ///
    /// Follows this loop:
    ///
    /// 1. Does [`state.is_complete()`] return true? If so, return `Ok(())`.
    /// 2. Pop the next event due no later than `until`. If there isn't one, move the clock to `until` and return
    ///    `Ok(())`.
    /// 3. Pass exclusive references to the state and event queue to [`event.execute()`].
    ///     1. If an error is returned, forward it as-is to the caller.
    ///     2. Otherwise, go back to step 1.
    ///
    /// Events due after `until` remain queued, so calling this method again with a later horizon continues the same
    /// run.
    ///
    /// # Errors
    ///
    /// Errors returned by events are passed back to the caller unchanged, most likely an [`Error::InvalidDelay`] from
    /// an event that tried to schedule its continuation in the past.
    ///
    /// [`state.is_complete()`]: SimState::is_complete
    /// [`event.execute()`]: Event::execute
    /// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
    pub fn run_until(&mut self, until: Time) -> crate::Result {
        while !self.state.is_complete(self.event_queue.current_time()) {
            let Some(mut next_event) = self.event_queue.next_due(&until) else {
                self.event_queue.advance_to(until);
                return Ok(());
            };
            next_event.execute(&mut self.state, &mut self.event_queue)?;
        }
        Ok(())
    }

    /// Schedule the provided event to execute at the current sim time. Events previously scheduled for "now" will still
    /// execute before this event does.
    ///
    /// # Errors
    ///
    /// See [`EventQueue::schedule_now()`].
    pub fn schedule_now<EventType>(&mut self, event: EventType) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        self.event_queue.schedule_now(event)
    }
}

impl<State, Time> Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime + Clone + Add<Output = Time>,
{
    /// Schedule the provided event after the specified delay. The event's execution time will be equal to the result of
    /// `self.current_time().clone() + delay`.
    ///
    /// # Errors
    ///
    /// If the delay is negative, returns an [`Error::InvalidDelay`] with no modifications to the queue.
    ///
    /// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
    pub fn schedule_with_delay<EventType>(&mut self, event: EventType, delay: Time) -> crate::Result
    where
        EventType: Event<State, Time> + 'static,
    {
        self.event_queue.schedule_with_delay(event, delay)
    }
}

impl<State, Time> std::fmt::Display for Simulation<State, Time>
where
    State: SimState<Time>,
    Time: SimTime,
{
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Simulation at time {:?}", self.event_queue.current_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[derive(Debug)]
    struct State {
        executed_event_values: Vec<u32>,
        complete: bool,
    }
    impl SimState<i64> for State {
        fn is_complete(&self, _: &i64) -> bool {
            self.complete
        }
    }

    #[derive(Debug)]
    struct TestEvent {
        value: u32,
    }

    impl Event<State, i64> for TestEvent {
        fn execute(&mut self, simulation_state: &mut State, _: &mut EventQueue<State, i64>) -> crate::Result {
            simulation_state.executed_event_values.push(self.value);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct CompletionEvent {}

    impl Event<State, i64> for CompletionEvent {
        fn execute(&mut self, simulation_state: &mut State, _: &mut EventQueue<State, i64>) -> crate::Result {
            simulation_state.complete = true;
            Ok(())
        }
    }

    /// Reschedules itself with a fixed delay, like a process waiting out a duration.
    #[derive(Debug)]
    struct Repeating {
        delay: i64,
    }

    impl Event<State, i64> for Repeating {
        fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, i64>) -> crate::Result {
            simulation_state.executed_event_values.push(*event_queue.current_time() as u32);
            event_queue.schedule_with_delay(Repeating { delay: self.delay }, self.delay)
        }
    }

    fn setup() -> Simulation<State, i64> {
        let mut sim = Simulation::new(
            State {
                executed_event_values: Vec::with_capacity(3),
                complete: false,
            },
            0,
        );

        let events: [TestEvent; 3] = [TestEvent { value: 1 }, TestEvent { value: 3 }, TestEvent { value: 2 }];

        for (i, event) in events.into_iter().enumerate() {
            sim.schedule(event, 2 * i as i64).unwrap();
        }
        sim
    }

    #[test]
    fn simulation_executes_events() {
        let mut sim = setup();
        sim.run_until(100).unwrap();

        let expected = vec![1, 3, 2];
        assert_eq!(
            expected, sim.state().executed_event_values,
            "events did not execute in correct order"
        );
        assert_eq!(100, *sim.current_time(), "clock should stop at the horizon");
    }

    #[test]
    fn simulation_stops_with_events_still_in_queue() {
        let mut sim = setup();
        sim.schedule(CompletionEvent {}, 3).unwrap();
        sim.run_until(100).unwrap();

        let expected = vec![1, 3];
        assert_eq!(
            expected, sim.state().executed_event_values,
            "simulation did not terminate with completion event"
        );
        assert_eq!(3, *sim.current_time());
    }

    #[test]
    fn horizon_is_inclusive_and_runs_can_resume() {
        let mut sim = Simulation::new(
            State {
                executed_event_values: Vec::new(),
                complete: false,
            },
            0,
        );
        sim.schedule_with_delay(Repeating { delay: 3 }, 3).unwrap();

        sim.run_until(9).unwrap();
        assert_eq!(vec![3, 6, 9], sim.state().executed_event_values);

        sim.run_until(13).unwrap();
        assert_eq!(vec![3, 6, 9, 12], sim.state().executed_event_values);
        assert_eq!(13, *sim.current_time());
        assert_eq!(1, sim.event_queue().len(), "the event due at 15 should still be pending");
    }

    #[test]
    fn negative_delay_from_an_event_aborts_the_run() {
        let mut sim = setup();
        sim.schedule(Repeating { delay: -1 }, 1).unwrap();

        let result = sim.run_until(100);
        assert!(matches!(result, Err(Error::InvalidDelay)));
        assert_eq!(vec![1, 1], sim.state().executed_event_values);
    }
}
