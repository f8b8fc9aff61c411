use super::EventQueue;
use crate::{SimState, SimTime};
use std::fmt::Debug;

/// A behavior or state change that occurs within a simulation.
///
/// This trait has one required method that describes what happens when the implementing type executes. It is generic
/// over the types used to represent simulation state and clock time so that events, state and clock work together.
///
/// Requiring implementors to be [`Debug`] enables printing the full contents of an [`EventQueue`] when necessary.
///
/// There is no notion of interrupting or cancelling an event once scheduled. Processes that need to wait for a
/// condition, such as a free copy of a title, register themselves with whatever will later signal that condition and
/// let it schedule their continuation.
pub trait Event<State, Time>: Debug
where
    State: SimState<Time>,
    Time: SimTime,
{
    /// Update the simulation according to the specific type of event. [`Simulation::run_until()`] invokes this method
    /// for each due event in sequence, with exclusive access to the simulation's state and to the event queue.
    ///
    /// The clock, accessible through `event_queue`, is advanced to this event's due time before the call.
    ///
    /// # Errors
    ///
    /// Any error returned here stops the run and is handed back to the caller of [`Simulation::run_until()`]
    /// unchanged. In practice this is an [`Error::InvalidDelay`] from scheduling a continuation in the past.
    ///
    /// [`Simulation::run_until()`]: crate::scheduler::Simulation::run_until
    /// [`Error::InvalidDelay`]: crate::Error::InvalidDelay
    fn execute(&mut self, simulation_state: &mut State, event_queue: &mut EventQueue<State, Time>) -> crate::Result;
}
