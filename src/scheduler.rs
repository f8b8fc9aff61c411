//! Virtual-time event scheduling.
//!
//! A [`Simulation`] owns its state and an [`EventQueue`]. Each [`Event`] receives exclusive access to both while it
//! executes, so it can mutate the state and schedule its own continuations. Nothing here runs on more than one thread:
//! a process that "waits" is an event that schedules the next step of itself and returns.

mod events;
mod simulation;

pub use events::event_traits::Event;
pub use events::EventQueue;
pub use simulation::Simulation;
