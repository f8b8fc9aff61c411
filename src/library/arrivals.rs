use super::visitor::{Visitor, VisitorArrives};
use super::Library;
use crate::randomness::Randomness;
use crate::scheduler::{Event, EventQueue, Simulation};
use crate::Days;

/// The arrival process. Each firing spawns one visitor and reschedules itself after a fresh inter-arrival gap, for as
/// long as the run lasts.
#[derive(Debug)]
pub(super) struct NextArrival {}

impl NextArrival {
    /// Schedule the first arrival one gap after the start of the run.
    pub(super) fn schedule_first<R>(sim: &mut Simulation<Library<R>, Days>) -> crate::Result
    where
        R: Randomness,
    {
        let delay = sim.state_mut().draw_inter_arrival();
        sim.schedule_with_delay(Self {}, delay)
    }
}

impl<R> Event<Library<R>, Days> for NextArrival
where
    R: Randomness,
{
    fn execute(&mut self, library: &mut Library<R>, event_queue: &mut EventQueue<Library<R>, Days>) -> crate::Result {
        let title = library.choose_title();
        library.visitors_spawned += 1;
        let visitor = Visitor::new(library.visitors_spawned, title, *event_queue.current_time());
        event_queue.schedule_now(VisitorArrives { visitor })?;

        let delay = library.draw_inter_arrival();
        event_queue.schedule_with_delay(Self {}, delay)
    }
}
