use super::{Library, Title};
use crate::randomness::Randomness;
use crate::resource::Admission;
use crate::scheduler::{Event, EventQueue};
use crate::Days;
use tracing::debug;

/// Where a visitor is in its lending process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorState {
    Arriving,
    /// Turned away because the wait queue was full. Terminal.
    Rejected,
    Waiting,
    Serving,
    /// Kept the copy past the loan period.
    Overdue,
    Done,
}

impl VisitorState {
    /// Whether `self -> next` is a legal step of the lending process.
    pub fn can_become(self, next: Self) -> bool {
        use VisitorState::*;
        matches!(
            (self, next),
            (Arriving, Rejected)
                | (Arriving, Waiting)
                | (Waiting, Serving)
                | (Serving, Overdue)
                | (Serving, Done)
                | (Overdue, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Done)
    }
}

/// One visitor wanting one title. Lives inside whichever event or wait queue currently carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visitor {
    id: usize,
    title: usize,
    arrival_time: Days,
    state: VisitorState,
}

impl Visitor {
    pub(crate) fn new(id: usize, title: usize, arrival_time: Days) -> Self {
        Self {
            id,
            title,
            arrival_time,
            state: VisitorState::Arriving,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Index of the wanted title within the [`Library`].
    pub fn title(&self) -> usize {
        self.title
    }

    pub fn arrival_time(&self) -> Days {
        self.arrival_time
    }

    pub fn state(&self) -> VisitorState {
        self.state
    }

    /// This visitor, moved on to `next`.
    fn enter(mut self, next: VisitorState) -> Self {
        debug_assert!(
            self.state.can_become(next),
            "visitor {} cannot go from {:?} to {:?}",
            self.id,
            self.state,
            next
        );
        self.state = next;
        self
    }
}

/// How a loan ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    OnTime,
    Overdue { extra_days: Days },
}

impl ReturnOutcome {
    /// Decide a return from one uniform draw on `[0, 1)`: on time when `on_time_draw < return_probability`. The
    /// extension is only drawn, through `extra_days`, for late returns.
    pub fn decide(on_time_draw: f64, return_probability: f64, extra_days: impl FnOnce() -> Days) -> Self {
        if on_time_draw < return_probability {
            Self::OnTime
        } else {
            Self::Overdue {
                extra_days: extra_days(),
            }
        }
    }
}

/// A spawned visitor reaches the desk and asks for a copy.
#[derive(Debug)]
pub(super) struct VisitorArrives {
    pub visitor: Visitor,
}

impl<R> Event<Library<R>, Days> for VisitorArrives
where
    R: Randomness,
{
    fn execute(&mut self, library: &mut Library<R>, event_queue: &mut EventQueue<Library<R>, Days>) -> crate::Result {
        let now = *event_queue.current_time();
        let visitor = self.visitor;
        let title = &mut library.titles[visitor.title];
        title.log.record_arrival(now, title.copies.queue_len());

        match title.copies.try_acquire(visitor.enter(VisitorState::Waiting)) {
            Admission::Granted(waiting) => start_loan(waiting, library, event_queue),
            Admission::Queued => {
                debug!(
                    "{now} days: visitor {} joined the queue for {} ({} waiting)",
                    visitor.id,
                    title.name,
                    title.copies.queue_len()
                );
                Ok(())
            },
            Admission::Rejected(_) => {
                let rejected = visitor.enter(VisitorState::Rejected);
                title.log.record_drop();
                debug!("{now} days: visitor {} dropped, queue for {} is full", rejected.id, title.name);
                Ok(())
            },
        }
    }
}

/// The loan period is over and the visitor decides whether to bring the copy back.
#[derive(Debug)]
struct LoanDue {
    visitor: Visitor,
}

impl<R> Event<Library<R>, Days> for LoanDue
where
    R: Randomness,
{
    fn execute(&mut self, library: &mut Library<R>, event_queue: &mut EventQueue<Library<R>, Days>) -> crate::Result {
        let now = *event_queue.current_time();
        let policy = library.policy;
        let draw = library.rng.unit();
        let outcome = ReturnOutcome::decide(draw, policy.return_probability, || {
            library.rng.days_between(policy.overdue.low, policy.overdue.high)
        });

        let title = &mut library.titles[self.visitor.title];
        match outcome {
            ReturnOutcome::OnTime => {
                title.log.record_return(false);
                debug!("{now} days: visitor {} returned {} on time", self.visitor.id, title.name);
                return_copy(self.visitor.enter(VisitorState::Done), library, event_queue)
            },
            ReturnOutcome::Overdue { extra_days } => {
                title.log.record_return(true);
                title.log.add_busy_time(extra_days);
                debug!(
                    "{now} days: visitor {} is late and keeps {} {extra_days} extra days",
                    self.visitor.id, title.name
                );
                let visitor = self.visitor.enter(VisitorState::Overdue);
                event_queue.schedule_with_delay(LateReturn { visitor }, extra_days)
            },
        }
    }
}

/// An overdue copy finally comes back.
#[derive(Debug)]
struct LateReturn {
    visitor: Visitor,
}

impl<R> Event<Library<R>, Days> for LateReturn
where
    R: Randomness,
{
    fn execute(&mut self, library: &mut Library<R>, event_queue: &mut EventQueue<Library<R>, Days>) -> crate::Result {
        debug!(
            "{} days: visitor {} returned {} after the extension",
            event_queue.current_time(),
            self.visitor.id,
            library.titles[self.visitor.title].name
        );
        return_copy(self.visitor.enter(VisitorState::Done), library, event_queue)
    }
}

/// Hand a copy to a waiting visitor: record the wait and the busy time, then schedule the end of the loan.
fn start_loan<R>(
    visitor: Visitor,
    library: &mut Library<R>,
    event_queue: &mut EventQueue<Library<R>, Days>,
) -> crate::Result
where
    R: Randomness,
{
    let now = *event_queue.current_time();
    let loan_duration = library.policy.loan_duration;
    let Title { name, log, .. } = &mut library.titles[visitor.title];

    let wait = now - visitor.arrival_time;
    log.record_loan_start(wait);
    log.add_busy_time(loan_duration);
    debug!("{now} days: visitor {} borrows {name} after waiting {wait} days", visitor.id);

    let visitor = visitor.enter(VisitorState::Serving);
    event_queue.schedule_with_delay(LoanDue { visitor }, loan_duration)
}

/// Put a copy back on the shelf, or straight into the hands of whoever waited longest.
fn return_copy<R>(
    visitor: Visitor,
    library: &mut Library<R>,
    event_queue: &mut EventQueue<Library<R>, Days>,
) -> crate::Result
where
    R: Randomness,
{
    debug_assert!(visitor.state.is_terminal());
    match library.titles[visitor.title].copies.release() {
        Some(next) => start_loan(next, library, event_queue),
        None => Ok(()),
    }
}
