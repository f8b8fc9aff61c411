use std::fmt::Debug;
use std::ops::Add;

/// The generic type used for a simulation's clock.
///
/// This trait is a superset of [`Ord`] and [`Debug`] whose one provided method computes delayed times. The [`Ord`] implementation
/// decides the order in which events execute: events run in ascending order of execution time, and ties are resolved
/// by the order in which they were scheduled.
///
/// Implementations are provided for the signed and unsigned integer types. The library model runs on
/// [`Days`](crate::Days), a signed integer, so that a negative holding time is caught as
/// [`Error::InvalidDelay`](crate::Error::InvalidDelay) instead of wrapping around.
///
/// Floating-point builtins do not implement [`Ord`]. Enable the `ordered-float` feature to use the [`OrderedFloat`]
/// and [`NotNan`] wrappers from the [`ordered-float`] crate as a fractional clock.
///
/// [`ordered-float`]: https://docs.rs/ordered-float/4
/// [`OrderedFloat`]: https://docs.rs/ordered-float/4/ordered_float/struct.OrderedFloat.html
/// [`NotNan`]: https://docs.rs/ordered-float/4/ordered_float/struct.NotNan.html
pub trait SimTime: Ord + Debug {
    /// The time `delay` after `self`, or `None` if it cannot be represented. The integer implementations check for
    /// overflow; everything else falls back to plain addition.
    fn delayed_by(&self, delay: Self) -> Option<Self>
    where
        Self: Sized + Clone + Add<Output = Self>,
    {
        Some(self.clone() + delay)
    }
}

macro_rules! integer_sim_time {
    ($($int:ty),*) => {
        $(
            impl SimTime for $int {
                fn delayed_by(&self, delay: Self) -> Option<Self> {
                    self.checked_add(delay)
                }
            }
        )*
    };
}

integer_sim_time!(u32, u64, usize, i32, i64, isize);

#[cfg(feature = "ordered-float")]
impl<Float> SimTime for ordered_float::OrderedFloat<Float> where Float: ordered_float::FloatCore + Debug {}

#[cfg(feature = "ordered-float")]
impl<Float> SimTime for ordered_float::NotNan<Float> where Float: ordered_float::FloatCore + Debug {}

/// The generic type used for a simulation's overall state.
///
/// For the library model this is [`Library`](crate::library::Library): every title's copies, wait queue and
/// statistics log, plus the random-number source. Events receive exclusive access to it while they execute.
///
/// The single method gives [`Simulation::run_until()`] a way to stop before the horizon. The default answer is
/// "never", so a run continues until the horizon or until the event queue empties out.
///
/// [`Simulation::run_until()`]: crate::scheduler::Simulation::run_until
pub trait SimState<Time>
where
    Time: SimTime,
{
    /// Reports whether the simulation has run to completion. Invoked before popping each event off the queue: `true`
    /// makes [`Simulation::run_until()`] return immediately, leaving any remaining events in the queue.
    ///
    /// [`Simulation::run_until()`]: crate::scheduler::Simulation::run_until
    #[allow(unused_variables)]
    fn is_complete(&self, current_time: &Time) -> bool {
        false
    }
}
