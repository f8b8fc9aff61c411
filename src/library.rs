//! The lending model: titles with a fixed number of copies, visitors who borrow them, and the arrival process that
//! brings visitors in.
//!
//! A run is a [`Simulation`] over a [`Library`] state with a clock in whole [`Days`]. [`prepare()`] builds the state
//! from a [`SimulationConfig`] and schedules the first arrival; from there every event schedules its own
//! continuations:
//!
//! * an arrival spawns a visitor at the current instant and schedules the next arrival,
//! * a visitor samples the queue, then borrows a copy, waits for one, or is turned away,
//! * at the end of the loan one draw decides between an on-time return and an overdue extension,
//! * every return hands the copy to the head of the wait queue, if anyone is waiting.
//!
//! [`simulate()`] runs all of this to the configured horizon and collects a [`SimulationReport`].

mod arrivals;
mod visitor;

pub use visitor::{ReturnOutcome, Visitor, VisitorState};

use crate::config::DayRange;
use crate::randomness::Randomness;
use crate::resource::Resource;
use crate::scheduler::Simulation;
use crate::statistics::{QueueMetrics, StatisticsLog};
use crate::{SimState, SimulationConfig};
use arrivals::NextArrival;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;
use tracing::{info, warn};

/// Simulation clock unit for the library model.
pub type Days = i64;

/// The parts of the configuration events consult while the run is going.
#[derive(Debug, Clone, Copy)]
struct LoanPolicy {
    loan_duration: Days,
    return_probability: f64,
    inter_arrival: DayRange,
    overdue: DayRange,
}

/// One title: its copies, the visitors waiting for them, and everything observed about it.
#[derive(Debug)]
pub struct Title {
    name: String,
    copies: Resource<Visitor>,
    log: StatisticsLog,
}

impl Title {
    /// Name as given in the configuration.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The copies of this title and the visitors queueing for them.
    pub fn copies(&self) -> &Resource<Visitor> {
        &self.copies
    }

    /// Everything observed about this title so far.
    pub fn log(&self) -> &StatisticsLog {
        &self.log
    }
}

/// Simulation state for a library run.
#[derive(Debug)]
pub struct Library<R> {
    titles: Vec<Title>,
    policy: LoanPolicy,
    rng: R,
    visitors_spawned: usize,
}

impl<R> Library<R>
where
    R: Randomness,
{
    /// Validate `config` and build one title per configured name, all copies on the shelf.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) for any out-of-range parameter.
    pub fn new(config: &SimulationConfig, rng: R) -> crate::Result<Self> {
        config.validate()?;
        let capacity = config.capacity()?;
        let queue_bound = config.queue_bound()?;

        let titles = config
            .titles
            .iter()
            .map(|name| -> crate::Result<Title> {
                Ok(Title {
                    name: name.clone(),
                    copies: Resource::new(capacity, queue_bound)?,
                    log: StatisticsLog::default(),
                })
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Self {
            titles,
            policy: LoanPolicy {
                loan_duration: config.loan_duration,
                return_probability: config.return_probability,
                inter_arrival: config.inter_arrival,
                overdue: config.overdue_extension,
            },
            rng,
            visitors_spawned: 0,
        })
    }

    fn draw_inter_arrival(&mut self) -> Days {
        self.rng
            .days_between(self.policy.inter_arrival.low, self.policy.inter_arrival.high)
    }

    /// A single title is always chosen without a draw.
    fn choose_title(&mut self) -> usize {
        match self.titles.len() {
            1 => 0,
            len => self.rng.index(len),
        }
    }
}

impl<R> Library<R> {
    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    /// Every visitor the arrival process has created so far, across all titles.
    pub fn visitors_spawned(&self) -> usize {
        self.visitors_spawned
    }
}

impl<R> SimState<Days> for Library<R> {}

/// Build a library from `config` and schedule its first arrival. The returned simulation starts at day 0 and is
/// advanced with [`Simulation::run_until()`].
///
/// # Errors
///
/// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) for any out-of-range parameter.
pub fn prepare<R>(config: &SimulationConfig, rng: R) -> crate::Result<Simulation<Library<R>, Days>>
where
    R: Randomness,
{
    let library = Library::new(config, rng)?;
    let mut sim = Simulation::new(library, 0);
    NextArrival::schedule_first(&mut sim)?;
    Ok(sim)
}

/// Run `config` to its horizon with a [`Pcg64`] seeded from `config.random_seed`.
///
/// # Errors
///
/// See [`simulate_with()`].
pub fn simulate(config: &SimulationConfig) -> crate::Result<SimulationReport> {
    info!("Seeding random draws with {}", config.random_seed);
    simulate_with(config, Pcg64::seed_from_u64(config.random_seed))
}

/// Run `config` to its horizon, taking every random draw from `rng`.
///
/// # Errors
///
/// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) before the run starts, or
/// [`Error::InvalidDelay`](crate::Error::InvalidDelay) if the process model ever schedules into the past.
pub fn simulate_with<R>(config: &SimulationConfig, rng: R) -> crate::Result<SimulationReport>
where
    R: Randomness,
{
    let mut sim = prepare(config, rng)?;
    info!(
        "Simulating {} title(s) with {} copies each for {} days",
        config.titles.len(),
        config.num_copies,
        config.sim_time
    );

    sim.run_until(config.sim_time)?;

    let report = SimulationReport::from_library(&sim.into_state(), config.sim_time);
    for title in &report.titles {
        if !title.metrics.steady_state.is_stable() {
            warn!(
                "{} is overloaded (rho = {:.2}); no finite steady state",
                title.title, title.metrics.utilization
            );
        }
    }
    info!("Simulation finished with {} visitors", report.visitors_spawned);
    Ok(report)
}

/// Everything a run produced, ready for a reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub horizon: Days,
    pub loan_duration: Days,
    /// Visitors created by the arrival process over the whole run.
    pub visitors_spawned: usize,
    pub titles: Vec<TitleReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleReport {
    pub title: String,
    pub metrics: QueueMetrics,
    /// Visitors still in the wait queue at the horizon.
    pub still_waiting: usize,
    /// Copies still out at the horizon.
    pub on_loan: usize,
    pub log: StatisticsLog,
}

impl SimulationReport {
    /// Snapshot `library` as of `horizon`.
    pub fn from_library<R>(library: &Library<R>, horizon: Days) -> Self {
        let loan_duration = library.policy.loan_duration;
        let titles = library
            .titles
            .iter()
            .map(|title| TitleReport {
                title: title.name.clone(),
                metrics: title.log.metrics(horizon, loan_duration),
                still_waiting: title.copies.queue_len(),
                on_loan: title.copies.in_use(),
                log: title.log.clone(),
            })
            .collect();

        Self {
            horizon,
            loan_duration,
            visitors_spawned: library.visitors_spawned,
            titles,
        }
    }
}
