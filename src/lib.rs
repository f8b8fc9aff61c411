//! # Overview
//!
//! lendsim models a library lending one or more titles, each with a fixed number of copies, as a discrete-event
//! queueing simulation, and reports empirical figures next to the closed-form M/M/1 metrics for each title.
//!
//! The crate is built in layers:
//!
//! * [`scheduler`] is a small discrete-event engine. A [`Simulation`] owns its state and an [`EventQueue`] ordered by
//!   due time, ties broken by scheduling order. Each [`Event`] gets exclusive access to the state while it executes,
//!   so no interior mutability or locking is involved.
//! * [`resource`] is a pool of identical copies with a bounded FIFO wait queue that drops arrivals once the queue is
//!   full.
//! * [`library`] is the lending model itself: the arrival process, the visitor state machine, and [`simulate()`].
//! * [`statistics`] holds each title's [`StatisticsLog`] and the pure functions that turn it into [`QueueMetrics`].
//!
//! Every random draw goes through a single [`Randomness`] value owned by the simulation state, so a run is fully
//! determined by its [`SimulationConfig`] and seed.
//!
//! ```
//! use lendsim::{simulate, SimulationConfig};
//!
//! let report = simulate(&SimulationConfig::default()).unwrap();
//! let server = &report.titles[0];
//! assert_eq!(
//!     server.log.arrivals(),
//!     server.log.drop_count() + server.log.successful_loans() + server.still_waiting
//! );
//! ```
//!
//! # Features
//!
//! lendsim offers one feature, `ordered-float`, which adds a dependency on the [`ordered-float`] crate so that its
//! [`OrderedFloat`] and [`NotNan`] structs may be used as [`SimTime`] for a fractional clock. The library model itself
//! always runs on whole [`Days`].
//!
//! [`ordered-float`]: https://docs.rs/ordered-float/4
//! [`OrderedFloat`]: https://docs.rs/ordered-float/4/ordered_float/struct.OrderedFloat.html
//! [`NotNan`]: https://docs.rs/ordered-float/4/ordered_float/struct.NotNan.html
//! [`Simulation`]: scheduler::Simulation
//! [`EventQueue`]: scheduler::EventQueue
//! [`Event`]: scheduler::Event
//! [`StatisticsLog`]: statistics::StatisticsLog
//! [`QueueMetrics`]: statistics::QueueMetrics
//! [`Randomness`]: randomness::Randomness

mod error;
mod generic_parameters;

pub mod config;
pub mod library;
pub mod randomness;
pub mod resource;
pub mod scheduler;
pub mod statistics;

pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use generic_parameters::{SimState, SimTime};
pub use library::{simulate, simulate_with, Days, SimulationReport, TitleReport};
