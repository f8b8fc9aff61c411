use thiserror::Error;

/// Errors that may be encountered while configuring or executing a simulation.
///
/// The [`InvalidDelay`] variant originates from the scheduling interface of the [`EventQueue`] to indicate that an
/// event's execution time would fall before the queue's current time. This error corresponds to a logical bug in the
/// process model, e.g. a negative holding time, rather than to a condition a run can recover from.
///
/// The [`InvalidConfiguration`] variant is raised during setup, before any event executes, and carries a description
/// of the offending parameter. [`Io`] and [`Parse`] wrap failures to read or decode a configuration file.
///
/// Turning away a visitor because the wait queue is full, or a late return, are modelled outcomes and never show up
/// here.
///
/// [`EventQueue`]: crate::scheduler::EventQueue
/// [`InvalidDelay`]: Error::InvalidDelay
/// [`InvalidConfiguration`]: Error::InvalidConfiguration
/// [`Io`]: Error::Io
/// [`Parse`]: Error::Parse
#[derive(Debug, Error)]
pub enum Error {
    /// The event queue rejected an event that would have been scheduled for a time that has already passed.
    #[error("event execution time is less than current simulation time")]
    InvalidDelay,
    /// A simulation parameter is outside of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The configuration file could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for a [`SimulationConfig`].
    ///
    /// [`SimulationConfig`]: crate::SimulationConfig
    #[error("could not parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// [`std::result::Result`]`<T, `[`lendsim::Error`]`>`, with `T` defaulting to `()`.
///
/// A type alias that simplifies the signatures of various functions in lendsim.
///
/// [`lendsim::Error`]: Error
pub type Result<T = ()> = std::result::Result<T, Error>;
