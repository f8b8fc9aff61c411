//! Per-title observations and the queueing metrics derived from them.
//!
//! A [`StatisticsLog`] is filled in by the visitor process as events execute. [`StatisticsLog::metrics()`] turns it
//! into [`QueueMetrics`] once the run is over; that computation is pure and depends only on the log, the horizon and
//! the loan duration.

use crate::Days;
use serde::Serialize;

/// Raw observations for one title over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatisticsLog {
    arrival_times: Vec<Days>,
    wait_times: Vec<Days>,
    queue_length_samples: Vec<usize>,
    drop_count: usize,
    busy_time: Days,
    on_time_returns: usize,
    overdue_returns: usize,
}

impl StatisticsLog {
    /// Record an arrival together with the queue length it found, before any admission decision is made.
    pub fn record_arrival(&mut self, time: Days, queue_length: usize) {
        self.arrival_times.push(time);
        self.queue_length_samples.push(queue_length);
    }

    pub fn record_drop(&mut self) {
        self.drop_count += 1;
    }

    /// Record the time a visitor spent queueing before its loan started.
    pub fn record_loan_start(&mut self, wait: Days) {
        debug_assert!(wait >= 0, "negative wait time {wait}");
        self.wait_times.push(wait);
    }

    pub fn add_busy_time(&mut self, held: Days) {
        self.busy_time = self.busy_time.saturating_add(held);
    }

    pub fn record_return(&mut self, overdue: bool) {
        if overdue {
            self.overdue_returns += 1;
        } else {
            self.on_time_returns += 1;
        }
    }

    pub fn arrival_times(&self) -> &[Days] {
        &self.arrival_times
    }

    pub fn wait_times(&self) -> &[Days] {
        &self.wait_times
    }

    pub fn queue_length_samples(&self) -> &[usize] {
        &self.queue_length_samples
    }

    pub fn arrivals(&self) -> usize {
        self.arrival_times.len()
    }

    pub fn drop_count(&self) -> usize {
        self.drop_count
    }

    /// Loans that started, including any still out when the run ended.
    pub fn successful_loans(&self) -> usize {
        self.wait_times.len()
    }

    pub fn busy_time(&self) -> Days {
        self.busy_time
    }

    pub fn on_time_returns(&self) -> usize {
        self.on_time_returns
    }

    pub fn overdue_returns(&self) -> usize {
        self.overdue_returns
    }

    /// Mean of the queue lengths seen on arrival, or zero if nobody arrived.
    pub fn average_queue_length(&self) -> f64 {
        if self.queue_length_samples.is_empty() {
            return 0.0;
        }
        let total: usize = self.queue_length_samples.iter().sum();
        total as f64 / self.queue_length_samples.len() as f64
    }

    /// Empirical and closed-form metrics for a run that lasted `horizon` days with loans of `loan_duration` days.
    /// Both arguments must be positive.
    pub fn metrics(&self, horizon: Days, loan_duration: Days) -> QueueMetrics {
        let horizon_days = horizon as f64;
        let loan_days = loan_duration as f64;

        let arrival_rate = self.arrivals() as f64 / horizon_days;
        let service_rate = 1.0 / loan_days;

        QueueMetrics {
            arrival_rate,
            service_rate,
            utilization: arrival_rate / service_rate,
            steady_state: SteadyState::of(arrival_rate, service_rate),
            empirical_utilization: self.busy_time as f64 / horizon_days,
            average_queue_length: self.average_queue_length(),
            drop_count: self.drop_count,
            successful_loans: self.successful_loans(),
            throughput_per_loan_period: self.successful_loans() as f64 / (horizon_days / loan_days),
        }
    }
}

/// Summary of one title's run, empirical figures next to the M/M/1 closed forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueueMetrics {
    /// λ, arrivals per day.
    pub arrival_rate: f64,
    /// μ, loans completed per day by one copy.
    pub service_rate: f64,
    /// ρ = λ / μ.
    pub utilization: f64,
    pub steady_state: SteadyState,
    /// Held days over the horizon. Loans still out at the horizon count in full.
    pub empirical_utilization: f64,
    pub average_queue_length: f64,
    pub drop_count: usize,
    pub successful_loans: usize,
    pub throughput_per_loan_period: f64,
}

/// Closed-form M/M/1 steady state, if one exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "regime", rename_all = "snake_case")]
pub enum SteadyState {
    /// μ > λ.
    Stable {
        /// L, mean number of visitors in the system.
        mean_in_system: f64,
        /// W, mean time a visitor spends in the system.
        mean_time_in_system: f64,
        /// Lq, mean number of visitors waiting.
        mean_queue_length: f64,
        /// Wq, mean time a visitor spends waiting.
        mean_wait: f64,
    },
    /// Arrivals keep pace with or outrun service; the queue has no finite steady state.
    Unbounded,
}

impl SteadyState {
    pub fn of(arrival_rate: f64, service_rate: f64) -> Self {
        if service_rate <= arrival_rate {
            return Self::Unbounded;
        }

        let slack = service_rate - arrival_rate;
        Self::Stable {
            mean_in_system: arrival_rate / slack,
            mean_time_in_system: 1.0 / slack,
            mean_queue_length: arrival_rate * arrival_rate / (service_rate * slack),
            mean_wait: arrival_rate / (service_rate * slack),
        }
    }

    pub fn is_stable(&self) -> bool {
        matches!(self, Self::Stable { .. })
    }
}
