//! Process model shared by everything the clock resumes
//!
//! A process is an explicit state machine. Each call to
//! [`Process::resume`] advances it to its next suspension point and reports
//! what it is waiting for. Everything a process may touch during a run lives
//! in the per-run [`RunContext`].

use super::clock::SimTime;
use super::error::SimulationResult;
use super::random::VariateSource;
use super::statistics::StatisticsCollector;
use crate::patient::LengthOfStayTable;
use crate::resources::ResourcePools;
use crate::types::{IdCounter, PatientId, ProcessId, ResourceKind, SimulationConfig};
use std::fmt::Debug;

/// What a process waits for after a resumption
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suspend {
    /// Resume after the given delay
    Hold(SimTime),
    /// Resume once a slot of `resource` is granted
    Acquire {
        /// Resource requested
        resource: ResourceKind,
        /// Queue priority, lower is more urgent
        priority: i32,
    },
    /// The process is finished
    Done,
}

/// A resumable simulation process
pub trait Process: Debug + Send {
    /// Advance to the next suspension point
    fn resume(&mut self, ctx: &mut RunContext) -> SimulationResult<Suspend>;

    /// Called for processes still alive when the run reaches its horizon
    fn on_horizon(&mut self, _ctx: &mut RunContext) {}
}

/// Mutable state of a single run
#[derive(Debug)]
pub struct RunContext {
    config: SimulationConfig,
    now: SimTime,
    current: ProcessId,
    /// Resource pools of the run
    pub pools: ResourcePools,
    scanner_window: Option<(SimTime, SimTime)>,
    same_day_care_window: Option<(SimTime, SimTime)>,
    /// Patients currently in same-day care
    pub same_day_care_occupancy: usize,
    /// Observations of the run
    pub statistics: StatisticsCollector,
    length_of_stay: LengthOfStayTable,
    variates: Box<dyn VariateSource>,
    patient_ids: IdCounter,
    wakeups: Vec<ProcessId>,
    spawned: Vec<Box<dyn Process>>,
}

impl RunContext {
    /// Create the context for a run
    pub fn new(config: SimulationConfig, variates: Box<dyn VariateSource>) -> Self {
        Self {
            pools: ResourcePools::from_config(&config),
            statistics: StatisticsCollector::new(config.warm_up_period),
            length_of_stay: LengthOfStayTable::from_config(&config),
            config,
            now: 0.0,
            current: ProcessId(0),
            scanner_window: None,
            same_day_care_window: None,
            same_day_care_occupancy: 0,
            variates,
            patient_ids: IdCounter::new(),
            wakeups: Vec::new(),
            spawned: Vec::new(),
        }
    }

    /// Configuration of the run
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Length-of-stay table of the run
    pub fn length_of_stay(&self) -> &LengthOfStayTable {
        &self.length_of_stay
    }

    /// Current simulated time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Whether the current time is past warm-up
    pub fn after_warm_up(&self) -> bool {
        self.now > self.config.warm_up_period
    }

    /// Process being resumed
    pub fn current_process(&self) -> ProcessId {
        self.current
    }

    pub(crate) fn enter(&mut self, now: SimTime, process: ProcessId) {
        self.now = now;
        self.current = process;
    }

    /// Exponential sample
    pub fn exponential(&mut self, mean: f64) -> f64 {
        self.variates.exponential(mean)
    }

    /// Normal sample
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        self.variates.normal(mean, std_dev)
    }

    /// Uniform integer in `low..=high`
    pub fn uniform_int(&mut self, low: i64, high: i64) -> i64 {
        self.variates.uniform_int(low, high)
    }

    /// Split borrow of the configuration and the variate source
    pub fn config_and_variates(&mut self) -> (&SimulationConfig, &mut dyn VariateSource) {
        (&self.config, self.variates.as_mut())
    }

    /// Identity for the next patient
    pub fn next_patient_id(&mut self) -> PatientId {
        PatientId(self.patient_ids.next_value())
    }

    /// Patients created so far
    pub fn patients_created(&self) -> u64 {
        self.patient_ids.issued()
    }

    /// Release the slot of `resource` held by the current process
    ///
    /// A waiter granted the freed slot resumes in the same instant.
    pub fn release(&mut self, resource: ResourceKind) -> SimulationResult<()> {
        if let Some(next) = self.pools.get_mut(resource).release(self.current)? {
            self.wakeups.push(next);
        }
        Ok(())
    }

    /// Start a new process at the current instant
    pub fn spawn(&mut self, process: Box<dyn Process>) {
        self.spawned.push(process);
    }

    /// Mark a disruptable resource unavailable over `[from, until)`
    ///
    /// A window whose slot has not been granted yet has no known end and
    /// runs until infinity.
    pub fn set_unavailable(&mut self, resource: ResourceKind, from: SimTime, until: SimTime) {
        match resource {
            ResourceKind::Scanner => self.scanner_window = Some((from, until)),
            ResourceKind::SameDayCare => self.same_day_care_window = Some((from, until)),
            ResourceKind::Staffing | ResourceKind::Ward => {}
        }
    }

    /// Whether `resource` is inside its unavailability window now
    ///
    /// Both edges are decided by time alone, so processes resuming at the
    /// same instant as the disruption see the same answer in any order.
    pub fn is_unavailable(&self, resource: ResourceKind) -> bool {
        let window = match resource {
            ResourceKind::Scanner => self.scanner_window,
            ResourceKind::SameDayCare => self.same_day_care_window,
            ResourceKind::Staffing | ResourceKind::Ward => None,
        };
        window.is_some_and(|(from, until)| from <= self.now && self.now < until)
    }

    pub(crate) fn take_wakeups(&mut self) -> Vec<ProcessId> {
        std::mem::take(&mut self.wakeups)
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<Box<dyn Process>> {
        std::mem::take(&mut self.spawned)
    }
}
