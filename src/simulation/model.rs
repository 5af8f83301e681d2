//! One simulation run
//!
//! The model owns the clock and every live process. The clock carries only
//! process identities; resuming one looks the process up, lets it run to its
//! next suspension point, then turns that suspension into clock entries or
//! resource requests. Processes granted a released slot, and processes
//! started mid-step, resume in the same instant after anything already due.

use super::arrivals::ArrivalProcess;
use super::clock::Clock;
use super::disruption::DisruptionProcess;
use super::error::{SimulationError, SimulationResult};
use super::monitor::OccupancyMonitor;
use super::process::{Process, RunContext, Suspend};
use super::random::VariateSource;
use super::statistics::{ObservationRecord, OccupancySnapshot, RunResult};
use crate::types::{IdCounter, ProcessId, ResourceKind, SimulationConfig};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Everything a single run produces
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Summary metrics
    pub result: RunResult,
    /// Per-patient observation records in commit order
    pub records: Vec<ObservationRecord>,
    /// Periodic occupancy snapshots
    pub snapshots: Vec<OccupancySnapshot>,
    /// Patients created, observed or not
    pub patients_created: u64,
}

#[derive(Debug)]
struct ModelState {
    ctx: RunContext,
    processes: BTreeMap<ProcessId, Box<dyn Process>>,
    process_ids: IdCounter,
}

impl ModelState {
    fn register(&mut self, process: Box<dyn Process>) -> ProcessId {
        let id = ProcessId(self.process_ids.next_value());
        self.processes.insert(id, process);
        id
    }

    fn resume(&mut self, clock: &mut Clock<ProcessId>, id: ProcessId) -> SimulationResult<()> {
        self.ctx.enter(clock.now(), id);
        let process = self.processes.get_mut(&id).ok_or_else(|| {
            SimulationError::invariant_violation(format!("resumed unknown process {id}"))
        })?;
        let step = process.resume(&mut self.ctx)?;

        for woken in self.ctx.take_wakeups() {
            clock.schedule_now(woken);
        }
        for spawned in self.ctx.take_spawned() {
            let spawned_id = self.register(spawned);
            clock.schedule_now(spawned_id);
        }

        match step {
            Suspend::Hold(delay) => {
                clock.schedule_after(delay, id);
            }
            Suspend::Acquire { resource, priority } => {
                if self.ctx.pools.get_mut(resource).request(id, priority)? {
                    clock.schedule_now(id);
                } else {
                    trace!(process = id.0, resource = %resource, "queued for resource");
                }
            }
            Suspend::Done => {
                self.processes.remove(&id);
            }
        }
        Ok(())
    }
}

/// A single run of the pathway model
#[derive(Debug)]
pub struct Model {
    clock: Clock<ProcessId>,
    state: ModelState,
}

impl Model {
    /// Build a run with the arrival generator, any enabled disruption
    /// windows and the occupancy monitor scheduled at time zero
    pub fn new(config: SimulationConfig, variates: Box<dyn VariateSource>) -> Self {
        let scanner = DisruptionProcess::new(ResourceKind::Scanner, config.scanner_disruption);
        let same_day_care =
            DisruptionProcess::new(ResourceKind::SameDayCare, config.same_day_care_disruption);
        let monitor = OccupancyMonitor::new(config.snapshot_interval);

        let mut model = Self {
            clock: Clock::new(),
            state: ModelState {
                ctx: RunContext::new(config, variates),
                processes: BTreeMap::new(),
                process_ids: IdCounter::new(),
            },
        };

        model.start(Box::new(ArrivalProcess::new()));
        if let Some(process) = scanner {
            model.start(Box::new(process));
        }
        if let Some(process) = same_day_care {
            model.start(Box::new(process));
        }
        if let Some(process) = monitor {
            model.start(Box::new(process));
        }
        model
    }

    fn start(&mut self, process: Box<dyn Process>) {
        let id = self.state.register(process);
        self.clock.schedule_now(id);
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Live processes
    pub fn live_processes(&self) -> usize {
        self.state.processes.len()
    }

    /// Run state, for inspection between steps
    pub fn context(&self) -> &RunContext {
        &self.state.ctx
    }

    /// Advance the run to `until`
    pub fn advance(&mut self, until: f64) -> SimulationResult<()> {
        let state = &mut self.state;
        self.clock.run_until(until, |clock, id| state.resume(clock, id))
    }

    /// Run to the horizon and reduce the observations
    ///
    /// Patients still in the pathway at the horizon are flushed as
    /// incomplete records.
    pub fn run(mut self, run: usize) -> SimulationResult<RunOutput> {
        let horizon = self.state.ctx.config().horizon();
        self.advance(horizon)?;

        let state = &mut self.state;
        for (id, process) in state.processes.iter_mut() {
            state.ctx.enter(horizon, *id);
            process.on_horizon(&mut state.ctx);
        }

        let ctx = &state.ctx;
        let result = ctx.statistics.summarize(run, ctx.config());
        debug!(
            run = run,
            patients_created = ctx.patients_created(),
            patients_recorded = result.patients_recorded,
            in_flight = state.processes.len(),
            "run finished"
        );

        Ok(RunOutput {
            result,
            records: ctx.statistics.records().to_vec(),
            snapshots: ctx.statistics.snapshots().to_vec(),
            patients_created: ctx.patients_created(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MeanVariates;
    use crate::types::DisruptionWindow;

    fn quiet_config() -> SimulationConfig {
        SimulationConfig {
            warm_up_period: 0.0,
            sim_duration: 1_000.0,
            scanner_disruption: DisruptionWindow::disabled(),
            same_day_care_disruption: DisruptionWindow::disabled(),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_first_patient_arrives_at_time_zero() {
        let mut model = Model::new(quiet_config(), Box::new(MeanVariates::new()));
        model.advance(0.0).unwrap();
        assert_eq!(model.context().patients_created(), 1);
        assert_eq!(model.context().pools.get(ResourceKind::Staffing).in_use(), 1);
    }

    #[test]
    fn test_arrivals_follow_inter_arrival_mean() {
        let mut model = Model::new(quiet_config(), Box::new(MeanVariates::new()));
        model.advance(540.0).unwrap();
        // Arrivals at 0, 180, 360 and 540
        assert_eq!(model.context().patients_created(), 4);
        assert_eq!(model.now(), 540.0);
    }

    #[test]
    fn test_run_reaches_horizon_and_flushes() {
        let config = quiet_config();
        let output = Model::new(config, Box::new(MeanVariates::new())).run(1).unwrap();
        assert_eq!(output.result.run, 1);
        assert!(output.patients_created >= 5);
        // Every observed patient is either completed or flushed at the horizon
        assert!(output.records.iter().any(|r| !r.completed));
    }

    #[test]
    fn test_disabled_windows_add_no_processes() {
        let model = Model::new(quiet_config(), Box::new(MeanVariates::new()));
        assert_eq!(model.live_processes(), 1);

        let config = SimulationConfig { snapshot_interval: 60.0, ..quiet_config() };
        let model = Model::new(config, Box::new(MeanVariates::new()));
        assert_eq!(model.live_processes(), 2);
    }
}
