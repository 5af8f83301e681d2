//! Trial and scenario orchestration
//!
//! A trial is a batch of independent runs of one configuration. Each run
//! gets its own random stream derived from the base seed and the run number,
//! so results do not depend on whether runs execute in parallel.

use crate::simulation::{
    ErrorHandler, Model, RandomSource, RunOutput, SimulationResult, TrialSummary,
};
use crate::types::{ScenarioOverride, SimulationConfig};
use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

/// Output of one trial
#[derive(Debug, Clone)]
pub struct TrialOutput {
    /// Summary metrics for every run and their means
    pub summary: TrialSummary,
    /// Full output of every run, ordered by run number
    pub runs: Vec<RunOutput>,
}

/// Drives runs, trials and scenario batches for a validated configuration
#[derive(Debug)]
pub struct SimulationOrchestrator {
    config: SimulationConfig,
    error_handler: ErrorHandler,
}

impl SimulationOrchestrator {
    /// Create an orchestrator, rejecting invalid configurations
    #[instrument(skip(config), fields(runs = config.number_of_runs, seed = ?config.seed))]
    pub fn new(config: SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        info!(
            "Initializing orchestrator: {} runs of {} minutes after {} minutes warm-up",
            config.number_of_runs, config.sim_duration, config.warm_up_period
        );
        let error_handler = ErrorHandler::new(config.continue_on_error);
        Ok(Self { config, error_handler })
    }

    /// Configuration in use
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Execute run number `run` (starting at 1)
    pub fn run_single(&self, run: usize) -> SimulationResult<RunOutput> {
        let variates = RandomSource::for_run(self.config.seed, run);
        let output = Model::new(self.config.clone(), Box::new(variates)).run(run)?;
        debug!(
            run = run,
            patients = output.result.patients_recorded,
            "run complete"
        );
        Ok(output)
    }

    /// Execute every run of the trial
    ///
    /// Runs execute on the rayon pool when `parallel_runs` is set. Results
    /// are always ordered by run number.
    #[instrument(skip(self), fields(runs = self.config.number_of_runs))]
    pub fn run_trial(&self, label: &str) -> SimulationResult<TrialOutput> {
        let started_at = Utc::now();
        let run_numbers: Vec<usize> = (1..=self.config.number_of_runs).collect();

        let mut runs = if self.config.parallel_runs {
            run_numbers
                .par_iter()
                .map(|&run| self.run_single(run))
                .collect::<SimulationResult<Vec<_>>>()?
        } else {
            run_numbers
                .iter()
                .map(|&run| self.run_single(run))
                .collect::<SimulationResult<Vec<_>>>()?
        };
        runs.sort_by_key(|output| output.result.run);

        let results = runs.iter().map(|output| output.result.clone()).collect();
        let summary = TrialSummary::new(label, started_at, Utc::now(), results);
        info!(
            "Trial '{}' finished {} runs in {} ms",
            label,
            summary.runs.len(),
            summary.elapsed().num_milliseconds()
        );
        Ok(TrialOutput { summary, runs })
    }

    /// Execute one trial per scenario, each on this configuration with the
    /// scenario's overrides applied
    ///
    /// A scenario whose merged configuration is invalid is skipped when
    /// `continue_on_error` is set; any other failure aborts the batch.
    #[instrument(skip(self, scenarios), fields(scenarios = scenarios.len()))]
    pub fn run_scenarios(&self, scenarios: &[ScenarioOverride]) -> SimulationResult<Vec<TrialOutput>> {
        let mut outputs = Vec::with_capacity(scenarios.len());
        for (index, scenario) in scenarios.iter().enumerate() {
            let label = scenario.display_label(index);
            let config = self.config.merged_with(&scenario.overrides);
            let context = format!("scenario '{label}'");

            let output = self.error_handler.execute_with_recovery(
                || SimulationOrchestrator::new(config)?.run_trial(&label),
                &context,
            )?;
            if let Some(output) = output {
                outputs.push(output);
            }
        }
        Ok(outputs)
    }
}
