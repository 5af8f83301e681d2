//! Unbounded patient arrival generator

use super::error::SimulationResult;
use super::process::{Process, RunContext, Suspend};
use crate::patient::{PathwayProcess, Patient};

/// Creates a patient, starts its pathway, then waits an exponential
/// inter-arrival time. The first patient arrives at time zero.
#[derive(Debug, Default)]
pub struct ArrivalProcess;

impl ArrivalProcess {
    /// Create the generator
    pub fn new() -> Self {
        Self
    }
}

impl Process for ArrivalProcess {
    fn resume(&mut self, ctx: &mut RunContext) -> SimulationResult<Suspend> {
        let id = ctx.next_patient_id();
        let now = ctx.now();
        let (config, variates) = ctx.config_and_variates();
        let patient = Patient::arrive(id, now, config, variates);
        ctx.spawn(Box::new(PathwayProcess::new(patient)));

        let gap = ctx.exponential(ctx.config().mean_inter_arrival_time);
        Ok(Suspend::Hold(gap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MeanVariates;
    use crate::types::SimulationConfig;

    #[test]
    fn test_each_resumption_spawns_one_patient() {
        let mut ctx = RunContext::new(SimulationConfig::default(), Box::new(MeanVariates::new()));
        let mut arrivals = ArrivalProcess::new();

        assert_eq!(arrivals.resume(&mut ctx).unwrap(), Suspend::Hold(180.0));
        assert_eq!(arrivals.resume(&mut ctx).unwrap(), Suspend::Hold(180.0));
        assert_eq!(ctx.patients_created(), 2);
        assert_eq!(ctx.take_spawned().len(), 2);
    }
}
