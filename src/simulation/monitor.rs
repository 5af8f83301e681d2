//! Periodic occupancy snapshots

use super::error::SimulationResult;
use super::process::{Process, RunContext, Suspend};
use super::statistics::OccupancySnapshot;
use crate::types::ResourceKind;

/// Samples queue and occupancy levels every `interval` minutes
///
/// The first sample is taken one interval after warm-up ends.
#[derive(Debug)]
pub struct OccupancyMonitor {
    interval: f64,
    started: bool,
}

impl OccupancyMonitor {
    /// Create a monitor, or `None` when the interval is not positive
    pub fn new(interval: f64) -> Option<Self> {
        (interval > 0.0).then_some(Self { interval, started: false })
    }
}

impl Process for OccupancyMonitor {
    fn resume(&mut self, ctx: &mut RunContext) -> SimulationResult<Suspend> {
        if !self.started {
            self.started = true;
            return Ok(Suspend::Hold(ctx.config().warm_up_period + self.interval));
        }

        let snapshot = OccupancySnapshot {
            time: ctx.now(),
            staffing_queue: ctx.pools.get(ResourceKind::Staffing).queue_len(),
            ward_occupancy: ctx.pools.get(ResourceKind::Ward).in_use(),
            ward_queue: ctx.pools.get(ResourceKind::Ward).queue_len(),
            same_day_care_occupancy: ctx.same_day_care_occupancy,
        };
        ctx.statistics.push_snapshot(snapshot);
        Ok(Suspend::Hold(self.interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MeanVariates;
    use crate::types::{ProcessId, SimulationConfig};

    #[test]
    fn test_monitor_samples_after_warm_up() {
        assert!(OccupancyMonitor::new(0.0).is_none());

        let config = SimulationConfig { warm_up_period: 50.0, ..SimulationConfig::default() };
        let mut ctx = RunContext::new(config, Box::new(MeanVariates::new()));
        let mut monitor = OccupancyMonitor::new(10.0).unwrap();

        assert_eq!(monitor.resume(&mut ctx).unwrap(), Suspend::Hold(60.0));
        ctx.enter(60.0, ProcessId(1));
        ctx.same_day_care_occupancy = 3;
        assert_eq!(monitor.resume(&mut ctx).unwrap(), Suspend::Hold(10.0));

        let snapshots = ctx.statistics.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].time, 60.0);
        assert_eq!(snapshots[0].same_day_care_occupancy, 3);
    }
}
