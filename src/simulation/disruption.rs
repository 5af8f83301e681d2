//! Scheduled unavailability of a disruptable resource
//!
//! The process seizes one slot of its resource at [`DISRUPTION_PRIORITY`],
//! so it is served ahead of any waiting patient but never evicts a current
//! holder. The resource counts as unavailable from the instant the window
//! opens, before the slot is granted, until the instant it is released.
//! Both instants are published ahead of time so the half-open window does
//! not depend on which process the clock resumes first.

use super::error::SimulationResult;
use super::process::{Process, RunContext, Suspend};
use crate::resources::DISRUPTION_PRIORITY;
use crate::sim_event;
use crate::types::{DisruptionWindow, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Available,
    Acquiring,
    Holding,
}

/// Recurring unavailability window for one resource
#[derive(Debug)]
pub struct DisruptionProcess {
    resource: ResourceKind,
    window: DisruptionWindow,
    phase: Phase,
}

impl DisruptionProcess {
    /// Create the process, or `None` when the window is disabled
    pub fn new(resource: ResourceKind, window: DisruptionWindow) -> Option<Self> {
        window.is_enabled().then_some(Self { resource, window, phase: Phase::Start })
    }

    /// Disrupted resource
    pub fn resource(&self) -> ResourceKind {
        self.resource
    }
}

impl Process for DisruptionProcess {
    fn resume(&mut self, ctx: &mut RunContext) -> SimulationResult<Suspend> {
        match self.phase {
            Phase::Start => {
                let opens = ctx.now() + self.window.first_start();
                ctx.set_unavailable(self.resource, opens, f64::INFINITY);
                self.phase = Phase::Available;
                Ok(Suspend::Hold(self.window.first_start()))
            }
            Phase::Available => {
                ctx.set_unavailable(self.resource, ctx.now(), f64::INFINITY);
                self.phase = Phase::Acquiring;
                Ok(Suspend::Acquire { resource: self.resource, priority: DISRUPTION_PRIORITY })
            }
            Phase::Acquiring => {
                let until = ctx.now() + self.window.duration;
                ctx.set_unavailable(self.resource, ctx.now(), until);
                let resource = self.resource.to_string();
                sim_event!(
                    debug,
                    "resource unavailable",
                    resource = resource.as_str(),
                    time = ctx.now(),
                    until = until,
                );
                self.phase = Phase::Holding;
                Ok(Suspend::Hold(self.window.duration))
            }
            Phase::Holding => {
                let next = ctx.now() + self.window.frequency;
                ctx.set_unavailable(self.resource, next, f64::INFINITY);
                ctx.release(self.resource)?;
                if ctx.after_warm_up() {
                    let counters = ctx.statistics.counters_mut();
                    match self.resource {
                        ResourceKind::Scanner => counters.scanner_unavailability += 1,
                        ResourceKind::SameDayCare => counters.same_day_care_unavailability += 1,
                        ResourceKind::Staffing | ResourceKind::Ward => {}
                    }
                }
                self.phase = Phase::Available;
                Ok(Suspend::Hold(self.window.frequency))
            }
        }
    }
}
