//! Patient pathway state machine
//!
//! Stages, in order: diagnosis, staff assessment, imaging, optional
//! same-day care, the admission decision and the ward stay. Every stage
//! ends at a suspension point on the clock or on a resource pool; the
//! [`Stage`] enum remembers where to pick up on the next resumption.

use super::diagnosis::DiagnosisThresholds;
use super::patient::Patient;
use crate::resources::NORMAL_PRIORITY;
use crate::sim_event;
use crate::simulation::{Process, RunContext, SimTime, SimulationResult, Suspend};
use crate::types::{Diagnosis, ResourceKind, MINUTES_PER_DAY};

/// Standard deviation of the per-patient admission threshold jitter
const ADMISSION_JITTER: f64 = 1.0;

/// Where a pathway resumes next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Not yet started
    Arrival,
    /// Waiting for assessment staff since the given time
    QueuedForStaff {
        /// Time the request was made
        since: SimTime,
    },
    /// In consultation
    WithStaff {
        /// Sampled consultation time
        consult: f64,
    },
    /// Being imaged
    Imaging {
        /// Time imaging began
        started: SimTime,
        /// Sampled imaging time
        duration: f64,
    },
    /// Staying in same-day care
    SameDayCareStay {
        /// Sampled stay
        stay: f64,
    },
    /// Ready to leave same-day care, waiting for a free ward bed
    SameDayCareDischarge {
        /// Sampled stay
        stay: f64,
        /// Time the discharge first found the ward full
        blocked_since: SimTime,
    },
    /// Waiting for a ward bed since the given time
    QueuedForWard {
        /// Time the request was made
        since: SimTime,
    },
    /// On the ward
    OnWard {
        /// Actual stay after any thrombolysis reduction
        stay: f64,
        /// Bed-day cost saved by thrombolysis
        saving: Option<f64>,
    },
    /// Left the pathway
    Done,
}

/// The process carrying one patient through the pathway
#[derive(Debug)]
pub struct PathwayProcess {
    patient: Patient,
    stage: Stage,
}

impl PathwayProcess {
    /// Start a pathway for a newly arrived patient
    pub fn new(patient: Patient) -> Self {
        Self { patient, stage: Stage::Arrival }
    }

    /// Patient carried by this process
    pub fn patient(&self) -> &Patient {
        &self.patient
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn resolve_diagnosis(&mut self, ctx: &mut RunContext) -> Suspend {
        let (config, variates) = ctx.config_and_variates();
        let thresholds = DiagnosisThresholds::sample(config, variates);
        let outcome = thresholds.classify(self.patient.diagnosis_draw as f64);
        self.patient.diagnosis = outcome.diagnosis;
        self.patient.diagnosis_fallback = outcome.fallback;

        let diagnosis = self.patient.diagnosis.to_string();
        sim_event!(
            debug,
            "patient arrived",
            patient = self.patient.id.value(),
            time = ctx.now(),
            diagnosis = diagnosis.as_str(),
            fallback = outcome.fallback,
        );

        self.stage = Stage::QueuedForStaff { since: ctx.now() };
        Suspend::Acquire { resource: ResourceKind::Staffing, priority: NORMAL_PRIORITY }
    }

    fn begin_consult(&mut self, ctx: &mut RunContext, since: SimTime) -> Suspend {
        let now = ctx.now();
        self.patient.staffing_queue_time = now - since;
        let waiting = ctx.pools.get(ResourceKind::Staffing).queue_len();
        ctx.statistics.sample_staffing_queue(now, waiting);

        let consult = ctx.exponential(ctx.config().mean_consult_time);
        self.stage = Stage::WithStaff { consult };
        Suspend::Hold(consult)
    }

    fn begin_imaging(&mut self, ctx: &mut RunContext, consult: f64) -> SimulationResult<Suspend> {
        let queue_time = self.patient.staffing_queue_time;
        self.patient.observe(ctx.now(), ctx.config().warm_up_period, |r| {
            r.staffing_queue_time = Some(queue_time);
            r.consult_time = Some(consult);
        });
        ctx.release(ResourceKind::Staffing)?;

        // Scanner availability decides the path at the moment imaging starts
        let advanced = !ctx.is_unavailable(ResourceKind::Scanner);
        self.patient.on_advanced_imaging_path = advanced;
        let mean = if advanced {
            ctx.config().mean_advanced_imaging_time
        } else {
            ctx.config().mean_basic_imaging_time
        };
        let duration = ctx.exponential(mean);

        self.stage = Stage::Imaging { started: ctx.now(), duration };
        Ok(Suspend::Hold(duration))
    }

    fn after_imaging(&mut self, ctx: &mut RunContext, started: SimTime, duration: f64) -> SimulationResult<Suspend> {
        let advanced = self.patient.on_advanced_imaging_path;
        let scanner_unavailable = ctx.is_unavailable(ResourceKind::Scanner);
        let same_day_care_unavailable = ctx.is_unavailable(ResourceKind::SameDayCare);
        self.patient.observe(ctx.now(), ctx.config().warm_up_period, |r| {
            r.imaging_started_at = Some(started);
            if advanced {
                r.advanced_imaging_time = Some(duration);
            } else {
                r.basic_imaging_time = Some(duration);
            }
            r.scanner_unavailable = Some(scanner_unavailable);
            r.same_day_care_unavailable = Some(same_day_care_unavailable);
        });

        // Soft admission check: one patient over capacity is still let in
        let capacity = ctx.pools.get(ResourceKind::SameDayCare).capacity();
        if same_day_care_unavailable || ctx.same_day_care_occupancy > capacity {
            return self.decide_admission(ctx);
        }

        ctx.same_day_care_occupancy += 1;
        let occupancy = ctx.same_day_care_occupancy;
        self.patient.on_same_day_care_path = true;
        self.patient.observe(ctx.now(), ctx.config().warm_up_period, |r| {
            r.same_day_care_occupancy = Some(occupancy);
        });

        let stay = ctx.exponential(ctx.config().mean_same_day_care_time);
        self.stage = Stage::SameDayCareStay { stay };
        Ok(Suspend::Hold(stay))
    }

    fn try_same_day_care_discharge(
        &mut self,
        ctx: &mut RunContext,
        stay: f64,
        blocked_since: SimTime,
    ) -> SimulationResult<Suspend> {
        if ctx.pools.get(ResourceKind::Ward).is_full() {
            self.stage = Stage::SameDayCareDischarge { stay, blocked_since };
            return Ok(Suspend::Hold(ctx.config().discharge_poll_interval));
        }

        ctx.same_day_care_occupancy = ctx.same_day_care_occupancy.saturating_sub(1);
        let blocked = ctx.now() - blocked_since;
        self.patient.observe(ctx.now(), ctx.config().warm_up_period, |r| {
            r.same_day_care_time = Some(stay);
            r.same_day_care_block_time = Some(blocked);
        });
        if blocked > 0.0 {
            sim_event!(
                debug,
                "same-day care discharge unblocked",
                patient = self.patient.id.value(),
                time = ctx.now(),
                blocked = blocked,
            );
        }
        self.decide_admission(ctx)
    }

    fn decide_admission(&mut self, ctx: &mut RunContext) -> SimulationResult<Suspend> {
        let patient = &mut self.patient;
        patient.thrombolysed = patient.is_thrombolysis_eligible();

        let (thrombolysed, diagnosis, fallback, onset, mrs) = (
            patient.thrombolysed,
            patient.diagnosis,
            patient.diagnosis_fallback,
            patient.onset,
            patient.mrs_baseline,
        );
        patient.observe(ctx.now(), ctx.config().warm_up_period, |r| {
            r.thrombolysed = Some(thrombolysed);
            r.diagnosis = Some(diagnosis);
            r.diagnosis_fallback = fallback;
            r.onset = Some(onset);
            r.mrs_baseline = Some(mrs);
        });

        if patient.is_same_day_care_avoidance(ctx.config().avoidance_mrs_ceiling()) {
            patient.admission_avoided = true;
            patient.observe(ctx.now(), ctx.config().warm_up_period, |r| {
                r.admission_avoided = Some(true);
            });
            if ctx.after_warm_up() {
                ctx.statistics.counters_mut().admissions_avoided += 1;
            }
        }

        // Both thresholds are drawn for every patient reaching this point
        let tia_threshold = ctx.normal(ctx.config().tia_admission_threshold, ADMISSION_JITTER);
        let mimic_threshold =
            ctx.normal(ctx.config().stroke_mimic_admission_threshold, ADMISSION_JITTER);

        let draw = patient.non_admission_draw as f64;
        let not_admitted = (diagnosis == Diagnosis::Tia && draw >= tia_threshold)
            || (diagnosis.uses_mimic_admission() && draw >= mimic_threshold);
        if not_admitted {
            patient.admission_avoided = true;
            if ctx.after_warm_up() {
                ctx.statistics.counters_mut().non_admissions += 1;
            }
        }

        if patient.admission_avoided {
            let label = diagnosis.to_string();
            sim_event!(
                debug,
                "admission avoided",
                patient = patient.id.value(),
                time = ctx.now(),
                diagnosis = label.as_str(),
            );
            return Ok(self.finish(ctx));
        }

        self.stage = Stage::QueuedForWard { since: ctx.now() };
        Ok(Suspend::Acquire { resource: ResourceKind::Ward, priority: NORMAL_PRIORITY })
    }

    fn admit_to_ward(&mut self, ctx: &mut RunContext, since: SimTime) -> Suspend {
        let now = ctx.now();
        let wait = now - since;
        self.patient.ward_queue_time = wait;

        let occupancy = ctx.pools.get(ResourceKind::Ward).in_use();
        self.patient.observe(now, ctx.config().warm_up_period, |r| {
            r.ward_occupancy = Some(occupancy);
            r.admitted_at = Some(now);
        });
        ctx.statistics.sample_ward_occupancy(now, occupancy);

        let profile = *ctx.length_of_stay().lookup(self.patient.diagnosis, self.patient.mrs_baseline);
        let sampled = ctx.exponential(profile.mean);
        let thrombolysed = self.patient.thrombolysed;
        let stay = match profile.thrombolysis_factor {
            Some(factor) if thrombolysed => sampled * factor,
            _ => sampled,
        };
        let saving = (stay < sampled && self.patient.on_advanced_imaging_path)
            .then(|| (sampled - stay) / MINUTES_PER_DAY * ctx.config().bed_day_cost);

        let bound = profile.improvement_bound(thrombolysed);
        let improvement = if bound > 0 { ctx.uniform_int(0, i64::from(bound)) } else { 0 };
        let improvement = u8::try_from(improvement).unwrap_or(0);
        self.patient.mrs_discharge = self.patient.mrs_baseline.saturating_sub(improvement);

        sim_event!(
            debug,
            "ward admission",
            patient = self.patient.id.value(),
            time = now,
            waited = wait,
            occupancy = occupancy,
            stay = stay,
        );

        self.stage = Stage::OnWard { stay, saving };
        Suspend::Hold(stay)
    }

    fn discharge_from_ward(
        &mut self,
        ctx: &mut RunContext,
        stay: f64,
        saving: Option<f64>,
    ) -> SimulationResult<Suspend> {
        ctx.release(ResourceKind::Ward)?;

        let patient = &mut self.patient;
        let (wait, baseline, discharge) =
            (patient.ward_queue_time, patient.mrs_baseline, patient.mrs_discharge);
        patient.observe(ctx.now(), ctx.config().warm_up_period, |r| {
            r.ward_queue_time = Some(wait);
            r.ward_length_of_stay = Some(stay);
            r.mrs_baseline = Some(baseline);
            r.mrs_discharge = Some(discharge);
            r.mrs_change = Some(i32::from(baseline) - i32::from(discharge));
            r.thrombolysis_saving = saving;
        });
        Ok(self.finish(ctx))
    }

    fn finish(&mut self, ctx: &mut RunContext) -> Suspend {
        self.stage = Stage::Done;
        ctx.statistics.commit(self.patient.final_record(true));
        Suspend::Done
    }
}

impl Process for PathwayProcess {
    fn resume(&mut self, ctx: &mut RunContext) -> SimulationResult<Suspend> {
        match self.stage {
            Stage::Arrival => Ok(self.resolve_diagnosis(ctx)),
            Stage::QueuedForStaff { since } => Ok(self.begin_consult(ctx, since)),
            Stage::WithStaff { consult } => self.begin_imaging(ctx, consult),
            Stage::Imaging { started, duration } => self.after_imaging(ctx, started, duration),
            Stage::SameDayCareStay { stay } => {
                let now = ctx.now();
                self.try_same_day_care_discharge(ctx, stay, now)
            }
            Stage::SameDayCareDischarge { stay, blocked_since } => {
                self.try_same_day_care_discharge(ctx, stay, blocked_since)
            }
            Stage::QueuedForWard { since } => Ok(self.admit_to_ward(ctx, since)),
            Stage::OnWard { stay, saving } => self.discharge_from_ward(ctx, stay, saving),
            Stage::Done => Ok(Suspend::Done),
        }
    }

    fn on_horizon(&mut self, ctx: &mut RunContext) {
        if self.stage != Stage::Done {
            ctx.statistics.commit(self.patient.final_record(false));
        }
    }
}
