//! Patient entity
//!
//! A patient is created by the arrival generator, owned by exactly one
//! pathway process, and discarded once its observation record is committed.

use crate::simulation::{ObservationRecord, SimTime, VariateSource};
use crate::types::{Diagnosis, OnsetType, PatientId, SimulationConfig, MAX_MRS};

/// A patient moving through the pathway
#[derive(Debug, Clone)]
pub struct Patient {
    /// Identity within the run
    pub id: PatientId,
    /// Arrival time
    pub arrived_at: SimTime,
    /// How the symptom onset time is known
    pub onset: OnsetType,
    /// Baseline disability score, 0..=5
    pub mrs_baseline: u8,
    /// Uniform draw in 0..=100 resolved against the diagnosis ladder
    pub diagnosis_draw: i64,
    /// Uniform draw in 0..=100 compared against the admission thresholds
    pub non_admission_draw: i64,
    /// Working diagnosis, resolved at the start of the pathway
    pub diagnosis: Diagnosis,
    /// The diagnosis draw matched no rung of the ladder
    pub diagnosis_fallback: bool,
    /// Imaged on the advanced path
    pub on_advanced_imaging_path: bool,
    /// Passed through same-day care
    pub on_same_day_care_path: bool,
    /// Thrombolysis given
    pub thrombolysed: bool,
    /// Ward admission skipped
    pub admission_avoided: bool,
    /// Time spent waiting for assessment staff
    pub staffing_queue_time: f64,
    /// Time spent waiting for a ward bed
    pub ward_queue_time: f64,
    /// Disability score at discharge
    pub mrs_discharge: u8,
    record: ObservationRecord,
}

impl Patient {
    /// Create a patient arriving at `now`, drawing its clinical attributes
    ///
    /// Draw order: onset, baseline mRS, diagnosis draw, non-admission draw.
    pub fn arrive(
        id: PatientId,
        now: SimTime,
        config: &SimulationConfig,
        variates: &mut dyn VariateSource,
    ) -> Self {
        let onset = OnsetType::from_draw(variates.uniform_int(0, 2));
        let mrs_baseline = baseline_mrs(variates.exponential(config.mean_mrs));
        let diagnosis_draw = variates.uniform_int(0, 100);
        let non_admission_draw = variates.uniform_int(0, 100);

        Self {
            id,
            arrived_at: now,
            onset,
            mrs_baseline,
            diagnosis_draw,
            non_admission_draw,
            diagnosis: Diagnosis::default(),
            diagnosis_fallback: false,
            on_advanced_imaging_path: false,
            on_same_day_care_path: false,
            thrombolysed: false,
            admission_avoided: false,
            staffing_queue_time: 0.0,
            ward_queue_time: 0.0,
            mrs_discharge: mrs_baseline,
            record: ObservationRecord::new(id, now),
        }
    }

    /// Whether thrombolysis applies, given the imaging path taken
    pub fn is_thrombolysis_eligible(&self) -> bool {
        if self.diagnosis != Diagnosis::Ischaemic || self.mrs_baseline == 0 {
            return false;
        }
        match self.onset {
            OnsetType::Known => true,
            OnsetType::UnknownInWindow => self.on_advanced_imaging_path,
            OnsetType::UnknownOutOfWindow => false,
        }
    }

    /// Whether same-day care lets this patient skip ward admission
    pub fn is_same_day_care_avoidance(&self, mrs_ceiling: u8) -> bool {
        self.diagnosis.is_stroke()
            && self.on_same_day_care_path
            && self.mrs_baseline < mrs_ceiling
            && !self.thrombolysed
    }

    /// Update the observation record if `now` is past warm-up
    ///
    /// Returns whether the update was applied.
    pub fn observe(
        &mut self,
        now: SimTime,
        warm_up: SimTime,
        update: impl FnOnce(&mut ObservationRecord),
    ) -> bool {
        if now <= warm_up {
            return false;
        }
        update(&mut self.record);
        self.record.recorded_at = now;
        true
    }

    /// Current state of the observation record
    pub fn record(&self) -> &ObservationRecord {
        &self.record
    }

    /// Copy of the observation record, marked as completed or in flight
    pub fn final_record(&self, completed: bool) -> ObservationRecord {
        let mut record = self.record.clone();
        record.completed = completed;
        record
    }
}

/// Round an exponential draw to a baseline mRS, ties to even, capped at 5
pub fn baseline_mrs(draw: f64) -> u8 {
    let rounded = draw.max(0.0).round_ties_even();
    rounded.min(f64::from(MAX_MRS)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MeanVariates;

    fn patient() -> Patient {
        let config = SimulationConfig::default();
        Patient::arrive(PatientId(1), 0.0, &config, &mut MeanVariates::new())
    }

    #[test]
    fn test_baseline_mrs_rounding() {
        assert_eq!(baseline_mrs(0.4), 0);
        assert_eq!(baseline_mrs(0.5), 0);
        assert_eq!(baseline_mrs(1.5), 2);
        assert_eq!(baseline_mrs(2.5), 2);
        assert_eq!(baseline_mrs(4.6), 5);
        assert_eq!(baseline_mrs(17.0), 5);
    }

    #[test]
    fn test_arrival_draws() {
        let config = SimulationConfig::default();
        let mut variates = MeanVariates::with_integers(vec![1, 42, 77]);
        let patient = Patient::arrive(PatientId(9), 5.0, &config, &mut variates);

        assert_eq!(patient.onset, OnsetType::UnknownInWindow);
        assert_eq!(patient.mrs_baseline, 2);
        assert_eq!(patient.diagnosis_draw, 42);
        assert_eq!(patient.non_admission_draw, 77);
        assert_eq!(patient.record().recorded_at, 5.0);
    }

    #[test]
    fn test_thrombolysis_gating() {
        let mut p = patient();
        p.diagnosis = Diagnosis::Ischaemic;
        p.onset = OnsetType::Known;
        p.mrs_baseline = 3;
        assert!(p.is_thrombolysis_eligible());

        p.onset = OnsetType::UnknownInWindow;
        assert!(!p.is_thrombolysis_eligible());
        p.on_advanced_imaging_path = true;
        assert!(p.is_thrombolysis_eligible());

        p.onset = OnsetType::UnknownOutOfWindow;
        assert!(!p.is_thrombolysis_eligible());

        p.onset = OnsetType::Known;
        p.mrs_baseline = 0;
        assert!(!p.is_thrombolysis_eligible());

        for diagnosis in [Diagnosis::Tia, Diagnosis::Ich, Diagnosis::StrokeMimic, Diagnosis::NonStroke] {
            p.diagnosis = diagnosis;
            p.mrs_baseline = 3;
            assert!(!p.is_thrombolysis_eligible());
        }
    }

    #[test]
    fn test_same_day_care_avoidance() {
        let mut p = patient();
        p.diagnosis = Diagnosis::Ich;
        p.on_same_day_care_path = true;
        p.mrs_baseline = 1;
        assert!(p.is_same_day_care_avoidance(2));

        p.mrs_baseline = 2;
        assert!(!p.is_same_day_care_avoidance(2));
        assert!(p.is_same_day_care_avoidance(3));

        p.thrombolysed = true;
        assert!(!p.is_same_day_care_avoidance(3));

        p.thrombolysed = false;
        p.diagnosis = Diagnosis::Tia;
        assert!(!p.is_same_day_care_avoidance(3));
    }

    #[test]
    fn test_observe_respects_warm_up() {
        let mut p = patient();
        assert!(!p.observe(100.0, 100.0, |r| r.consult_time = Some(1.0)));
        assert!(p.record().consult_time.is_none());

        assert!(p.observe(100.5, 100.0, |r| r.consult_time = Some(2.0)));
        assert_eq!(p.record().consult_time, Some(2.0));
        assert_eq!(p.record().recorded_at, 100.5);

        assert!(p.final_record(true).completed);
        assert!(!p.final_record(false).completed);
    }
}
