//! Diagnosis threshold ladder
//!
//! Each patient gets their own jittered set of cumulative thresholds. The
//! diagnosis draw is compared against them in order; a draw between the
//! mimic and non-stroke limits matches no rung and keeps the default
//! diagnosis, which is flagged so runs can report how often it happens.

use crate::simulation::VariateSource;
use crate::types::{Diagnosis, SimulationConfig};
use serde::{Deserialize, Serialize};

/// Standard deviation of the per-patient threshold jitter
pub const THRESHOLD_JITTER: f64 = 1.0;

/// Cumulative diagnosis limits for one patient, each at least the previous
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisThresholds {
    /// Upper limit for ICH
    pub ich: f64,
    /// Upper limit for Ischaemic
    pub ischaemic: f64,
    /// Upper limit for TIA
    pub tia: f64,
    /// Upper limit for stroke mimic
    pub stroke_mimic: f64,
    /// Lower limit (exclusive) for non-stroke
    pub non_stroke: f64,
}

/// Outcome of resolving a diagnosis draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosisOutcome {
    /// Resolved diagnosis
    pub diagnosis: Diagnosis,
    /// The draw matched no rung and the default was kept
    pub fallback: bool,
}

impl DiagnosisThresholds {
    /// Fixed thresholds, clamped into a nondecreasing ladder
    pub fn new(ich: f64, ischaemic: f64, tia: f64, stroke_mimic: f64, non_stroke: f64) -> Self {
        let ischaemic = ischaemic.max(ich);
        let tia = tia.max(ischaemic);
        let stroke_mimic = stroke_mimic.max(tia);
        let non_stroke = non_stroke.max(stroke_mimic);
        Self { ich, ischaemic, tia, stroke_mimic, non_stroke }
    }

    /// Draw a jittered ladder from the configured percentages
    ///
    /// The non-stroke limit reuses the mimic percentage and gets its own
    /// jitter, so the gap above the mimic limit is usually narrow but not
    /// empty.
    pub fn sample(config: &SimulationConfig, variates: &mut dyn VariateSource) -> Self {
        let ich = variates.normal(config.ich_threshold, THRESHOLD_JITTER);
        let ischaemic = variates.normal(config.ischaemic_threshold, THRESHOLD_JITTER);
        let tia = variates.normal(config.tia_threshold, THRESHOLD_JITTER);
        let stroke_mimic = variates.normal(config.stroke_mimic_threshold, THRESHOLD_JITTER);
        let non_stroke = variates.normal(config.stroke_mimic_threshold, THRESHOLD_JITTER);
        Self::new(ich, ischaemic, tia, stroke_mimic, non_stroke)
    }

    /// Resolve a draw in `0..=100` against the ladder
    pub fn classify(&self, draw: f64) -> DiagnosisOutcome {
        let matched = if draw <= self.ich {
            Some(Diagnosis::Ich)
        } else if draw <= self.ischaemic {
            Some(Diagnosis::Ischaemic)
        } else if draw <= self.tia {
            Some(Diagnosis::Tia)
        } else if draw <= self.stroke_mimic {
            Some(Diagnosis::StrokeMimic)
        } else if draw > self.non_stroke {
            Some(Diagnosis::NonStroke)
        } else {
            None
        };

        match matched {
            Some(diagnosis) => DiagnosisOutcome { diagnosis, fallback: false },
            None => DiagnosisOutcome { diagnosis: Diagnosis::default(), fallback: true },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MeanVariates;

    fn ladder() -> DiagnosisThresholds {
        DiagnosisThresholds::new(10.0, 60.0, 70.0, 80.0, 81.5)
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let ladder = ladder();
        assert_eq!(ladder.classify(10.0).diagnosis, Diagnosis::Ich);
        assert_eq!(ladder.classify(10.5).diagnosis, Diagnosis::Ischaemic);
        assert_eq!(ladder.classify(60.0).diagnosis, Diagnosis::Ischaemic);
        assert_eq!(ladder.classify(70.0).diagnosis, Diagnosis::Tia);
        assert_eq!(ladder.classify(80.0).diagnosis, Diagnosis::StrokeMimic);
        assert_eq!(ladder.classify(82.0).diagnosis, Diagnosis::NonStroke);
        assert!(!ladder.classify(0.0).fallback);
    }

    #[test]
    fn test_gap_keeps_default_and_flags_it() {
        let outcome = ladder().classify(81.0);
        assert_eq!(outcome.diagnosis, Diagnosis::Ich);
        assert!(outcome.fallback);

        // The non-stroke limit itself is still inside the gap
        assert!(ladder().classify(81.5).fallback);
    }

    #[test]
    fn test_ladder_is_clamped_nondecreasing() {
        let ladder = DiagnosisThresholds::new(50.0, 40.0, 30.0, 90.0, 85.0);
        assert_eq!(ladder.ischaemic, 50.0);
        assert_eq!(ladder.tia, 50.0);
        assert_eq!(ladder.non_stroke, 90.0);
        // An empty ischaemic band sends the draw straight to the next rung
        assert_eq!(ladder.classify(50.5).diagnosis, Diagnosis::StrokeMimic);
    }

    #[test]
    fn test_sample_with_mean_variates_has_empty_gap() {
        let config = SimulationConfig::default();
        let ladder = DiagnosisThresholds::sample(&config, &mut MeanVariates::new());
        assert_eq!(ladder, DiagnosisThresholds::new(10.0, 60.0, 70.0, 80.0, 80.0));
        assert_eq!(ladder.classify(81.0).diagnosis, Diagnosis::NonStroke);
    }
}
