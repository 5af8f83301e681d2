//! Ward length-of-stay table
//!
//! One entry per (diagnosis, baseline mRS) pair. An entry carries the mean
//! stay, the thrombolysis reduction that applies to it, and how far the mRS
//! may improve by discharge.

use crate::types::{Diagnosis, SimulationConfig, MAX_MRS, MRS_TIERS};

/// Stay parameters for one (diagnosis, mRS) cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StayProfile {
    /// Mean of the exponential stay
    pub mean: f64,
    /// Fraction of the stay kept after thrombolysis, when it applies
    pub thrombolysis_factor: Option<f64>,
    /// Largest mRS improvement by discharge
    pub max_improvement: u8,
    /// Largest mRS improvement by discharge after thrombolysis
    pub max_improvement_thrombolysed: u8,
}

impl StayProfile {
    /// Upper bound of the discharge improvement draw
    pub fn improvement_bound(&self, thrombolysed: bool) -> u8 {
        if thrombolysed {
            self.max_improvement_thrombolysed
        } else {
            self.max_improvement
        }
    }
}

/// Stay profiles keyed by diagnosis and baseline mRS
#[derive(Debug, Clone, PartialEq)]
pub struct LengthOfStayTable {
    ich: [StayProfile; MRS_TIERS],
    ischaemic: [StayProfile; MRS_TIERS],
    tia: StayProfile,
    other: StayProfile,
}

impl LengthOfStayTable {
    /// Build the table from a configuration
    pub fn from_config(config: &SimulationConfig) -> Self {
        let los = &config.length_of_stay;
        let factor = config.thrombolysis_los_factor;

        let ich = std::array::from_fn(|tier| StayProfile {
            mean: los.ich[tier],
            thrombolysis_factor: None,
            max_improvement: u8::from(tier > 0),
            max_improvement_thrombolysed: u8::from(tier > 0),
        });

        let ischaemic = std::array::from_fn(|tier| StayProfile {
            mean: los.ischaemic[tier],
            thrombolysis_factor: (tier > 0).then_some(factor),
            max_improvement: u8::from(tier > 0),
            max_improvement_thrombolysed: match tier {
                0 => 0,
                1 => 1,
                _ => 2,
            },
        });

        let flat = |mean: f64| StayProfile {
            mean,
            thrombolysis_factor: None,
            max_improvement: 0,
            max_improvement_thrombolysed: 0,
        };

        Self { ich, ischaemic, tia: flat(los.tia), other: flat(los.other) }
    }

    /// Profile for a diagnosis and baseline mRS (clamped to 0..=5)
    pub fn lookup(&self, diagnosis: Diagnosis, mrs: u8) -> &StayProfile {
        let tier = usize::from(mrs.min(MAX_MRS));
        match diagnosis {
            Diagnosis::Ich => &self.ich[tier],
            Diagnosis::Ischaemic => &self.ischaemic[tier],
            Diagnosis::Tia => &self.tia,
            Diagnosis::StrokeMimic | Diagnosis::NonStroke => &self.other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LengthOfStayTable {
        LengthOfStayTable::from_config(&SimulationConfig::default())
    }

    #[test]
    fn test_means_follow_configuration() {
        let table = table();
        assert_eq!(table.lookup(Diagnosis::Ich, 3).mean, 17_280.0);
        assert_eq!(table.lookup(Diagnosis::Ischaemic, 2).mean, 10_080.0);
        assert_eq!(table.lookup(Diagnosis::Tia, 5).mean, 1_440.0);
        assert_eq!(table.lookup(Diagnosis::NonStroke, 0).mean, 4_320.0);
    }

    #[test]
    fn test_thrombolysis_factor_only_for_ischaemic_with_disability() {
        let table = table();
        assert_eq!(table.lookup(Diagnosis::Ischaemic, 0).thrombolysis_factor, None);
        assert_eq!(table.lookup(Diagnosis::Ischaemic, 1).thrombolysis_factor, Some(0.75));
        assert_eq!(table.lookup(Diagnosis::Ischaemic, 5).thrombolysis_factor, Some(0.75));
        assert_eq!(table.lookup(Diagnosis::Ich, 4).thrombolysis_factor, None);
    }

    #[test]
    fn test_improvement_bounds() {
        let table = table();
        assert_eq!(table.lookup(Diagnosis::Ich, 0).improvement_bound(false), 0);
        assert_eq!(table.lookup(Diagnosis::Ich, 5).improvement_bound(true), 1);
        assert_eq!(table.lookup(Diagnosis::Ischaemic, 1).improvement_bound(true), 1);
        assert_eq!(table.lookup(Diagnosis::Ischaemic, 3).improvement_bound(true), 2);
        assert_eq!(table.lookup(Diagnosis::Ischaemic, 3).improvement_bound(false), 1);
        assert_eq!(table.lookup(Diagnosis::Tia, 2).improvement_bound(true), 0);
    }
}
