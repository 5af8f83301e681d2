//! Identifier types for the stroke pathway simulator
//!
//! Patients and processes are numbered by per-run monotonic counters so that
//! identically seeded runs produce identical identifiers. Trials carry a
//! UUID so exported results from different invocations never collide.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Identity of a patient, unique within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub u64);

impl PatientId {
    /// Raw counter value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PAT_{}", self.0)
    }
}

/// Identity of a scheduled process (arrival generator, pathway, disruption, monitor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u64);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PROC_{}", self.0)
    }
}

/// Monotonic counter handing out identifiers within a run
#[derive(Debug, Clone, Default)]
pub struct IdCounter {
    last: u64,
}

impl IdCounter {
    /// Create a counter whose first identifier is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Next raw value
    pub fn next_value(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// Number of identifiers handed out so far
    pub fn issued(&self) -> u64 {
        self.last
    }
}

/// Unique identifier for a trial (a batch of runs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrialId(pub Uuid);

impl TrialId {
    /// Create a new random trial ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrialId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRIAL_{}", self.0.simple())
    }
}

impl Serialize for TrialId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("TRIAL_{}", self.0.simple()))
    }
}

impl<'de> Deserialize<'de> for TrialId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let raw = s.strip_prefix("TRIAL_").unwrap_or(&s);
        let uuid = Uuid::parse_str(raw).map_err(serde::de::Error::custom)?;
        Ok(TrialId(uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_counter_is_monotonic() {
        let mut counter = IdCounter::new();
        assert_eq!(counter.next_value(), 1);
        assert_eq!(counter.next_value(), 2);
        assert_eq!(counter.issued(), 2);
    }

    #[test]
    fn test_patient_id_display() {
        assert_eq!(PatientId(7).to_string(), "PAT_7");
        assert_eq!(ProcessId(3).to_string(), "PROC_3");
    }

    #[test]
    fn test_trial_id_serialization() {
        let trial_id = TrialId::new();
        let json = serde_json::to_string(&trial_id).unwrap();
        assert!(json.contains("TRIAL_"));

        let back: TrialId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trial_id);

        let raw = format!("\"{}\"", trial_id.0);
        let from_raw: TrialId = serde_json::from_str(&raw).unwrap();
        assert_eq!(from_raw, trial_id);
    }

    #[test]
    fn test_trial_ids_are_unique() {
        assert_ne!(TrialId::new(), TrialId::new());
    }
}
