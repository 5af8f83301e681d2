//! Enumeration types for the stroke pathway simulator
//!
//! This module contains the enumerations shared across the simulation:
//! clinical attributes of a patient, the capacity-limited resources of the
//! pathway, and the output formats understood by the exporter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Working diagnosis resolved early in the pathway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Diagnosis {
    /// Intracerebral haemorrhage. Also the value kept when the threshold
    /// ladder matches no branch.
    #[default]
    Ich,
    /// Ischaemic stroke
    Ischaemic,
    /// Transient ischaemic attack
    Tia,
    /// Presentation mimicking a stroke
    StrokeMimic,
    /// Not a stroke
    NonStroke,
}

impl Diagnosis {
    /// All diagnoses in ladder order
    pub const ALL: [Diagnosis; 5] = [
        Diagnosis::Ich,
        Diagnosis::Ischaemic,
        Diagnosis::Tia,
        Diagnosis::StrokeMimic,
        Diagnosis::NonStroke,
    ];

    /// Whether this is a confirmed stroke (ICH or Ischaemic)
    pub fn is_stroke(&self) -> bool {
        matches!(self, Diagnosis::Ich | Diagnosis::Ischaemic)
    }

    /// Whether admission for this diagnosis is decided by the mimic threshold
    pub fn uses_mimic_admission(&self) -> bool {
        matches!(self, Diagnosis::StrokeMimic | Diagnosis::NonStroke)
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnosis::Ich => write!(f, "ICH"),
            Diagnosis::Ischaemic => write!(f, "I"),
            Diagnosis::Tia => write!(f, "TIA"),
            Diagnosis::StrokeMimic => write!(f, "Stroke Mimic"),
            Diagnosis::NonStroke => write!(f, "Non Stroke"),
        }
    }
}

impl FromStr for Diagnosis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ich" => Ok(Diagnosis::Ich),
            "i" | "ischaemic" | "ischemic" => Ok(Diagnosis::Ischaemic),
            "tia" => Ok(Diagnosis::Tia),
            "stroke mimic" | "strokemimic" | "mimic" => Ok(Diagnosis::StrokeMimic),
            "non stroke" | "nonstroke" => Ok(Diagnosis::NonStroke),
            _ => Err(format!("Unknown diagnosis: {}", s)),
        }
    }
}

/// How the symptom onset time is known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnsetType {
    /// Onset time is known
    Known,
    /// Onset unknown but within the advanced-imaging window
    UnknownInWindow,
    /// Onset unknown and outside the advanced-imaging window
    UnknownOutOfWindow,
}

impl OnsetType {
    /// Map the uniform integer draw (0, 1 or 2) onto an onset type
    pub fn from_draw(draw: i64) -> Self {
        match draw {
            i64::MIN..=0 => OnsetType::Known,
            1 => OnsetType::UnknownInWindow,
            _ => OnsetType::UnknownOutOfWindow,
        }
    }

    /// Numeric code used in exported records
    pub fn code(&self) -> u8 {
        match self {
            OnsetType::Known => 0,
            OnsetType::UnknownInWindow => 1,
            OnsetType::UnknownOutOfWindow => 2,
        }
    }
}

impl fmt::Display for OnsetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnsetType::Known => write!(f, "Known"),
            OnsetType::UnknownInWindow => write!(f, "Unknown (in window)"),
            OnsetType::UnknownOutOfWindow => write!(f, "Unknown (out of window)"),
        }
    }
}

/// Capacity-limited resources of the pathway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Assessment staff (stroke nurses)
    Staffing,
    /// Advanced imaging scanner
    Scanner,
    /// Same-day emergency care beds
    SameDayCare,
    /// Stroke ward beds
    Ward,
}

impl ResourceKind {
    /// All resource kinds
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Staffing,
        ResourceKind::Scanner,
        ResourceKind::SameDayCare,
        ResourceKind::Ward,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Staffing => write!(f, "staffing"),
            ResourceKind::Scanner => write!(f, "scanner"),
            ResourceKind::SameDayCare => write!(f, "same-day care"),
            ResourceKind::Ward => write!(f, "ward"),
        }
    }
}

/// Output format for exported observation records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// JSON lines, one record per line
    Json,
    /// CSV format for tabular data
    Csv,
}

impl OutputFormat {
    /// File extension used for exported files
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "jsonl",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
