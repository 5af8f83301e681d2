//! Core types and identifiers for the stroke pathway simulator
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the simulation system.
//!
//! # Overview
//!
//! - **Identifiers**: per-run counters for patients and processes, UUIDs for trials
//! - **Enums**: diagnoses, onset types, pathway resources and output formats
//! - **Configuration**: simulation configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use stroke_pathway_simulator::types::*;
//!
//! let config = SimulationConfig {
//!     ward_capacity: 40,
//!     same_day_care_disruption: DisruptionWindow::from_daily_availability(75.0),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert!(Diagnosis::Ischaemic.is_stroke());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
