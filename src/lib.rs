//! Stroke Pathway Simulator
//!
//! A stochastic discrete-event simulation of an acute stroke pathway, used to
//! size staffing, scanners, same-day emergency care and ward beds against a
//! stream of suspected stroke arrivals.
//!
//! # Overview
//!
//! Patients arrive at random, wait for assessment staff, are imaged, may pass
//! through same-day emergency care, and are then either sent home or queued
//! for a ward bed. Scanners and same-day care can be taken out of service on
//! a recurring daily window. Each run reports queue times, occupancy, avoided
//! admissions, cost savings and disability outcomes after a warm-up period.
//!
//! ## Key Features
//!
//! - **Process-based kernel**: a time-ordered clock resuming explicit state machines
//! - **Priority resource pools**: FIFO within priority, disruptions served first
//! - **Seeded runs**: each run's random stream derives from the base seed and run number
//! - **Trials and scenarios**: batches of runs, optionally in parallel, over override sets
//! - **Exports**: per-patient records as JSON lines or CSV, trial summaries as JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use stroke_pathway_simulator::*;
//!
//! let config = SimulationConfig {
//!     number_of_runs: 2,
//!     sim_duration: 2_880.0,
//!     warm_up_period: 1_440.0,
//!     seed: Some(1),
//!     ..Default::default()
//! };
//!
//! let orchestrator = SimulationOrchestrator::new(config)?;
//! let trial = orchestrator.run_trial("baseline")?;
//! println!("{}", trial.summary);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums and configuration
//! - [`resources`]: Capacity-limited resource pools
//! - [`patient`]: Patients, diagnosis, length of stay and the pathway process
//! - [`simulation`]: Clock, process model, runs, trials, statistics and logging
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Types     │    │  Resources  │    │   Patient   │
//! │             │    │             │    │             │
//! │ Identifiers │◄───┤ Pools       │◄───┤ Diagnosis   │
//! │ Enums       │    │ Priority    │    │ Stay table  │
//! │ Config      │    │ queues      │    │ Pathway     │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                   ▲                   ▲
//!        │                   │                   │
//! ┌──────────────────────────────────────────────────┐
//! │                    Simulation                    │
//! │  Clock · Model · Orchestrator · Statistics       │
//! └──────────────────────────────────────────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

// Module declarations
pub mod patient;
pub mod resources;
pub mod simulation;

pub mod types;

// Core types and identifiers
pub use types::{
    CliArgs,
    ConfigError,
    ConfigFile,
    ConfigValidationError,
    // Enums
    Diagnosis,
    DisruptionWindow,
    LengthOfStayConfig,
    OnsetType,
    OutputFormat,
    // Identifiers
    PatientId,
    ProcessId,
    ResourceKind,
    ScenarioOverride,
    // Configuration
    SimulationConfig,
    TrialId,
};

// Resources
pub use resources::{ResourcePool, ResourcePools, DISRUPTION_PRIORITY, NORMAL_PRIORITY};

// Patients and the pathway
pub use patient::{DiagnosisThresholds, LengthOfStayTable, PathwayProcess, Patient, Stage};

// Simulation types and functionality
pub use simulation::{
    Clock, LoggingConfig, MeanVariates, Model, ObservationRecord, OccupancySnapshot, RandomSource,
    RunOutput, RunResult, SimTime, SimulationError, SimulationOrchestrator, SimulationResult,
    TrialOutput, TrialSummary, VariateSource,
};
