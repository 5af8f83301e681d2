//! Simulation kernel and run orchestration
//!
//! This module contains the event clock, the process model, random variate
//! sources, the processes that drive a run, statistics collection, error
//! handling and logging.
//!
//! # Overview
//!
//! - **Clock**: time-ordered agenda of process resumptions
//! - **Process / RunContext**: resumable state machines and the run state they share
//! - **Model**: one run, from time zero to the horizon
//! - **SimulationOrchestrator**: trials of independent runs and scenario batches
//! - **StatisticsCollector**: warm-up filtered observations and run summaries
//! - **SimulationError**: error handling for configuration and kernel failures
//!
//! # Usage Example
//!
//! ```rust
//! use stroke_pathway_simulator::simulation::*;
//! use stroke_pathway_simulator::types::*;
//!
//! let config = SimulationConfig {
//!     number_of_runs: 1,
//!     sim_duration: 1_440.0,
//!     warm_up_period: 0.0,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let orchestrator = SimulationOrchestrator::new(config).unwrap();
//! let output = orchestrator.run_single(1).unwrap();
//! assert_eq!(output.result.run, 1);
//! ```

pub mod arrivals;
pub mod clock;
pub mod disruption;
pub mod error;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod orchestrator;
pub mod process;
pub mod random;
pub mod statistics;

// Re-export all public types for convenience
pub use arrivals::*;
pub use clock::*;
pub use disruption::*;
pub use error::*;
pub use logging::*;
pub use model::*;
pub use monitor::*;
pub use orchestrator::*;
pub use process::*;
pub use random::*;
pub use statistics::*;
