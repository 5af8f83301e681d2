//! Error types and handling
//!
//! This module contains error types and error handling for the simulation.
//! Configuration errors are caught before a run starts; invariant violations
//! are defects in the kernel and always stop the run.

use crate::types::{ConfigError, ConfigValidationError};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    InvalidConfiguration(#[from] ConfigValidationError),

    /// Configuration could not be loaded
    #[error("Configuration loading failed: {0}")]
    ConfigLoad(#[from] ConfigError),

    /// Internal consistency check failed during a run
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Result export failed
    #[error("Export failed: {0}")]
    Export(String),
}

impl SimulationError {
    /// Create an invariant violation error
    pub fn invariant_violation(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Create an export error
    pub fn export_error(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Check if this is a recoverable error
    ///
    /// Only configuration problems may be skipped over; they affect a single
    /// trial and leave no partial state behind.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::InvalidConfiguration(_) => true,
            SimulationError::ConfigLoad(_) => true,
            SimulationError::InvariantViolation(_) => false,
            SimulationError::Io(_) => false,
            SimulationError::Serialization(_) => false,
            SimulationError::Export(_) => false,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::InvalidConfiguration(_) => "Configuration",
            SimulationError::ConfigLoad(_) => "Configuration",
            SimulationError::InvariantViolation(_) => "Invariant",
            SimulationError::Io(_) => "IO",
            SimulationError::Serialization(_) => "Serialization",
            SimulationError::Export(_) => "Export",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Error recovery strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Skip the current trial and continue with the next one
    Skip,
    /// Abort the entire sweep
    Abort,
}

/// Error handler deciding whether a failed trial stops the sweep
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler {
    /// Whether recoverable errors skip the trial instead of aborting
    pub continue_on_error: bool,
}

impl ErrorHandler {
    /// Create a new error handler
    pub fn new(continue_on_error: bool) -> Self {
        Self { continue_on_error }
    }

    /// Handle an error raised while running `context`
    pub fn handle_error(&self, error: &SimulationError, context: &str) -> RecoveryStrategy {
        if !error.is_recoverable() {
            error!("Critical error in {}: {}", error.category(), error);
            debug!("Error context: {}", context);
            return RecoveryStrategy::Abort;
        }

        if self.continue_on_error {
            warn!("Recoverable error in {} while running {}: {}", error.category(), context, error);
            RecoveryStrategy::Skip
        } else {
            error!("Error in {} while running {}: {}", error.category(), context, error);
            RecoveryStrategy::Abort
        }
    }

    /// Execute an operation, mapping skipped failures to `Ok(None)`
    pub fn execute_with_recovery<T, F>(&self, operation: F, context: &str) -> SimulationResult<Option<T>>
    where
        F: FnOnce() -> SimulationResult<T>,
    {
        match operation() {
            Ok(result) => Ok(Some(result)),
            Err(error) => match self.handle_error(&error, context) {
                RecoveryStrategy::Skip => {
                    warn!("Skipping {} due to error: {}", context, error);
                    Ok(None)
                }
                RecoveryStrategy::Abort => Err(error),
            },
        }
    }
}
