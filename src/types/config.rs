//! Configuration structures for the stroke pathway simulator
//!
//! This module contains the simulation configuration, its file and CLI
//! layers, and the validation that must pass before any run starts.
//! All durations are in minutes.

use super::{Diagnosis, OutputFormat, ResourceKind};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Minutes in a simulated day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Highest baseline disability score
pub const MAX_MRS: u8 = 5;

/// Number of disability tiers (mRS 0 through 5)
pub const MRS_TIERS: usize = MAX_MRS as usize + 1;

/// Recurring unavailability window for a disruptable resource
///
/// The first window opens at `first_window_at` (or after one `frequency` when
/// unset), lasts `duration`, and is followed by `frequency` minutes of
/// availability. A frequency of zero disables the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisruptionWindow {
    /// Available time between two unavailability windows
    pub frequency: f64,
    /// Length of each unavailability window
    pub duration: f64,
    /// Start of the first window, defaults to `frequency`
    #[serde(default)]
    pub first_window_at: Option<f64>,
}

impl Default for DisruptionWindow {
    fn default() -> Self {
        Self::disabled()
    }
}

impl DisruptionWindow {
    /// A window that never opens
    pub fn disabled() -> Self {
        Self { frequency: 0.0, duration: 0.0, first_window_at: None }
    }

    /// A recurring window with the given frequency and duration
    pub fn new(frequency: f64, duration: f64) -> Self {
        Self { frequency, duration, first_window_at: None }
    }

    /// Open the first window at `time` instead of after one frequency
    pub fn starting_at(mut self, time: f64) -> Self {
        self.first_window_at = Some(time);
        self
    }

    /// Build a daily window from the percentage of the day the resource is open
    ///
    /// Mirrors the percentage-of-day input of the interactive front end:
    /// the resource is available for `pct`% of each day and unavailable for
    /// the remainder. 100% disables the window. At 50% or below the closed
    /// part is at least as long as the open part, and [`SimulationConfig::validate`]
    /// rejects the window. That includes 0%, which is not read as disabled.
    pub fn from_daily_availability(pct: f64) -> Self {
        let pct = pct.clamp(0.0, 100.0);
        if pct >= 100.0 {
            return Self::disabled();
        }
        let frequency = MINUTES_PER_DAY * (pct / 100.0);
        Self::new(frequency, MINUTES_PER_DAY - frequency)
    }

    /// Whether the window ever opens
    pub fn is_enabled(&self) -> bool {
        self.frequency > 0.0
    }

    /// Time at which the first window opens
    pub fn first_start(&self) -> f64 {
        self.first_window_at.unwrap_or(self.frequency)
    }
}

/// Mean ward length of stay, keyed by diagnosis and baseline mRS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthOfStayConfig {
    /// ICH stays for mRS 0..=5
    pub ich: [f64; MRS_TIERS],
    /// Ischaemic stays for mRS 0..=5
    pub ischaemic: [f64; MRS_TIERS],
    /// TIA stay
    pub tia: f64,
    /// Stroke mimic and non-stroke stay
    pub other: f64,
}

impl Default for LengthOfStayConfig {
    fn default() -> Self {
        Self {
            ich: [17_280.0; MRS_TIERS],
            ischaemic: [
                MINUTES_PER_DAY * 2.0,
                MINUTES_PER_DAY * 3.0,
                MINUTES_PER_DAY * 7.0,
                14_400.0,
                14_400.0,
                14_400.0 * 2.0,
            ],
            tia: 1_440.0,
            other: 4_320.0,
        }
    }
}

/// Command line arguments structure
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stroke-pathway-simulator",
    version = "0.1.0",
    about = "Stroke Pathway Simulator - capacity planning for acute stroke assessment and ward care",
    long_about = "Runs a stochastic discrete-event model of an acute stroke pathway: patients arrive, queue for assessment staff, are imaged, may pass through same-day emergency care, and are admitted to the stroke ward unless admission is avoided. Reports queues, occupancy, cost and savings per run and per trial.

EXAMPLES:
    # Run with default settings
    stroke-pathway-simulator

    # Use a configuration file
    stroke-pathway-simulator --config config.json

    # Same-day care open 70% of the day with therapy support
    stroke-pathway-simulator --sdec-availability 70 --therapy-support

    # Run a sweep of scenarios, skipping invalid ones
    stroke-pathway-simulator --scenarios scenarios.json --continue-on-error

    # Generate configuration template
    stroke-pathway-simulator --print-config > my-config.json

    # Validate configuration without running
    stroke-pathway-simulator --config my-config.json --dry-run

CONFIGURATION:
    Configuration can be provided via:
    1. Command line arguments (highest priority)
    2. Configuration file (--config flag)
    3. Default values (lowest priority)

    Supported configuration file formats: JSON (.json)"
)]
pub struct CliArgs {
    /// Configuration file path (JSON format)
    #[arg(
        short,
        long,
        help = "Configuration file path (JSON format)",
        long_help = "Path to a JSON configuration file. CLI arguments will override file settings."
    )]
    pub config: Option<String>,

    /// Scenario file with one partial configuration per trial
    #[arg(
        long,
        help = "Scenario file (JSON array of partial configurations)",
        long_help = "Path to a JSON array of partial configurations. Each entry runs as its own trial on top of the base configuration."
    )]
    pub scenarios: Option<String>,

    /// Number of independent runs per trial
    #[arg(long, help = "Number of runs per trial")]
    pub runs: Option<usize>,

    /// Measured duration of each run in minutes
    #[arg(long, help = "Measured duration per run (minutes)")]
    pub duration: Option<f64>,

    /// Warm-up period in minutes
    #[arg(long, help = "Warm-up period excluded from statistics (minutes)")]
    pub warm_up: Option<f64>,

    /// Mean time between arrivals in minutes
    #[arg(long, help = "Mean inter-arrival time (minutes)")]
    pub inter_arrival: Option<f64>,

    /// Number of assessment staff
    #[arg(long, help = "Number of assessment staff")]
    pub staff: Option<usize>,

    /// Number of advanced imaging scanners
    #[arg(long, help = "Number of advanced imaging scanners")]
    pub scanners: Option<usize>,

    /// Number of same-day emergency care beds
    #[arg(long, help = "Number of same-day care beds")]
    pub sdec_beds: Option<usize>,

    /// Number of ward beds
    #[arg(long, help = "Number of ward beds")]
    pub ward_beds: Option<usize>,

    /// Percentage of each day the same-day care unit is open
    #[arg(
        long,
        help = "Percentage of the day same-day care is available (0-100)",
        long_help = "Percentage of each day the same-day care unit is open. 100 disables the unavailability window."
    )]
    pub sdec_availability: Option<f64>,

    /// Percentage of each day the advanced imaging scanner is available
    #[arg(long, help = "Percentage of the day the scanner is available (0-100)")]
    pub scanner_availability: Option<f64>,

    /// Run same-day care with full therapy support
    #[arg(long, help = "Run same-day care with full therapy support")]
    pub therapy_support: bool,

    /// Random seed for reproducible results
    #[arg(long, help = "Random seed for reproducible results")]
    pub seed: Option<u64>,

    /// Execute the runs of a trial in parallel
    #[arg(long, help = "Execute runs of a trial in parallel")]
    pub parallel: bool,

    /// Continue with the next trial when a trial fails validation
    #[arg(long, help = "Skip failed trials instead of aborting")]
    pub continue_on_error: bool,

    /// Output format for exported records
    #[arg(long, help = "Record output format (json or csv)")]
    pub output_format: Option<String>,

    /// Directory for per-run observation records
    #[arg(long, help = "Directory for per-run observation records")]
    pub records_output: Option<String>,

    /// File for the trial results
    #[arg(long, help = "Output path for trial results (JSON)")]
    pub summary_output: Option<String>,

    /// Directory for rolling log files
    #[arg(long, help = "Write logs to daily rolling files in this directory")]
    pub log_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, help = "Enable debug logging")]
    pub debug: bool,

    /// Dry run mode - validate configuration without running simulation
    #[arg(long, help = "Validate configuration without running simulation")]
    pub dry_run: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in JSON format and exit")]
    pub print_config: bool,
}

/// Configuration file structure (allows partial configuration)
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    /// Measured duration per run
    pub sim_duration: Option<f64>,
    /// Warm-up period
    pub warm_up_period: Option<f64>,
    /// Number of runs per trial
    pub number_of_runs: Option<usize>,
    /// Mean inter-arrival time
    pub mean_inter_arrival_time: Option<f64>,
    /// Number of assessment staff
    pub staffing_capacity: Option<usize>,
    /// Number of scanners
    pub scanner_capacity: Option<usize>,
    /// Number of same-day care beds
    pub same_day_care_capacity: Option<usize>,
    /// Number of ward beds
    pub ward_capacity: Option<usize>,
    /// Mean consultation time
    pub mean_consult_time: Option<f64>,
    /// Mean advanced imaging time
    pub mean_advanced_imaging_time: Option<f64>,
    /// Mean basic imaging time
    pub mean_basic_imaging_time: Option<f64>,
    /// Mean same-day care stay
    pub mean_same_day_care_time: Option<f64>,
    /// Ward length-of-stay table
    pub length_of_stay: Option<LengthOfStayConfig>,
    /// Thrombolysis length-of-stay factor
    pub thrombolysis_los_factor: Option<f64>,
    /// Mean baseline mRS
    pub mean_mrs: Option<f64>,
    /// ICH threshold percentage
    pub ich_threshold: Option<f64>,
    /// Ischaemic threshold percentage
    pub ischaemic_threshold: Option<f64>,
    /// TIA threshold percentage
    pub tia_threshold: Option<f64>,
    /// Stroke mimic threshold percentage
    pub stroke_mimic_threshold: Option<f64>,
    /// TIA admission threshold percentage
    pub tia_admission_threshold: Option<f64>,
    /// Stroke mimic admission threshold percentage
    pub stroke_mimic_admission_threshold: Option<f64>,
    /// Scanner unavailability window
    pub scanner_disruption: Option<DisruptionWindow>,
    /// Same-day care unavailability window
    pub same_day_care_disruption: Option<DisruptionWindow>,
    /// Scanner availability as a percentage of the day (overrides the window)
    pub scanner_availability: Option<f64>,
    /// Same-day care availability as a percentage of the day (overrides the window)
    pub same_day_care_availability: Option<f64>,
    /// Therapy support in same-day care
    pub therapy_support: Option<bool>,
    /// Cost of one inpatient bed day
    pub bed_day_cost: Option<f64>,
    /// Same-day care staffing cost per minute
    pub same_day_care_staff_cost_per_minute: Option<f64>,
    /// Polling interval while a same-day care discharge is blocked
    pub discharge_poll_interval: Option<f64>,
    /// Interval of periodic occupancy snapshots
    pub snapshot_interval: Option<f64>,
    /// Random seed for reproducible results
    pub seed: Option<u64>,
    /// Execute runs in parallel
    pub parallel_runs: Option<bool>,
    /// Skip failed trials instead of aborting
    pub continue_on_error: Option<bool>,
    /// Output format for exported records
    pub output_format: Option<String>,
    /// Directory for per-run observation records
    pub records_output: Option<String>,
    /// Output path for trial results
    pub summary_output: Option<String>,
}

/// Configuration for the stroke pathway simulation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationConfig {
    /// Measured duration of each run, after warm-up
    pub sim_duration: f64,

    /// Initial interval excluded from statistics
    pub warm_up_period: f64,

    /// Number of independent runs per trial
    pub number_of_runs: usize,

    /// Mean time between patient arrivals
    pub mean_inter_arrival_time: f64,

    /// Number of assessment staff
    pub staffing_capacity: usize,

    /// Number of advanced imaging scanners
    pub scanner_capacity: usize,

    /// Number of same-day care beds
    pub same_day_care_capacity: usize,

    /// Number of ward beds
    pub ward_capacity: usize,

    /// Mean staff consultation time
    pub mean_consult_time: f64,

    /// Mean imaging time on the advanced path
    pub mean_advanced_imaging_time: f64,

    /// Mean imaging time on the basic path
    pub mean_basic_imaging_time: f64,

    /// Mean same-day care stay
    pub mean_same_day_care_time: f64,

    /// Ward length-of-stay table
    pub length_of_stay: LengthOfStayConfig,

    /// Fraction of the sampled Ischaemic stay kept after thrombolysis
    pub thrombolysis_los_factor: f64,

    /// Mean of the exponential baseline mRS draw
    pub mean_mrs: f64,

    /// Cumulative ICH threshold (percent)
    pub ich_threshold: f64,

    /// Cumulative Ischaemic threshold (percent)
    pub ischaemic_threshold: f64,

    /// Cumulative TIA threshold (percent)
    pub tia_threshold: f64,

    /// Cumulative stroke mimic threshold (percent), also the non-stroke threshold
    pub stroke_mimic_threshold: f64,

    /// TIA admission threshold (percent)
    pub tia_admission_threshold: f64,

    /// Stroke mimic and non-stroke admission threshold (percent)
    pub stroke_mimic_admission_threshold: f64,

    /// Scanner unavailability window
    pub scanner_disruption: DisruptionWindow,

    /// Same-day care unavailability window
    pub same_day_care_disruption: DisruptionWindow,

    /// Same-day care runs with full therapy support
    pub therapy_support: bool,

    /// Cost of one inpatient bed day
    pub bed_day_cost: f64,

    /// Same-day care medical staffing cost per minute
    pub same_day_care_staff_cost_per_minute: f64,

    /// Polling interval while a same-day care discharge waits for a ward bed
    pub discharge_poll_interval: f64,

    /// Interval of periodic occupancy snapshots, 0 disables them
    pub snapshot_interval: f64,

    /// Random seed for reproducible results
    pub seed: Option<u64>,

    /// Execute runs of a trial in parallel
    pub parallel_runs: bool,

    /// Skip failed trials instead of aborting
    pub continue_on_error: bool,

    /// Output format for exported records
    pub output_format: String,

    /// Directory for per-run observation records
    pub records_output: Option<String>,

    /// Output path for trial results
    pub summary_output: Option<String>,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Configuration file read error
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unsupported configuration file format
    #[error("Unsupported configuration file format: {0} (supported: .json)")]
    UnsupportedFormat(String),
}

/// Validation errors for simulation configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// Run count is invalid
    #[error("Number of runs must be greater than 0, got {0}")]
    InvalidRunCount(usize),

    /// A resource pool has no capacity
    #[error("Capacity of the {resource} pool must be greater than 0, got {capacity}")]
    InvalidCapacity {
        /// Resource with invalid capacity
        resource: ResourceKind,
        /// The invalid capacity
        capacity: usize,
    },

    /// A mean duration is not positive
    #[error("Invalid duration for {field}: {value} (must be greater than 0)")]
    InvalidDuration {
        /// Name of the field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// A duration that may be zero is negative
    #[error("Invalid duration for {field}: {value} (must not be negative)")]
    NegativeDuration {
        /// Name of the field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// A ward length of stay is not positive
    #[error("Invalid length of stay for {diagnosis} at mRS {tier}: {value} (must be greater than 0)")]
    InvalidLengthOfStay {
        /// Diagnosis of the table entry
        diagnosis: Diagnosis,
        /// mRS tier of the table entry
        tier: usize,
        /// The invalid value
        value: f64,
    },

    /// Percentage value is out of range
    #[error("Invalid percentage for {field}: {value} (must be between 0 and 100)")]
    InvalidPercentage {
        /// Name of the field with invalid percentage
        field: String,
        /// The invalid percentage value
        value: f64,
    },

    /// A multiplicative factor is out of range
    #[error("Invalid factor for {field}: {value} (must be in (0, 1])")]
    InvalidFactor {
        /// Name of the field
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Disruption window holds the resource permanently
    #[error("Invalid {resource} disruption: duration {duration} must be less than frequency {frequency}")]
    InvalidDisruption {
        /// Disrupted resource
        resource: ResourceKind,
        /// Configured frequency
        frequency: f64,
        /// Configured duration
        duration: f64,
    },

    /// Disruption window has a negative parameter
    #[error("Invalid {resource} disruption: {field} must not be negative, got {value}")]
    NegativeDisruption {
        /// Disrupted resource
        resource: ResourceKind,
        /// Name of the parameter
        field: String,
        /// The invalid value
        value: f64,
    },

    /// Output format is not recognised
    #[error("Unknown output format: {0}")]
    InvalidOutputFormat(String),
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let sim_duration = 525_600.0;
        Self {
            sim_duration,
            warm_up_period: sim_duration / 5.0,
            number_of_runs: 5,
            mean_inter_arrival_time: 180.0,
            staffing_capacity: 2,
            scanner_capacity: 1,
            same_day_care_capacity: 5,
            ward_capacity: 49,
            mean_consult_time: 120.0,
            mean_advanced_imaging_time: 20.0,
            mean_basic_imaging_time: 20.0,
            mean_same_day_care_time: 240.0,
            length_of_stay: LengthOfStayConfig::default(),
            thrombolysis_los_factor: 0.75,
            mean_mrs: 2.0,
            ich_threshold: 10.0,
            ischaemic_threshold: 60.0,
            tia_threshold: 70.0,
            stroke_mimic_threshold: 80.0,
            tia_admission_threshold: 10.0,
            stroke_mimic_admission_threshold: 30.0,
            scanner_disruption: DisruptionWindow::disabled(),
            same_day_care_disruption: DisruptionWindow::disabled(),
            therapy_support: false,
            bed_day_cost: 876.0,
            same_day_care_staff_cost_per_minute: 0.50,
            discharge_poll_interval: 1.0,
            snapshot_interval: 0.0,
            seed: None,
            parallel_runs: false,
            continue_on_error: false,
            output_format: "json".to_string(),
            records_output: None,
            summary_output: None,
        }
    }
}

impl SimulationConfig {
    /// Create configuration from parsed CLI arguments
    pub fn from_cli_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut config = Self::default();

        // Load from config file if specified
        if let Some(config_path) = &args.config {
            config = Self::from_file(config_path)?;
        }

        // Override with command line arguments (CLI takes precedence)
        Self::apply_cli_overrides(&mut config, args);

        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = Self::read_json_file(path.as_ref())?;
        let config_file: ConfigFile = serde_json::from_str(&content)?;
        Ok(Self::from_config_file(config_file))
    }

    /// Load a scenario list from a JSON file
    pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioOverride>, ConfigError> {
        let content = Self::read_json_file(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    fn read_json_file(path: &Path) -> Result<String, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(fs::read_to_string(path)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Create configuration from a config file, merging with defaults
    pub fn from_config_file(config_file: ConfigFile) -> Self {
        Self::default().merged_with(&config_file)
    }

    /// Apply the fields set in a partial configuration on top of this one
    pub fn merged_with(&self, file: &ConfigFile) -> Self {
        let base = self.clone();
        let mut merged = Self {
            sim_duration: file.sim_duration.unwrap_or(base.sim_duration),
            warm_up_period: file.warm_up_period.unwrap_or(base.warm_up_period),
            number_of_runs: file.number_of_runs.unwrap_or(base.number_of_runs),
            mean_inter_arrival_time: file
                .mean_inter_arrival_time
                .unwrap_or(base.mean_inter_arrival_time),
            staffing_capacity: file.staffing_capacity.unwrap_or(base.staffing_capacity),
            scanner_capacity: file.scanner_capacity.unwrap_or(base.scanner_capacity),
            same_day_care_capacity: file
                .same_day_care_capacity
                .unwrap_or(base.same_day_care_capacity),
            ward_capacity: file.ward_capacity.unwrap_or(base.ward_capacity),
            mean_consult_time: file.mean_consult_time.unwrap_or(base.mean_consult_time),
            mean_advanced_imaging_time: file
                .mean_advanced_imaging_time
                .unwrap_or(base.mean_advanced_imaging_time),
            mean_basic_imaging_time: file
                .mean_basic_imaging_time
                .unwrap_or(base.mean_basic_imaging_time),
            mean_same_day_care_time: file
                .mean_same_day_care_time
                .unwrap_or(base.mean_same_day_care_time),
            length_of_stay: file.length_of_stay.clone().unwrap_or(base.length_of_stay),
            thrombolysis_los_factor: file
                .thrombolysis_los_factor
                .unwrap_or(base.thrombolysis_los_factor),
            mean_mrs: file.mean_mrs.unwrap_or(base.mean_mrs),
            ich_threshold: file.ich_threshold.unwrap_or(base.ich_threshold),
            ischaemic_threshold: file.ischaemic_threshold.unwrap_or(base.ischaemic_threshold),
            tia_threshold: file.tia_threshold.unwrap_or(base.tia_threshold),
            stroke_mimic_threshold: file
                .stroke_mimic_threshold
                .unwrap_or(base.stroke_mimic_threshold),
            tia_admission_threshold: file
                .tia_admission_threshold
                .unwrap_or(base.tia_admission_threshold),
            stroke_mimic_admission_threshold: file
                .stroke_mimic_admission_threshold
                .unwrap_or(base.stroke_mimic_admission_threshold),
            scanner_disruption: file.scanner_disruption.unwrap_or(base.scanner_disruption),
            same_day_care_disruption: file
                .same_day_care_disruption
                .unwrap_or(base.same_day_care_disruption),
            therapy_support: file.therapy_support.unwrap_or(base.therapy_support),
            bed_day_cost: file.bed_day_cost.unwrap_or(base.bed_day_cost),
            same_day_care_staff_cost_per_minute: file
                .same_day_care_staff_cost_per_minute
                .unwrap_or(base.same_day_care_staff_cost_per_minute),
            discharge_poll_interval: file
                .discharge_poll_interval
                .unwrap_or(base.discharge_poll_interval),
            snapshot_interval: file.snapshot_interval.unwrap_or(base.snapshot_interval),
            seed: file.seed.or(base.seed),
            parallel_runs: file.parallel_runs.unwrap_or(base.parallel_runs),
            continue_on_error: file.continue_on_error.unwrap_or(base.continue_on_error),
            output_format: file.output_format.clone().unwrap_or(base.output_format),
            records_output: file.records_output.clone().or(base.records_output),
            summary_output: file.summary_output.clone().or(base.summary_output),
        };

        // Percentage-of-day inputs take precedence over explicit windows
        if let Some(pct) = file.scanner_availability {
            merged.scanner_disruption = DisruptionWindow::from_daily_availability(pct);
        }
        if let Some(pct) = file.same_day_care_availability {
            merged.same_day_care_disruption = DisruptionWindow::from_daily_availability(pct);
        }

        merged
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(config: &mut Self, args: CliArgs) {
        if let Some(value) = args.runs {
            config.number_of_runs = value;
        }
        if let Some(value) = args.duration {
            config.sim_duration = value;
        }
        if let Some(value) = args.warm_up {
            config.warm_up_period = value;
        }
        if let Some(value) = args.inter_arrival {
            config.mean_inter_arrival_time = value;
        }
        if let Some(value) = args.staff {
            config.staffing_capacity = value;
        }
        if let Some(value) = args.scanners {
            config.scanner_capacity = value;
        }
        if let Some(value) = args.sdec_beds {
            config.same_day_care_capacity = value;
        }
        if let Some(value) = args.ward_beds {
            config.ward_capacity = value;
        }
        if let Some(pct) = args.sdec_availability {
            config.same_day_care_disruption = DisruptionWindow::from_daily_availability(pct);
        }
        if let Some(pct) = args.scanner_availability {
            config.scanner_disruption = DisruptionWindow::from_daily_availability(pct);
        }
        if args.therapy_support {
            config.therapy_support = true;
        }
        if let Some(value) = args.seed {
            config.seed = Some(value);
        }
        if args.parallel {
            config.parallel_runs = true;
        }
        if args.continue_on_error {
            config.continue_on_error = true;
        }
        if let Some(value) = args.output_format {
            config.output_format = value;
        }
        if let Some(value) = args.records_output {
            config.records_output = Some(value);
        }
        if let Some(value) = args.summary_output {
            config.summary_output = Some(value);
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Print configuration as JSON
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Simulated time at which a run stops
    pub fn horizon(&self) -> f64 {
        self.warm_up_period + self.sim_duration
    }

    /// Get the output format as an enum value
    pub fn get_output_format(&self) -> Result<OutputFormat, ConfigValidationError> {
        self.output_format
            .parse()
            .map_err(|_| ConfigValidationError::InvalidOutputFormat(self.output_format.clone()))
    }

    /// Highest baseline mRS that still allows same-day care admission avoidance
    pub fn avoidance_mrs_ceiling(&self) -> u8 {
        if self.therapy_support {
            3
        } else {
            2
        }
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.number_of_runs == 0 {
            return Err(ConfigValidationError::InvalidRunCount(self.number_of_runs));
        }

        self.validate_positive("sim_duration", self.sim_duration)?;
        self.validate_non_negative("warm_up_period", self.warm_up_period)?;

        for (resource, capacity) in [
            (ResourceKind::Staffing, self.staffing_capacity),
            (ResourceKind::Scanner, self.scanner_capacity),
            (ResourceKind::SameDayCare, self.same_day_care_capacity),
            (ResourceKind::Ward, self.ward_capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigValidationError::InvalidCapacity { resource, capacity });
            }
        }

        self.validate_positive("mean_inter_arrival_time", self.mean_inter_arrival_time)?;
        self.validate_positive("mean_consult_time", self.mean_consult_time)?;
        self.validate_positive("mean_advanced_imaging_time", self.mean_advanced_imaging_time)?;
        self.validate_positive("mean_basic_imaging_time", self.mean_basic_imaging_time)?;
        self.validate_positive("mean_same_day_care_time", self.mean_same_day_care_time)?;
        self.validate_positive("mean_mrs", self.mean_mrs)?;
        self.validate_positive("discharge_poll_interval", self.discharge_poll_interval)?;
        self.validate_non_negative("snapshot_interval", self.snapshot_interval)?;
        self.validate_non_negative("bed_day_cost", self.bed_day_cost)?;
        self.validate_non_negative(
            "same_day_care_staff_cost_per_minute",
            self.same_day_care_staff_cost_per_minute,
        )?;
        self.validate_length_of_stay()?;

        if !(self.thrombolysis_los_factor > 0.0 && self.thrombolysis_los_factor <= 1.0) {
            return Err(ConfigValidationError::InvalidFactor {
                field: "thrombolysis_los_factor".to_string(),
                value: self.thrombolysis_los_factor,
            });
        }

        // Validate percentages
        self.validate_percentage("ich_threshold", self.ich_threshold)?;
        self.validate_percentage("ischaemic_threshold", self.ischaemic_threshold)?;
        self.validate_percentage("tia_threshold", self.tia_threshold)?;
        self.validate_percentage("stroke_mimic_threshold", self.stroke_mimic_threshold)?;
        self.validate_percentage("tia_admission_threshold", self.tia_admission_threshold)?;
        self.validate_percentage(
            "stroke_mimic_admission_threshold",
            self.stroke_mimic_admission_threshold,
        )?;

        self.validate_disruption(ResourceKind::Scanner, &self.scanner_disruption)?;
        self.validate_disruption(ResourceKind::SameDayCare, &self.same_day_care_disruption)?;

        self.get_output_format()?;

        Ok(())
    }

    fn validate_length_of_stay(&self) -> Result<(), ConfigValidationError> {
        let los = &self.length_of_stay;
        let tiered = [(Diagnosis::Ich, &los.ich), (Diagnosis::Ischaemic, &los.ischaemic)];
        for (diagnosis, tiers) in tiered {
            for (tier, &value) in tiers.iter().enumerate() {
                if !(value > 0.0) {
                    return Err(ConfigValidationError::InvalidLengthOfStay { diagnosis, tier, value });
                }
            }
        }
        for (diagnosis, value) in [(Diagnosis::Tia, los.tia), (Diagnosis::StrokeMimic, los.other)] {
            if !(value > 0.0) {
                return Err(ConfigValidationError::InvalidLengthOfStay { diagnosis, tier: 0, value });
            }
        }
        Ok(())
    }

    fn validate_disruption(
        &self,
        resource: ResourceKind,
        window: &DisruptionWindow,
    ) -> Result<(), ConfigValidationError> {
        let negative = |field: &str, value: f64| ConfigValidationError::NegativeDisruption {
            resource,
            field: field.to_string(),
            value,
        };

        if window.frequency < 0.0 || window.frequency.is_nan() {
            return Err(negative("frequency", window.frequency));
        }
        if window.duration < 0.0 || window.duration.is_nan() {
            return Err(negative("duration", window.duration));
        }
        if let Some(first) = window.first_window_at {
            if first < 0.0 || first.is_nan() {
                return Err(negative("first_window_at", first));
            }
        }

        // A zero frequency only disables the window when nothing is held
        if window.duration > 0.0 && window.duration >= window.frequency {
            return Err(ConfigValidationError::InvalidDisruption {
                resource,
                frequency: window.frequency,
                duration: window.duration,
            });
        }
        Ok(())
    }

    /// Helper method to validate percentage values
    fn validate_percentage(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !(0.0..=100.0).contains(&value) {
            return Err(ConfigValidationError::InvalidPercentage {
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    fn validate_positive(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !(value > 0.0) || !value.is_finite() {
            return Err(ConfigValidationError::InvalidDuration { field: field.to_string(), value });
        }
        Ok(())
    }

    fn validate_non_negative(&self, field: &str, value: f64) -> Result<(), ConfigValidationError> {
        if !(value >= 0.0) || !value.is_finite() {
            return Err(ConfigValidationError::NegativeDuration { field: field.to_string(), value });
        }
        Ok(())
    }
}

/// One trial of a scenario sweep: a label plus a partial configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ScenarioOverride {
    /// Human readable name of the scenario
    #[serde(default)]
    pub label: Option<String>,
    /// Fields overriding the base configuration
    #[serde(flatten)]
    pub overrides: ConfigFile,
}

impl ScenarioOverride {
    /// Label used in reports, falling back to the scenario position
    pub fn display_label(&self, index: usize) -> String {
        self.label.clone().unwrap_or_else(|| format!("Trial {}", index + 1))
    }
}
