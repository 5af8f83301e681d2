// Stroke Pathway Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/stroke-pathway-simulator
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/stroke-pathway-simulator --runs 10 --ward-beds 45 --sdec-availability 75 --verbose
// ```

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use stroke_pathway_simulator::simulation::{LoggingConfig, SimulationOrchestrator, TrialOutput};
use stroke_pathway_simulator::types::{CliArgs, OutputFormat, SimulationConfig};
use stroke_pathway_simulator::ObservationRecord;
use tracing::{error, info};

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // The guard flushes the file appender when main returns
    let mut logging = LoggingConfig::from_flags(args.verbose, args.debug);
    if let Some(dir) = &args.log_dir {
        logging = logging.with_file_logging(dir.clone());
    }
    let _log_guard = match logging.init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Stroke Pathway Simulator");

    let config = match SimulationConfig::from_cli_args(args.clone()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    info!("Configuration loaded and validated successfully");

    if args.dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - simulation will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_startup_banner(&config);

    if let Err(e) = run(config, args.scenarios.as_deref()) {
        error!("Simulation failed: {:#}", e);
        eprintln!("Simulation failed: {:#}", e);
        process::exit(1);
    }

    info!("Stroke Pathway Simulator completed successfully");
}

/// Run the baseline trial, or every scenario in `scenarios_path`, then
/// report and export the results
fn run(config: SimulationConfig, scenarios_path: Option<&str>) -> Result<()> {
    let orchestrator =
        SimulationOrchestrator::new(config.clone()).context("Failed to create orchestrator")?;

    let trials = match scenarios_path {
        Some(path) => {
            let scenarios = SimulationConfig::load_scenarios(path)
                .with_context(|| format!("Failed to load scenarios from '{}'", path))?;
            eprintln!("Running {} scenarios...", scenarios.len());
            orchestrator.run_scenarios(&scenarios)?
        }
        None => vec![orchestrator.run_trial("Trial 1")?],
    };

    for trial in &trials {
        eprintln!("{}", trial.summary);
        eprintln!();
    }

    if let Some(dir) = &config.records_output {
        let format = config.get_output_format()?;
        for trial in &trials {
            let written = write_trial_records(trial, Path::new(dir), format)?;
            for path in written {
                info!("Observation records written to: {}", path.display());
            }
        }
        eprintln!("Observation records written to: {}", dir);
    }

    if let Some(path) = &config.summary_output {
        write_summary(&trials, Path::new(path))?;
        eprintln!("Trial results written to: {}", path);
    }

    Ok(())
}

/// Write one records file per run of `trial` into `dir`
///
/// Files are named after the trial label and run number.
fn write_trial_records(trial: &TrialOutput, dir: &Path, format: OutputFormat) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create records directory '{}'", dir.display()))?;

    let stem = file_stem(&trial.summary.label);
    let mut written = Vec::with_capacity(trial.runs.len());
    for run in &trial.runs {
        let path = dir.join(format!("{}_run_{}.{}", stem, run.result.run, format.extension()));
        write_records(&run.records, &path, format)?;
        written.push(path);
    }
    Ok(written)
}

/// Write observation records as JSON lines or CSV
fn write_records(records: &[ObservationRecord], path: &Path, format: OutputFormat) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create records file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Json => {
            for record in records {
                let line = serde_json::to_string(record).with_context(|| {
                    format!("Failed to serialize record for patient {}", record.patient_id)
                })?;
                writeln!(writer, "{}", line)?;
            }
        }
        OutputFormat::Csv => {
            writeln!(writer, "{}", ObservationRecord::csv_header())?;
            for record in records {
                writeln!(writer, "{}", record.to_csv_row())?;
            }
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush records file '{}'", path.display()))?;
    Ok(())
}

/// Write every trial summary as one pretty JSON array
fn write_summary(trials: &[TrialOutput], path: &Path) -> Result<()> {
    let summaries: Vec<_> = trials.iter().map(|trial| &trial.summary).collect();
    let json = serde_json::to_string_pretty(&summaries).context("Failed to serialize trial results")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write trial results to '{}'", path.display()))?;
    Ok(())
}

fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Print startup banner and configuration summary
fn print_startup_banner(config: &SimulationConfig) {
    eprintln!("Stroke Pathway Simulator");
    eprintln!("========================");
    eprintln!("Capacity planning for an acute stroke assessment and ward pathway");
    eprintln!();

    print_configuration_summary(config);
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig) {
    eprintln!("Configuration:");
    eprintln!("  Runs: {}", config.number_of_runs);
    eprintln!("  Measured Duration: {} days", config.sim_duration / 1440.0);
    eprintln!("  Warm-up: {} days", config.warm_up_period / 1440.0);
    eprintln!("  Mean Inter-arrival: {} mins", config.mean_inter_arrival_time);
    eprintln!("  Assessment Staff: {}", config.staffing_capacity);
    eprintln!("  Scanners: {}", config.scanner_capacity);
    eprintln!("  Same-day Care Beds: {}", config.same_day_care_capacity);
    eprintln!("  Ward Beds: {}", config.ward_capacity);
    eprintln!("  Therapy Support: {}", if config.therapy_support { "yes" } else { "no" });
    describe_window("Scanner", config.scanner_disruption);
    describe_window("Same-day Care", config.same_day_care_disruption);
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

fn describe_window(name: &str, window: stroke_pathway_simulator::DisruptionWindow) {
    if window.is_enabled() {
        eprintln!(
            "  {} Unavailable: {} mins every {} mins",
            name, window.duration, window.frequency
        );
    } else {
        eprintln!("  {} Unavailable: never", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroke_pathway_simulator::types::PatientId;
    use tempfile::TempDir;

    fn records() -> Vec<ObservationRecord> {
        let mut first = ObservationRecord::new(PatientId(1), 10.0);
        first.consult_time = Some(120.0);
        first.completed = true;
        vec![first, ObservationRecord::new(PatientId(2), 20.0)]
    }

    #[test]
    fn test_json_lines_export() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run_1.jsonl");
        write_records(&records(), &path, OutputFormat::Json).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: ObservationRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.patient_id, PatientId(1));
        assert_eq!(parsed.consult_time, Some(120.0));
    }

    #[test]
    fn test_csv_export_has_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run_1.csv");
        write_records(&records(), &path, OutputFormat::Csv).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(ObservationRecord::csv_header()));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Trial 1"), "trial_1");
        assert_eq!(file_stem("SDEC 75%"), "sdec_75_");
    }
}
