//! Configuration layering and scenario files, end to end

use clap::Parser;
use std::fs;
use stroke_pathway_simulator::*;
use tempfile::TempDir;

#[test]
fn test_cli_overrides_file_which_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pathway.json");
    fs::write(&path, r#"{ "ward_capacity": 40, "staffing_capacity": 3, "number_of_runs": 8 }"#).unwrap();

    let args = CliArgs::try_parse_from([
        "stroke-pathway-simulator",
        "--config",
        path.to_str().unwrap(),
        "--ward-beds",
        "45",
        "--sdec-availability",
        "75",
    ])
    .unwrap();
    let config = SimulationConfig::from_cli_args(args).unwrap();

    assert_eq!(config.ward_capacity, 45);
    assert_eq!(config.staffing_capacity, 3);
    assert_eq!(config.number_of_runs, 8);
    assert_eq!(config.scanner_capacity, SimulationConfig::default().scanner_capacity);
    assert_eq!(config.same_day_care_disruption, DisruptionWindow::new(1_080.0, 360.0));
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_file_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{ "ward_capacity": 0 }"#).unwrap();

    let config = SimulationConfig::from_file(&path).unwrap();
    let error = SimulationOrchestrator::new(config).unwrap_err();
    assert!(error.is_recoverable());
    assert!(error.to_string().contains("ward"));
}

#[test]
fn test_scenario_file_drives_a_sweep() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scenarios.json");
    fs::write(
        &path,
        r#"[
            { "label": "No therapy" },
            { "therapy_support": true, "same_day_care_availability": 100.0 }
        ]"#,
    )
    .unwrap();

    let scenarios = SimulationConfig::load_scenarios(&path).unwrap();
    assert_eq!(scenarios.len(), 2);

    let base = SimulationConfig {
        number_of_runs: 1,
        sim_duration: 2_880.0,
        warm_up_period: 720.0,
        seed: Some(99),
        ..SimulationConfig::default()
    };
    let trials = SimulationOrchestrator::new(base).unwrap().run_scenarios(&scenarios).unwrap();

    assert_eq!(trials.len(), 2);
    assert_eq!(trials[0].summary.label, "No therapy");
    assert_eq!(trials[1].summary.label, "Trial 2");
    assert_eq!(trials[1].summary.runs[0].same_day_care_staff_cost, 0.0);
}

#[test]
fn test_saved_configuration_reloads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("saved.json");
    let config = SimulationConfig {
        ward_capacity: 38,
        therapy_support: true,
        scanner_disruption: DisruptionWindow::new(1_200.0, 240.0).starting_at(60.0),
        ..SimulationConfig::default()
    };
    config.save_to_file(&path).unwrap();

    let reloaded = SimulationConfig::from_file(&path).unwrap();
    assert_eq!(reloaded.ward_capacity, 38);
    assert!(reloaded.therapy_support);
    assert_eq!(reloaded.scanner_disruption.first_window_at, Some(60.0));
}
