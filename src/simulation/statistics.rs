//! Statistics collection and reporting
//!
//! The collector keeps one [`ObservationRecord`] per patient observed after
//! warm-up, the event-driven queue and occupancy samples, and the run-level
//! counters. At the end of a run it is reduced to a [`RunResult`]; a trial's
//! run results are averaged into a [`TrialSummary`].

use super::clock::SimTime;
use crate::types::{
    Diagnosis, OnsetType, PatientId, SimulationConfig, TrialId, MINUTES_PER_DAY,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything observed about one patient
///
/// Fields observed before the end of warm-up stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    /// Patient the record describes
    pub patient_id: PatientId,
    /// Time of the latest post-warm-up observation
    pub recorded_at: SimTime,
    /// Whether the patient left the pathway before the horizon
    pub completed: bool,
    /// Time spent waiting for assessment staff
    pub staffing_queue_time: Option<f64>,
    /// Consultation duration
    pub consult_time: Option<f64>,
    /// Time the imaging stage began
    pub imaging_started_at: Option<SimTime>,
    /// Imaging duration on the advanced path
    pub advanced_imaging_time: Option<f64>,
    /// Imaging duration on the basic path
    pub basic_imaging_time: Option<f64>,
    /// Scanner disruption status at imaging
    pub scanner_unavailable: Option<bool>,
    /// Same-day care disruption status at imaging
    pub same_day_care_unavailable: Option<bool>,
    /// Same-day care occupancy after this patient joined
    pub same_day_care_occupancy: Option<usize>,
    /// Same-day care stay
    pub same_day_care_time: Option<f64>,
    /// Time a same-day care discharge waited for a ward bed
    pub same_day_care_block_time: Option<f64>,
    /// Thrombolysis given
    pub thrombolysed: Option<bool>,
    /// Admission avoided through same-day care
    pub admission_avoided: Option<bool>,
    /// Onset type
    pub onset: Option<OnsetType>,
    /// Working diagnosis
    pub diagnosis: Option<Diagnosis>,
    /// The diagnosis draw matched no branch of the threshold ladder
    pub diagnosis_fallback: bool,
    /// Baseline mRS
    pub mrs_baseline: Option<u8>,
    /// mRS at ward discharge
    pub mrs_discharge: Option<u8>,
    /// Improvement between baseline and discharge
    pub mrs_change: Option<i32>,
    /// Time spent waiting for a ward bed
    pub ward_queue_time: Option<f64>,
    /// Time the ward bed was granted
    pub admitted_at: Option<SimTime>,
    /// Ward beds in use after this admission
    pub ward_occupancy: Option<usize>,
    /// Time spent on the ward
    pub ward_length_of_stay: Option<f64>,
    /// Bed-day cost saved by the thrombolysis stay reduction
    pub thrombolysis_saving: Option<f64>,
}

impl ObservationRecord {
    /// Empty record for a patient arriving at `arrived_at`
    pub fn new(patient_id: PatientId, arrived_at: SimTime) -> Self {
        Self {
            patient_id,
            recorded_at: arrived_at,
            completed: false,
            staffing_queue_time: None,
            consult_time: None,
            imaging_started_at: None,
            advanced_imaging_time: None,
            basic_imaging_time: None,
            scanner_unavailable: None,
            same_day_care_unavailable: None,
            same_day_care_occupancy: None,
            same_day_care_time: None,
            same_day_care_block_time: None,
            thrombolysed: None,
            admission_avoided: None,
            onset: None,
            diagnosis: None,
            diagnosis_fallback: false,
            mrs_baseline: None,
            mrs_discharge: None,
            mrs_change: None,
            ward_queue_time: None,
            admitted_at: None,
            ward_occupancy: None,
            ward_length_of_stay: None,
            thrombolysis_saving: None,
        }
    }

    /// Column names of the CSV export
    pub fn csv_header() -> &'static str {
        "patient_id,recorded_at,completed,staffing_queue_time,consult_time,imaging_started_at,\
advanced_imaging_time,basic_imaging_time,scanner_unavailable,same_day_care_unavailable,\
same_day_care_occupancy,same_day_care_time,same_day_care_block_time,thrombolysed,\
admission_avoided,onset,diagnosis,diagnosis_fallback,mrs_baseline,mrs_discharge,mrs_change,\
ward_queue_time,admitted_at,ward_occupancy,ward_length_of_stay,thrombolysis_saving"
    }

    /// One CSV row; unobserved fields are empty
    pub fn to_csv_row(&self) -> String {
        fn cell<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }

        let cells = [
            self.patient_id.value().to_string(),
            self.recorded_at.to_string(),
            self.completed.to_string(),
            cell(&self.staffing_queue_time),
            cell(&self.consult_time),
            cell(&self.imaging_started_at),
            cell(&self.advanced_imaging_time),
            cell(&self.basic_imaging_time),
            cell(&self.scanner_unavailable),
            cell(&self.same_day_care_unavailable),
            cell(&self.same_day_care_occupancy),
            cell(&self.same_day_care_time),
            cell(&self.same_day_care_block_time),
            cell(&self.thrombolysed),
            cell(&self.admission_avoided),
            cell(&self.onset.map(|onset| onset.code())),
            self.diagnosis.map(|d| format!("\"{}\"", d)).unwrap_or_default(),
            self.diagnosis_fallback.to_string(),
            cell(&self.mrs_baseline),
            cell(&self.mrs_discharge),
            cell(&self.mrs_change),
            cell(&self.ward_queue_time),
            cell(&self.admitted_at),
            cell(&self.ward_occupancy),
            cell(&self.ward_length_of_stay),
            cell(&self.thrombolysis_saving),
        ];
        cells.join(",")
    }
}

/// A timed sample of a queue length or occupancy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSample {
    /// Sample time
    pub time: SimTime,
    /// Observed value
    pub value: usize,
}

/// Periodic snapshot taken by the occupancy monitor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    /// Snapshot time
    pub time: SimTime,
    /// Requests waiting for assessment staff
    pub staffing_queue: usize,
    /// Ward beds in use
    pub ward_occupancy: usize,
    /// Requests waiting for a ward bed
    pub ward_queue: usize,
    /// Patients in same-day care
    pub same_day_care_occupancy: usize,
}

/// Run-level counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Stroke patients whose admission was avoided through same-day care
    pub admissions_avoided: usize,
    /// TIA and mimic patients not admitted
    pub non_admissions: usize,
    /// Completed scanner unavailability windows
    pub scanner_unavailability: usize,
    /// Completed same-day care unavailability windows
    pub same_day_care_unavailability: usize,
}

/// Accumulates observations during a run
#[derive(Debug, Clone)]
pub struct StatisticsCollector {
    warm_up: SimTime,
    records: Vec<ObservationRecord>,
    staffing_queue: Vec<TimedSample>,
    ward_occupancy: Vec<TimedSample>,
    snapshots: Vec<OccupancySnapshot>,
    counters: RunCounters,
}

impl StatisticsCollector {
    /// Create an empty collector that ignores anything up to `warm_up`
    pub fn new(warm_up: SimTime) -> Self {
        Self {
            warm_up,
            records: Vec::new(),
            staffing_queue: Vec::new(),
            ward_occupancy: Vec::new(),
            snapshots: Vec::new(),
            counters: RunCounters::default(),
        }
    }

    /// Whether `time` falls after warm-up
    pub fn is_observed(&self, time: SimTime) -> bool {
        time > self.warm_up
    }

    /// Store a finished record, dropping it if nothing was observed after warm-up
    pub fn commit(&mut self, record: ObservationRecord) -> bool {
        if !self.is_observed(record.recorded_at) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Sample the staffing queue length
    pub fn sample_staffing_queue(&mut self, time: SimTime, queue_len: usize) {
        if self.is_observed(time) {
            self.staffing_queue.push(TimedSample { time, value: queue_len });
        }
    }

    /// Sample the ward occupancy
    pub fn sample_ward_occupancy(&mut self, time: SimTime, in_use: usize) {
        if self.is_observed(time) {
            self.ward_occupancy.push(TimedSample { time, value: in_use });
        }
    }

    /// Store a periodic snapshot
    pub fn push_snapshot(&mut self, snapshot: OccupancySnapshot) {
        if self.is_observed(snapshot.time) {
            self.snapshots.push(snapshot);
        }
    }

    /// Mutable access to the run counters
    pub fn counters_mut(&mut self) -> &mut RunCounters {
        &mut self.counters
    }

    /// Run counters
    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Committed records in commit order
    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    /// Staffing queue samples
    pub fn staffing_queue_samples(&self) -> &[TimedSample] {
        &self.staffing_queue
    }

    /// Ward occupancy samples
    pub fn ward_occupancy_samples(&self) -> &[TimedSample] {
        &self.ward_occupancy
    }

    /// Periodic snapshots
    pub fn snapshots(&self) -> &[OccupancySnapshot] {
        &self.snapshots
    }

    /// Reduce the run's observations to summary metrics
    pub fn summarize(&self, run: usize, config: &SimulationConfig) -> RunResult {
        let records = &self.records;

        let mean_staffing_queue_time = mean(records.iter().filter_map(|r| r.staffing_queue_time));
        let mean_ward_queue_hours = mean(records.iter().filter_map(|r| r.ward_queue_time)) / 60.0;
        let mean_ward_occupancy = mean(records.iter().filter_map(|r| r.ward_occupancy.map(|v| v as f64)));
        let admission_delays = records
            .iter()
            .filter(|r| r.ward_queue_time.is_some_and(|q| q > 0.0))
            .count();
        let mean_ward_los_hours = mean(records.iter().filter_map(|r| r.ward_length_of_stay)) / 60.0;
        let mean_mrs_change = mean(records.iter().filter_map(|r| r.mrs_change.map(f64::from)));
        let thrombolysis_savings: f64 = records.iter().filter_map(|r| r.thrombolysis_saving).sum();
        let diagnosis_fallbacks = records.iter().filter(|r| r.diagnosis_fallback).count();

        let counters = self.counters;
        let avoidance_savings = counters.admissions_avoided as f64 * config.bed_day_cost;

        let window = config.same_day_care_disruption;
        let same_day_care_staff_cost = if window.is_enabled() {
            let rate = config.same_day_care_staff_cost_per_minute;
            rate * config.sim_duration
                - rate * counters.same_day_care_unavailability as f64 * window.duration
        } else {
            0.0
        };
        let same_day_care_net_savings = avoidance_savings - same_day_care_staff_cost;

        RunResult {
            run,
            patients_recorded: records.len(),
            mean_staffing_queue_time,
            mean_ward_queue_hours,
            mean_ward_occupancy,
            admission_delays,
            mean_ward_los_hours,
            admissions_avoided: counters.admissions_avoided,
            non_admissions: counters.non_admissions,
            avoidance_savings,
            same_day_care_staff_cost,
            same_day_care_net_savings,
            thrombolysis_savings,
            total_savings: thrombolysis_savings + same_day_care_net_savings,
            mean_mrs_change,
            scanner_unavailability: counters.scanner_unavailability,
            same_day_care_unavailability: counters.same_day_care_unavailability,
            diagnosis_fallbacks,
            ward_occupancy_trend_per_day: slope(&self.ward_occupancy) * MINUTES_PER_DAY,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

// Least-squares slope of value against time, 0 for fewer than two distinct times
fn slope(samples: &[TimedSample]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean_t = samples.iter().map(|s| s.time).sum::<f64>() / n;
    let mean_v = samples.iter().map(|s| s.value as f64).sum::<f64>() / n;
    let (cov, var) = samples.iter().fold((0.0, 0.0), |(cov, var), s| {
        let dt = s.time - mean_t;
        (cov + dt * (s.value as f64 - mean_v), var + dt * dt)
    });
    if var > 0.0 {
        cov / var
    } else {
        0.0
    }
}

/// Summary metrics of a single run
///
/// Values are not rounded; display code rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Run number within the trial, starting at 1
    pub run: usize,
    /// Observation records kept
    pub patients_recorded: usize,
    /// Mean wait for assessment staff (minutes)
    pub mean_staffing_queue_time: f64,
    /// Mean wait for a ward bed (hours)
    pub mean_ward_queue_hours: f64,
    /// Mean ward occupancy seen at admission
    pub mean_ward_occupancy: f64,
    /// Patients who waited for a ward bed
    pub admission_delays: usize,
    /// Mean ward length of stay (hours)
    pub mean_ward_los_hours: f64,
    /// Stroke admissions avoided through same-day care
    pub admissions_avoided: usize,
    /// TIA and mimic patients not admitted
    pub non_admissions: usize,
    /// Bed cost of the avoided admissions
    pub avoidance_savings: f64,
    /// Same-day care medical staffing cost
    pub same_day_care_staff_cost: f64,
    /// Avoidance savings net of staffing cost
    pub same_day_care_net_savings: f64,
    /// Bed cost saved by thrombolysis
    pub thrombolysis_savings: f64,
    /// Thrombolysis plus net same-day care savings
    pub total_savings: f64,
    /// Mean mRS improvement at discharge
    pub mean_mrs_change: f64,
    /// Completed scanner unavailability windows
    pub scanner_unavailability: usize,
    /// Completed same-day care unavailability windows
    pub same_day_care_unavailability: usize,
    /// Records whose diagnosis fell back to the default
    pub diagnosis_fallbacks: usize,
    /// Least-squares trend of ward occupancy (beds per day)
    pub ward_occupancy_trend_per_day: f64,
}

/// Per-metric means over the runs of a trial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialMeans {
    /// Mean wait for assessment staff (minutes)
    pub mean_staffing_queue_time: f64,
    /// Mean wait for a ward bed (hours)
    pub mean_ward_queue_hours: f64,
    /// Mean ward occupancy
    pub mean_ward_occupancy: f64,
    /// Patients who waited for a ward bed
    pub admission_delays: f64,
    /// Mean ward length of stay (hours)
    pub mean_ward_los_hours: f64,
    /// Stroke admissions avoided
    pub admissions_avoided: f64,
    /// TIA and mimic patients not admitted
    pub non_admissions: f64,
    /// Avoidance savings
    pub avoidance_savings: f64,
    /// Same-day care staffing cost
    pub same_day_care_staff_cost: f64,
    /// Net same-day care savings
    pub same_day_care_net_savings: f64,
    /// Thrombolysis savings
    pub thrombolysis_savings: f64,
    /// Total savings
    pub total_savings: f64,
    /// Mean mRS change
    pub mean_mrs_change: f64,
    /// Scanner unavailability windows
    pub scanner_unavailability: f64,
    /// Same-day care unavailability windows
    pub same_day_care_unavailability: f64,
    /// Diagnosis fallbacks
    pub diagnosis_fallbacks: f64,
    /// Ward occupancy trend (beds per day)
    pub ward_occupancy_trend_per_day: f64,
}

impl TrialMeans {
    /// Average every metric over `runs`
    pub fn from_runs(runs: &[RunResult]) -> Self {
        let avg = |f: fn(&RunResult) -> f64| mean(runs.iter().map(f));
        Self {
            mean_staffing_queue_time: avg(|r| r.mean_staffing_queue_time),
            mean_ward_queue_hours: avg(|r| r.mean_ward_queue_hours),
            mean_ward_occupancy: avg(|r| r.mean_ward_occupancy),
            admission_delays: avg(|r| r.admission_delays as f64),
            mean_ward_los_hours: avg(|r| r.mean_ward_los_hours),
            admissions_avoided: avg(|r| r.admissions_avoided as f64),
            non_admissions: avg(|r| r.non_admissions as f64),
            avoidance_savings: avg(|r| r.avoidance_savings),
            same_day_care_staff_cost: avg(|r| r.same_day_care_staff_cost),
            same_day_care_net_savings: avg(|r| r.same_day_care_net_savings),
            thrombolysis_savings: avg(|r| r.thrombolysis_savings),
            total_savings: avg(|r| r.total_savings),
            mean_mrs_change: avg(|r| r.mean_mrs_change),
            scanner_unavailability: avg(|r| r.scanner_unavailability as f64),
            same_day_care_unavailability: avg(|r| r.same_day_care_unavailability as f64),
            diagnosis_fallbacks: avg(|r| r.diagnosis_fallbacks as f64),
            ward_occupancy_trend_per_day: avg(|r| r.ward_occupancy_trend_per_day),
        }
    }
}

/// Results of one trial (a batch of independent runs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialSummary {
    /// Trial identifier
    pub trial_id: TrialId,
    /// Scenario label
    pub label: String,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock finish
    pub finished_at: DateTime<Utc>,
    /// Run results ordered by run number
    pub runs: Vec<RunResult>,
    /// Means across runs
    pub means: TrialMeans,
}

impl TrialSummary {
    /// Build a summary from ordered run results
    pub fn new(
        label: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        runs: Vec<RunResult>,
    ) -> Self {
        let means = TrialMeans::from_runs(&runs);
        Self { trial_id: TrialId::new(), label: label.into(), started_at, finished_at, runs, means }
    }

    /// Wall-clock duration of the trial
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

impl fmt::Display for TrialSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.means;
        writeln!(f, "{} ({}, {} runs)", self.label, self.trial_id, self.runs.len())?;
        writeln!(f, "  Mean Q Time Nurse (mins):        {:.0}", m.mean_staffing_queue_time)?;
        writeln!(f, "  Mean Q Time Ward (hours):        {:.0}", m.mean_ward_queue_hours)?;
        writeln!(f, "  Mean Ward Occupancy:             {:.0}", m.mean_ward_occupancy)?;
        writeln!(f, "  Admission Delays:                {:.1}", m.admission_delays)?;
        writeln!(f, "  Mean Ward LOS (hours):           {:.0}", m.mean_ward_los_hours)?;
        writeln!(f, "  Admissions Avoided:              {:.1}", m.admissions_avoided)?;
        writeln!(f, "  Non Admissions:                  {:.1}", m.non_admissions)?;
        writeln!(f, "  SDEC Total Savings (£):          {:.0}", m.avoidance_savings)?;
        writeln!(f, "  SDEC Medical Cost (£):           {:.0}", m.same_day_care_staff_cost)?;
        writeln!(f, "  SDEC Savings - Cost (£):         {:.0}", m.same_day_care_net_savings)?;
        writeln!(f, "  Thrombolysis Savings (£):        {:.0}", m.thrombolysis_savings)?;
        writeln!(f, "  Total Savings (£):               {:.0}", m.total_savings)?;
        writeln!(f, "  Mean MRS Change:                 {:.2}", m.mean_mrs_change)?;
        writeln!(f, "  Scanner Unavailable Windows:     {:.1}", m.scanner_unavailability)?;
        writeln!(f, "  SDEC Unavailable Windows:        {:.1}", m.same_day_care_unavailability)?;
        writeln!(f, "  Diagnosis Fallbacks:             {:.1}", m.diagnosis_fallbacks)?;
        write!(f, "  Ward Occupancy Trend (beds/day): {:.3}", m.ward_occupancy_trend_per_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DisruptionWindow;

    fn record(id: u64, at: SimTime) -> ObservationRecord {
        ObservationRecord::new(PatientId(id), at)
    }

    #[test]
    fn test_commit_filters_warm_up() {
        let mut collector = StatisticsCollector::new(100.0);
        assert!(!collector.commit(record(1, 50.0)));
        assert!(!collector.commit(record(2, 100.0)));
        assert!(collector.commit(record(3, 100.5)));
        assert_eq!(collector.records().len(), 1);
        assert_eq!(collector.records()[0].patient_id, PatientId(3));
    }

    #[test]
    fn test_samples_filter_warm_up() {
        let mut collector = StatisticsCollector::new(10.0);
        collector.sample_staffing_queue(5.0, 3);
        collector.sample_staffing_queue(15.0, 2);
        collector.sample_ward_occupancy(10.0, 4);
        collector.sample_ward_occupancy(11.0, 5);
        assert_eq!(collector.staffing_queue_samples(), &[TimedSample { time: 15.0, value: 2 }]);
        assert_eq!(collector.ward_occupancy_samples().len(), 1);
    }

    #[test]
    fn test_summarize_empty_run() {
        let collector = StatisticsCollector::new(0.0);
        let result = collector.summarize(1, &SimulationConfig::default());
        assert_eq!(result.patients_recorded, 0);
        assert_eq!(result.mean_staffing_queue_time, 0.0);
        assert_eq!(result.mean_ward_los_hours, 0.0);
        assert_eq!(result.same_day_care_staff_cost, 0.0);
        assert_eq!(result.total_savings, 0.0);
    }

    #[test]
    fn test_summarize_metrics() {
        let mut collector = StatisticsCollector::new(0.0);

        let mut a = record(1, 10.0);
        a.staffing_queue_time = Some(30.0);
        a.ward_queue_time = Some(120.0);
        a.ward_occupancy = Some(10);
        a.ward_length_of_stay = Some(600.0);
        a.mrs_change = Some(1);
        a.thrombolysis_saving = Some(100.0);

        let mut b = record(2, 20.0);
        b.staffing_queue_time = Some(10.0);
        b.ward_queue_time = Some(0.0);
        b.ward_occupancy = Some(20);
        b.ward_length_of_stay = Some(1200.0);
        b.mrs_change = Some(0);
        b.diagnosis_fallback = true;

        let c = record(3, 30.0);

        collector.commit(a);
        collector.commit(b);
        collector.commit(c);
        collector.counters_mut().admissions_avoided = 3;
        collector.counters_mut().same_day_care_unavailability = 10;

        let config = SimulationConfig {
            sim_duration: 10_000.0,
            same_day_care_disruption: DisruptionWindow::new(1000.0, 440.0),
            ..SimulationConfig::default()
        };
        let result = collector.summarize(2, &config);

        assert_eq!(result.run, 2);
        assert_eq!(result.patients_recorded, 3);
        assert_eq!(result.mean_staffing_queue_time, 20.0);
        assert_eq!(result.mean_ward_queue_hours, 1.0);
        assert_eq!(result.mean_ward_occupancy, 15.0);
        assert_eq!(result.admission_delays, 1);
        assert_eq!(result.mean_ward_los_hours, 15.0);
        assert_eq!(result.mean_mrs_change, 0.5);
        assert_eq!(result.thrombolysis_savings, 100.0);
        assert_eq!(result.diagnosis_fallbacks, 1);
        assert_eq!(result.avoidance_savings, 3.0 * 876.0);
        assert_eq!(result.same_day_care_staff_cost, 0.5 * 10_000.0 - 0.5 * 10.0 * 440.0);
        assert_eq!(result.same_day_care_net_savings, 2628.0 - 2800.0);
        assert_eq!(result.total_savings, 100.0 + 2628.0 - 2800.0);
    }

    #[test]
    fn test_occupancy_trend() {
        let mut collector = StatisticsCollector::new(0.0);
        for day in 1..=5 {
            collector.sample_ward_occupancy(day as f64 * MINUTES_PER_DAY, 10 + 2 * day);
        }
        let result = collector.summarize(1, &SimulationConfig::default());
        assert!((result.ward_occupancy_trend_per_day - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_trial_means() {
        let collector = StatisticsCollector::new(0.0);
        let config = SimulationConfig::default();
        let mut first = collector.summarize(1, &config);
        let mut second = collector.summarize(2, &config);
        first.admissions_avoided = 4;
        second.admissions_avoided = 6;
        first.mean_ward_queue_hours = 1.0;
        second.mean_ward_queue_hours = 2.0;

        let now = Utc::now();
        let summary = TrialSummary::new("Baseline", now, now, vec![first, second]);
        assert_eq!(summary.means.admissions_avoided, 5.0);
        assert_eq!(summary.means.mean_ward_queue_hours, 1.5);
        assert!(summary.to_string().starts_with("Baseline"));
        assert_eq!(TrialMeans::from_runs(&[]), TrialMeans::default());
    }

    #[test]
    fn test_csv_row_matches_header() {
        let mut r = record(7, 12.5);
        r.diagnosis = Some(Diagnosis::StrokeMimic);
        r.onset = Some(OnsetType::UnknownInWindow);
        let header_cols = ObservationRecord::csv_header().split(',').count();
        let row = r.to_csv_row();
        assert_eq!(row.split(',').count(), header_cols);
        assert!(row.starts_with("7,12.5,false,"));
        assert!(row.contains("\"Stroke Mimic\""));
    }
}
