use std::sync::{Arc, Mutex};

use csv_cleaner::ingestion::{
    resolve, FileObserver, LoadContext, LoadObserver, LoadOptions, LoadSeverity, LoadStats,
};
use csv_cleaner::types::Origin;
use csv_cleaner::IngestionError;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(Origin, LoadStats)>>,
    failures: Mutex<Vec<LoadSeverity>>,
    alerts: Mutex<Vec<LoadSeverity>>,
}

impl LoadObserver for RecordingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        self.successes.lock().unwrap().push((ctx.origin.clone(), stats));
    }

    fn on_failure(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &IngestionError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &LoadContext, severity: LoadSeverity, _error: &IngestionError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options_with(obs: Arc<RecordingObserver>) -> LoadOptions {
    LoadOptions {
        observer: Some(obs),
        alert_at_or_above: LoadSeverity::Critical,
        ..Default::default()
    }
}

#[test]
fn observer_receives_failure_and_alert_on_missing_file() {
    let obs = Arc::new(RecordingObserver::default());

    // Missing file -> I/O error -> Critical; the reference then loads as a bare header.
    let ds = resolve("tests/fixtures/does_not_exist.csv", &options_with(obs.clone())).unwrap();
    assert_eq!(ds.row_count(), 0);

    assert_eq!(*obs.failures.lock().unwrap(), vec![LoadSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![LoadSeverity::Critical]);
    assert_eq!(
        *obs.successes.lock().unwrap(),
        vec![(Origin::Inline, LoadStats { rows: 0, columns: 1 })]
    );
}

#[test]
fn failed_content_retry_is_reported_after_the_path() {
    let obs = Arc::new(RecordingObserver::default());

    // No separator on the first line: path first (Critical), then ragged content (Error).
    let _ = resolve("a\n1,2", &options_with(obs.clone())).unwrap_err();
    assert_eq!(
        *obs.failures.lock().unwrap(),
        vec![LoadSeverity::Critical, LoadSeverity::Error]
    );
}

#[test]
fn every_attempt_is_reported() {
    let obs = Arc::new(RecordingObserver::default());

    // Inline parse fails on the ragged row (Error), then the path read fails (Critical).
    let _ = resolve("a,b\n1,2,3", &options_with(obs.clone())).unwrap_err();

    assert_eq!(
        *obs.failures.lock().unwrap(),
        vec![LoadSeverity::Error, LoadSeverity::Critical]
    );
    assert_eq!(*obs.alerts.lock().unwrap(), vec![LoadSeverity::Critical]);
}

#[test]
fn observer_receives_success_stats() {
    let obs = Arc::new(RecordingObserver::default());

    resolve("tests/fixtures/people.csv", &options_with(obs.clone())).unwrap();
    resolve("a,b\n1,2\n", &options_with(obs.clone())).unwrap();

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(successes.len(), 2);
    assert!(matches!(successes[0].0, Origin::Path(_)));
    assert_eq!(successes[0].1, LoadStats { rows: 5, columns: 5 });
    assert_eq!(successes[1], (Origin::Inline, LoadStats { rows: 1, columns: 2 }));
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn lower_threshold_alerts_on_parse_errors() {
    let obs = Arc::new(RecordingObserver::default());
    let options = LoadOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: LoadSeverity::Error,
        ..Default::default()
    };

    let _ = resolve("a,b\n1,2,3", &options).unwrap_err();
    assert_eq!(
        *obs.alerts.lock().unwrap(),
        vec![LoadSeverity::Error, LoadSeverity::Critical]
    );
}

#[test]
fn file_observer_appends_lines() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("loads.log");
    let options = LoadOptions {
        observer: Some(Arc::new(FileObserver::new(&log))),
        ..Default::default()
    };

    resolve("a,b\n1,2\n", &options).unwrap();
    resolve("missing.csv", &options).unwrap();

    let text = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // The missing file is both a failure and, at the default threshold, an alert. The reference
    // then loads as a header-only table.
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("ok format=Csv origin=inline rows=1 columns=2"), "{}", lines[0]);
    assert!(lines[1].contains("fail severity=Critical"), "{}", lines[1]);
    assert!(lines[2].contains("ALERT severity=Critical"), "{}", lines[2]);
    assert!(lines[3].contains("ok format=Csv origin=inline rows=0 columns=1"), "{}", lines[3]);
}
