//! CSV in, report out, through the same calls the binary makes.

use std::io::Write;

use tidemark_cli::report::{write_report, TEXT_HEADER};
use tidemark_compute::{detect, summarize};
use tidemark_core::DetectionConfig;
use tidemark_ingest::load_observations;

fn write_csv(values: &[f64]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "label,value").unwrap();
    for (i, v) in values.iter().enumerate() {
        writeln!(file, "p{},{}", i, v).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn outlier_series_produces_text_report() {
    let csv = write_csv(&[5.0, 5.0, 5.0, 5.0, 5.0, 100.0, 5.0, 5.0, 5.0, 5.0]);
    let observations = load_observations(csv.path()).unwrap();
    let config = DetectionConfig {
        window_size: Some(4),
        ..DetectionConfig::default()
    };
    let rows = detect(&observations, &config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.txt");
    write_report(&out, &rows, false).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], TEXT_HEADER);
    assert_eq!(lines.len(), 11);
    assert!(lines[6].starts_with("p5\t100.00\ttrue\tfalse\t"));
    assert!(lines[1].starts_with("p0\t5.00\tfalse\tfalse\t1.00\t1.00"));

    let summary = summarize(&rows);
    assert_eq!(summary.spikes, 1);
    assert_eq!(summary.changes, 0);
}

#[test]
fn level_shift_produces_json_report() {
    let mut values = vec![5.0; 20];
    values.extend(std::iter::repeat(50.0).take(20));
    let csv = write_csv(&values);
    let observations = load_observations(csv.path()).unwrap();
    let config = DetectionConfig {
        window_size: Some(5),
        ..DetectionConfig::default()
    };
    let rows = detect(&observations, &config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.jsonl");
    write_report(&out, &rows, true).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let parsed: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(parsed.len(), 40);
    assert_eq!(parsed[39]["is_change"], true);
    assert_eq!(parsed[0]["is_change"], false);

    let first = summarize(&rows).first_change.unwrap();
    assert!((20..=25).contains(&first));
}

#[test]
fn invalid_config_is_rejected_before_scoring() {
    let csv = write_csv(&[1.0, 2.0, 3.0]);
    let observations = load_observations(csv.path()).unwrap();
    let config = DetectionConfig {
        confidence: 1.5,
        ..DetectionConfig::default()
    };
    assert!(detect(&observations, &config).is_err());
}
