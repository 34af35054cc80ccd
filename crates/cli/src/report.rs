//! Report writers.
//!
//! Text reports are tab-separated with a fixed header; numbers are printed
//! with two decimals. JSON reports carry one [`ReportRow`] object per line
//! at full precision.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tidemark_core::{ReportRow, TidemarkError};

pub const TEXT_HEADER: &str = "Label\tValue\tSpike\tChangePoint\tp-value\tmartingale-value";

pub fn write_text<W: Write>(mut out: W, rows: &[ReportRow]) -> Result<(), TidemarkError> {
    writeln!(out, "{}", TEXT_HEADER)?;
    for row in rows {
        writeln!(
            out,
            "{}\t{:.2}\t{}\t{}\t{:.2}\t{:.2}",
            row.label, row.value, row.is_spike, row.is_change, row.pvalue, row.martingale_value
        )?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_json_lines<W: Write>(mut out: W, rows: &[ReportRow]) -> Result<(), TidemarkError> {
    for row in rows {
        serde_json::to_writer(&mut out, row).map_err(io::Error::from)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Create `path` and write the report in the requested format.
pub fn write_report(path: &Path, rows: &[ReportRow], json: bool) -> Result<(), TidemarkError> {
    let out = BufWriter::new(File::create(path)?);
    if json {
        write_json_lines(out, rows)
    } else {
        write_text(out, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<ReportRow> {
        vec![
            ReportRow {
                label: "1949-01".into(),
                value: 112.0,
                is_spike: false,
                is_change: false,
                pvalue: 1.0,
                martingale_value: 1.0,
            },
            ReportRow {
                label: "1949-02".into(),
                value: 118.456,
                is_spike: true,
                is_change: true,
                pvalue: 0.0123,
                martingale_value: 25.5,
            },
        ]
    }

    #[test]
    fn text_report_layout() {
        let mut buf = Vec::new();
        write_text(&mut buf, &rows()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TEXT_HEADER);
        assert_eq!(lines[1], "1949-01\t112.00\tfalse\tfalse\t1.00\t1.00");
        assert_eq!(lines[2], "1949-02\t118.46\ttrue\ttrue\t0.01\t25.50");
    }

    #[test]
    fn empty_text_report_has_header_only() {
        let mut buf = Vec::new();
        write_text(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{}\n", TEXT_HEADER));
    }

    #[test]
    fn json_lines_round_trip_fields() {
        let mut buf = Vec::new();
        write_json_lines(&mut buf, &rows()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let parsed: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1]["label"], "1949-02");
        assert_eq!(parsed[1]["is_spike"], true);
        assert_eq!(parsed[1]["pvalue"], 0.0123);
    }

    #[test]
    fn write_report_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        write_report(&path, &rows(), false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(TEXT_HEADER));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn write_report_into_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("report.txt");
        let err = write_report(&path, &rows(), true).unwrap_err();
        assert!(matches!(err, TidemarkError::Io(_)));
    }
}
