//! Terminal table rendering.
//!
//! One section per category that was queried:
//! - identifier, type, status, engine, creation time, allocated storage
//! - rows in provider order
//! - a count line per section

use crate::query::SnapshotReport;
use crate::transform::SnapshotRecord;

const ID_WIDTH: usize = 40;

pub fn render(report: &SnapshotReport) -> String {
    let mut output = String::new();

    if let Some(records) = &report.snapshots {
        render_section(&mut output, "Instance snapshots", records);
    }
    if let Some(records) = &report.cluster_snapshots {
        render_section(&mut output, "Cluster snapshots", records);
    }

    if output.is_empty() {
        output.push_str("No snapshot categories queried.\n");
    }
    output
}

fn render_section(output: &mut String, title: &str, records: &[SnapshotRecord]) {
    output.push_str(&format!("\n{title}\n"));
    output.push_str(&"-".repeat(title.len()));
    output.push('\n');

    if records.is_empty() {
        output.push_str("  none found\n");
        return;
    }

    output.push_str(&format!(
        "  {:<ID_WIDTH$} {:<10} {:<12} {:<20} {:<20} {:>8}\n",
        "IDENTIFIER", "TYPE", "STATUS", "ENGINE", "CREATED", "STORAGE"
    ));

    for record in records {
        let engine = match (record.str_field("engine"), record.str_field("engine_version")) {
            (Some(engine), Some(version)) => format!("{engine} {version}"),
            (Some(engine), None) => engine.to_string(),
            _ => "-".to_string(),
        };

        output.push_str(&format!(
            "  {:<ID_WIDTH$} {:<10} {:<12} {:<20} {:<20} {:>8}\n",
            truncate(record.identifier().unwrap_or("-"), ID_WIDTH),
            record.snapshot_type().unwrap_or("-"),
            truncate(record.str_field("status").unwrap_or("-"), 12),
            truncate(&engine, 20),
            format_time(record.str_field("snapshot_create_time")),
            format_storage(record),
        ));
    }

    output.push_str(&format!("  {} snapshot(s)\n", records.len()));
}

fn format_time(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };

    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn format_storage(record: &SnapshotRecord) -> String {
    record
        .get("allocated_storage")
        .and_then(serde_json::Value::as_u64)
        .map(|gib| format!("{gib} GiB"))
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_is_reformatted_in_utc() {
        assert_eq!(
            format_time(Some("2018-05-17T00:23:23.731000+00:00")),
            "2018-05-17 00:23:23"
        );
        assert_eq!(format_time(Some("2018-05-17T02:00:00+02:00")), "2018-05-17 00:00:00");
    }

    #[test]
    fn unparseable_time_passes_through() {
        assert_eq!(format_time(Some("yesterday")), "yesterday");
        assert_eq!(format_time(None), "-");
    }

    #[test]
    fn long_identifiers_are_truncated() {
        let id = "a".repeat(60);
        let out = truncate(&id, ID_WIDTH);
        assert_eq!(out.chars().count(), ID_WIDTH);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn empty_report_mentions_nothing_queried() {
        let report = SnapshotReport::empty();
        assert_eq!(render(&report), "No snapshot categories queried.\n");
    }
}
