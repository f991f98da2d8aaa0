use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::enrich::RunRecord;

/// Write one header row and one data row to `path`, truncating anything
/// already there. Each invocation overwrites; there is no append mode.
pub fn write_csv(record: &RunRecord, path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{}", RunRecord::field_names().join(","))?;
    let cells: Vec<String> = record
        .field_values()
        .iter()
        .map(|value| escape_csv(value))
        .collect();
    writeln!(out, "{}", cells.join(","))?;
    out.flush()
}

/// Minimal CSV escaping: wrap in quotes if the value contains a comma or quote.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloudEnv;
    use crate::enrich::Enricher;
    use crate::probes::cpu_model::ProcCpuinfoProbe;
    use crate::probes::GeoLookup;
    use crate::tracker::TrackerSnapshot;
    use std::time::Duration;

    fn sample_record(project_name: &str) -> RunRecord {
        let enricher = Enricher::with_parts(
            CloudEnv::new(None, None),
            GeoLookup::with_endpoint("http://127.0.0.1:9/json/"),
            Box::new(ProcCpuinfoProbe::with_path("/nonexistent/cpuinfo")),
        );
        let snapshot = TrackerSnapshot {
            experiment_id: Some("exp-42".into()),
            cpu_power_watts: Some(35.5),
            total_energy_kwh: 1.25e-5,
            tracking_mode: Some("machine".into()),
            measure_power_method: Some("powercap_rapl".into()),
            ..Default::default()
        };
        enricher.enrich(project_name, &snapshot, 6e-6, Duration::from_secs(2))
    }

    #[test]
    fn escape_plain() {
        assert_eq!(escape_csv("hello"), "hello");
    }

    #[test]
    fn escape_comma() {
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
    }

    #[test]
    fn escape_quote() {
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn writes_header_plus_one_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&sample_record("writer test, with comma"), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], RunRecord::field_names().join(","));
        assert!(lines[1].contains("\"writer test, with comma\""));
    }

    #[test]
    fn overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale\nstale\nstale\n").unwrap();

        write_csv(&sample_record("demo"), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.csv");
        assert!(write_csv(&sample_record("demo"), &path).is_err());
    }

    #[test]
    fn numeric_cells_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let record = sample_record("demo");
        write_csv(&record, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let row = content.lines().nth(1).unwrap();
        // Nothing in this record needs quoting, so a plain split aligns
        // with the header.
        let cells: Vec<&str> = row.split(',').collect();
        let names = RunRecord::field_names();
        assert_eq!(cells.len(), names.len());

        let idx = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert_eq!(cells[idx("duration")].parse::<f64>().unwrap(), record.duration);
        assert_eq!(cells[idx("emissions")].parse::<f64>().unwrap(), record.emissions);
        assert_eq!(
            cells[idx("cpu_power")].parse::<f64>().unwrap(),
            record.cpu_power.unwrap()
        );
        assert_eq!(cells[idx("country_name")], "");
        assert_eq!(cells[idx("on_cloud")], "No");
    }
}
