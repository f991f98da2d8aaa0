use serde::Serialize;

/// One completed tracking session, flattened into the fixed field order the
/// CSV is written in. Every key is always present; unknown values are null.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run_id: Option<String>,
    /// Local wall clock at stop time, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    pub project_name: String,
    /// Wall-clock seconds between start and stop.
    pub duration: f64,
    /// kg CO2eq over the whole session.
    pub emissions: f64,
    /// kg CO2eq per second; null when the duration is zero.
    pub emissions_rate: Option<f64>,
    pub cpu_power: Option<f64>,
    pub gpu_power: Option<f64>,
    pub ram_power: Option<f64>,
    pub cpu_energy: Option<f64>,
    pub gpu_energy: Option<f64>,
    pub ram_energy: Option<f64>,
    pub energy_consumed: f64,
    pub country_name: Option<String>,
    pub country_iso_code: Option<String>,
    pub region: Option<String>,
    pub cloud_provider: String,
    pub cloud_region: String,
    pub os: Option<String>,
    pub runtime_version: Option<String>,
    pub tracker_version: Option<String>,
    pub cpu_count: usize,
    pub cpu_model: Option<String>,
    pub gpu_count: u32,
    pub gpu_model: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub ram_total_size: f64,
    pub tracking_mode: Option<String>,
    pub on_cloud: String,
    pub pue: f64,
    pub extra: Option<String>,
    pub unit_label: String,
}

const FIELD_NAMES: [&str; 33] = [
    "run_id",
    "timestamp",
    "project_name",
    "duration",
    "emissions",
    "emissions_rate",
    "cpu_power",
    "gpu_power",
    "ram_power",
    "cpu_energy",
    "gpu_energy",
    "ram_energy",
    "energy_consumed",
    "country_name",
    "country_iso_code",
    "region",
    "cloud_provider",
    "cloud_region",
    "os",
    "runtime_version",
    "tracker_version",
    "cpu_count",
    "cpu_model",
    "gpu_count",
    "gpu_model",
    "longitude",
    "latitude",
    "ram_total_size",
    "tracking_mode",
    "on_cloud",
    "pue",
    "extra",
    "unit_label",
];

impl RunRecord {
    pub fn field_names() -> &'static [&'static str] {
        &FIELD_NAMES
    }

    /// Values rendered as text in field order; null renders as an empty cell.
    pub fn field_values(&self) -> Vec<String> {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(T::to_string).unwrap_or_default()
        }

        vec![
            opt(&self.run_id),
            self.timestamp.clone(),
            self.project_name.clone(),
            self.duration.to_string(),
            self.emissions.to_string(),
            opt(&self.emissions_rate),
            opt(&self.cpu_power),
            opt(&self.gpu_power),
            opt(&self.ram_power),
            opt(&self.cpu_energy),
            opt(&self.gpu_energy),
            opt(&self.ram_energy),
            self.energy_consumed.to_string(),
            opt(&self.country_name),
            opt(&self.country_iso_code),
            opt(&self.region),
            self.cloud_provider.clone(),
            self.cloud_region.clone(),
            opt(&self.os),
            opt(&self.runtime_version),
            opt(&self.tracker_version),
            self.cpu_count.to_string(),
            opt(&self.cpu_model),
            self.gpu_count.to_string(),
            opt(&self.gpu_model),
            opt(&self.longitude),
            opt(&self.latitude),
            self.ram_total_size.to_string(),
            opt(&self.tracking_mode),
            self.on_cloud.clone(),
            self.pue.to_string(),
            opt(&self.extra),
            self.unit_label.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_value_per_field_name() {
        let record = sample();
        assert_eq!(record.field_values().len(), RunRecord::field_names().len());
    }

    #[test]
    fn nulls_render_empty() {
        let record = sample();
        let values = record.field_values();
        let names = RunRecord::field_names();
        let cell = |name: &str| {
            let idx = names.iter().position(|n| *n == name).unwrap();
            values[idx].clone()
        };
        assert_eq!(cell("gpu_model"), "");
        assert_eq!(cell("cpu_energy"), "");
        assert_eq!(cell("project_name"), "demo");
        assert_eq!(cell("unit_label"), "kWh");
    }

    #[test]
    fn serde_keys_follow_field_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let run_id = json.find("\"run_id\"").unwrap();
        let timestamp = json.find("\"timestamp\"").unwrap();
        let unit_label = json.find("\"unit_label\"").unwrap();
        assert!(run_id < timestamp && timestamp < unit_label);
    }

    pub(super) fn sample() -> RunRecord {
        RunRecord {
            run_id: Some("8400b0a1-demo".into()),
            timestamp: "2026-08-28 12:00:00".into(),
            project_name: "demo".into(),
            duration: 1.5,
            emissions: 3e-6,
            emissions_rate: Some(2e-6),
            cpu_power: Some(42.0),
            gpu_power: None,
            ram_power: Some(0.0),
            cpu_energy: Some(42.0 * 1.5 / 3600.0),
            gpu_energy: None,
            ram_energy: None,
            energy_consumed: 1.75e-5,
            country_name: None,
            country_iso_code: None,
            region: None,
            cloud_provider: "None".into(),
            cloud_region: "None".into(),
            os: Some("Linux".into()),
            runtime_version: Some("1.80.1".into()),
            tracker_version: Some("0.1.0".into()),
            cpu_count: 8,
            cpu_model: Some("Intel(R) Xeon(R) CPU @ 2.20GHz".into()),
            gpu_count: 0,
            gpu_model: None,
            longitude: None,
            latitude: None,
            ram_total_size: 15.52,
            tracking_mode: Some("machine".into()),
            on_cloud: "No".into(),
            pue: 1.0,
            extra: Some("powercap_rapl".into()),
            unit_label: "kWh".into(),
        }
    }
}
