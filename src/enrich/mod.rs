mod record;

pub use record::RunRecord;

use std::time::Duration;

use chrono::Local;
use log::warn;

use crate::config::CloudEnv;
use crate::probes::{default_cpu_probe, versions, CpuModelProbe, GeoLookup, HostInfo};
use crate::tracker::TrackerSnapshot;

/// Turns a tracker snapshot plus the measured duration into a full run
/// record. Holds its probes and the cloud config captured at session start,
/// so enrichment itself reads no process-global state.
pub struct Enricher {
    cloud: CloudEnv,
    geo: GeoLookup,
    cpu_probe: Box<dyn CpuModelProbe + Send + Sync>,
}

impl Enricher {
    pub fn new() -> Self {
        Self {
            cloud: CloudEnv::from_env(),
            geo: GeoLookup::new(),
            cpu_probe: default_cpu_probe(),
        }
    }

    /// Fully injected variant; tests use this to swap in fake probes and a
    /// dead geolocation endpoint.
    pub fn with_parts(
        cloud: CloudEnv,
        geo: GeoLookup,
        cpu_probe: Box<dyn CpuModelProbe + Send + Sync>,
    ) -> Self {
        Self {
            cloud,
            geo,
            cpu_probe,
        }
    }

    pub fn enrich(
        &self,
        project_name: &str,
        snapshot: &TrackerSnapshot,
        emissions: f64,
        duration: Duration,
    ) -> RunRecord {
        let duration_secs = duration.as_secs_f64();

        let geo = self.geo.lookup();
        let cpu_model = match self.cpu_probe.detect() {
            Ok(model) => model,
            Err(err) => {
                warn!("cpu model probe failed: {err:#}");
                None
            }
        };
        let host = HostInfo::collect();

        RunRecord {
            run_id: snapshot.experiment_id.clone(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            project_name: project_name.to_owned(),
            duration: duration_secs,
            emissions,
            emissions_rate: emissions_rate(emissions, duration_secs),
            cpu_power: snapshot.cpu_power_watts,
            gpu_power: snapshot.gpu_power_watts,
            ram_power: snapshot.ram_power_watts,
            cpu_energy: component_energy(snapshot.cpu_power_watts, duration_secs),
            gpu_energy: component_energy(snapshot.gpu_power_watts, duration_secs),
            ram_energy: component_energy(snapshot.ram_power_watts, duration_secs),
            energy_consumed: snapshot.total_energy_kwh,
            country_name: geo.country_name,
            country_iso_code: geo.country_iso_code,
            region: geo.region,
            cloud_provider: self.cloud.provider_label(),
            cloud_region: self.cloud.region_label(),
            os: host.os,
            runtime_version: versions::runtime_version(),
            tracker_version: versions::tracker_version(),
            cpu_count: host.cpu_count,
            cpu_model,
            // No GPU telemetry of our own; the backend may still have
            // reported GPU power above.
            gpu_count: 0,
            gpu_model: None,
            longitude: geo.longitude,
            latitude: geo.latitude,
            ram_total_size: host.ram_total_gb,
            tracking_mode: snapshot.tracking_mode.clone(),
            on_cloud: self.cloud.on_cloud().to_owned(),
            pue: snapshot.pue,
            extra: snapshot.measure_power_method.clone(),
            unit_label: "kWh".to_owned(),
        }
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}

/// Component energy in kWh-equivalent units: null when the power is unknown
/// or zero, power * hours otherwise. Power reported as 0 still yields a null
/// energy on purpose; the two defaults are asymmetric.
fn component_energy(power_watts: Option<f64>, duration_secs: f64) -> Option<f64> {
    let power = power_watts.unwrap_or(0.0);
    (power != 0.0).then(|| power * duration_secs / 3600.0)
}

fn emissions_rate(emissions: f64, duration_secs: f64) -> Option<f64> {
    (duration_secs > 0.0).then(|| emissions / duration_secs)
}
