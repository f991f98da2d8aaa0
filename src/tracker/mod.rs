mod rapl;

pub use rapl::RaplTracker;

use anyhow::Result;

/// The fields the enricher reads from a tracker, with defaults applied at
/// this boundary. Backend internals never leak past this struct.
#[derive(Debug, Clone)]
pub struct TrackerSnapshot {
    pub experiment_id: Option<String>,
    /// Average draw per component in watts. None means the backend could
    /// not measure that component at all.
    pub cpu_power_watts: Option<f64>,
    pub gpu_power_watts: Option<f64>,
    pub ram_power_watts: Option<f64>,
    /// Total energy over the session in kWh.
    pub total_energy_kwh: f64,
    pub tracking_mode: Option<String>,
    /// Power usage effectiveness of the hosting facility.
    pub pue: f64,
    /// Name of the power-measurement method, e.g. "powercap_rapl".
    pub measure_power_method: Option<String>,
}

impl Default for TrackerSnapshot {
    fn default() -> Self {
        Self {
            experiment_id: None,
            cpu_power_watts: None,
            gpu_power_watts: None,
            ram_power_watts: None,
            total_energy_kwh: 0.0,
            tracking_mode: None,
            pue: 1.0,
            measure_power_method: None,
        }
    }
}

/// Seam between the session controller and whatever actually samples
/// hardware power draw.
pub trait TrackerBackend {
    fn start(&mut self) -> Result<()>;

    /// Stop sampling and return the estimated emissions in kg CO2eq.
    fn stop(&mut self) -> Result<f64>;

    /// Valid after `stop()`; values observed mid-run are unspecified.
    fn snapshot(&self) -> TrackerSnapshot;
}
