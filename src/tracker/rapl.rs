use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{debug, info};
use uuid::Uuid;

use super::{TrackerBackend, TrackerSnapshot};

const POWERCAP_ROOT: &str = "/sys/class/powercap";

/// World-average grid carbon intensity, kg CO2eq per kWh.
const GRID_INTENSITY_KG_PER_KWH: f64 = 0.475;

const JOULES_PER_KWH: f64 = 3_600_000.0;

/// CPU package energy tracker backed by the Linux powercap RAPL counters.
/// Reads each package's `energy_uj` at start and stop and derives average
/// power and total energy from the delta. GPU and RAM draw are not measured.
pub struct RaplTracker {
    root: PathBuf,
    experiment_id: String,
    packages: Vec<PathBuf>,
    start_uj: Vec<u64>,
    started_at: Option<Instant>,
    cpu_power_watts: Option<f64>,
    total_energy_kwh: f64,
}

impl RaplTracker {
    pub fn new() -> Self {
        Self::with_root(POWERCAP_ROOT)
    }

    /// Point at an alternate powercap tree. Used by tests with a fake sysfs.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            experiment_id: Uuid::new_v4().to_string(),
            packages: Vec::new(),
            start_uj: Vec::new(),
            started_at: None,
            cpu_power_watts: None,
            total_energy_kwh: 0.0,
        }
    }

    /// Top-level `intel-rapl:<n>` package domains; subdomains (core, dram)
    /// are already included in their package counter.
    fn discover_packages(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("failed to read {}", self.root.display()))?;

        let mut packages = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("intel-rapl:") && name.matches(':').count() == 1 {
                packages.push(entry.path());
            }
        }
        packages.sort();
        Ok(packages)
    }

    fn read_energy_uj(package: &std::path::Path) -> Result<u64> {
        let path = package.join("energy_uj");
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        raw.trim()
            .parse::<u64>()
            .with_context(|| format!("malformed counter in {}", path.display()))
    }
}

impl Default for RaplTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerBackend for RaplTracker {
    fn start(&mut self) -> Result<()> {
        let packages = self.discover_packages()?;
        if packages.is_empty() {
            bail!("no powercap RAPL packages under {}", self.root.display());
        }

        let mut start_uj = Vec::with_capacity(packages.len());
        for package in &packages {
            start_uj.push(Self::read_energy_uj(package)?);
        }

        info!(
            "RAPL tracking started over {} package(s), experiment {}",
            packages.len(),
            self.experiment_id
        );
        self.packages = packages;
        self.start_uj = start_uj;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn stop(&mut self) -> Result<f64> {
        let started_at = self
            .started_at
            .take()
            .context("RAPL tracker stopped without a start")?;
        let elapsed_secs = started_at.elapsed().as_secs_f64();

        let mut joules = 0.0;
        for (package, &start) in self.packages.iter().zip(&self.start_uj) {
            let end = Self::read_energy_uj(package)?;
            // Counters wrap; a clamped sample loses one package-interval
            // rather than producing a huge bogus delta.
            let delta_uj = end.saturating_sub(start);
            debug!("{}: {} uJ", package.display(), delta_uj);
            joules += delta_uj as f64 / 1e6;
        }

        self.total_energy_kwh = joules / JOULES_PER_KWH;
        self.cpu_power_watts = (elapsed_secs > 0.0).then(|| joules / elapsed_secs);

        Ok(self.total_energy_kwh * GRID_INTENSITY_KG_PER_KWH)
    }

    fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            experiment_id: Some(self.experiment_id.clone()),
            cpu_power_watts: self.cpu_power_watts,
            gpu_power_watts: None,
            ram_power_watts: None,
            total_energy_kwh: self.total_energy_kwh,
            tracking_mode: Some("machine".into()),
            pue: 1.0,
            measure_power_method: Some("powercap_rapl".into()),
        }
    }
}
