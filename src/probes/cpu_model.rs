use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// CPU brand-string detection, one variant per OS family. `Err` means the
/// probe itself broke (missing file, tool not found); `Ok(None)` means it
/// ran but the host exposes no model name.
pub trait CpuModelProbe {
    fn detect(&self) -> Result<Option<String>>;
}

/// Probe matching the build target, chosen once at enricher construction.
pub fn default_cpu_probe() -> Box<dyn CpuModelProbe + Send + Sync> {
    #[cfg(target_os = "linux")]
    return Box::new(ProcCpuinfoProbe::new());

    #[cfg(target_os = "macos")]
    return Box::new(SysctlProbe);

    #[cfg(target_os = "windows")]
    return Box::new(WmicProbe);

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return Box::new(UnsupportedProbe);
}

/// Parses the first `model name` line out of /proc/cpuinfo.
pub struct ProcCpuinfoProbe {
    path: PathBuf,
}

impl ProcCpuinfoProbe {
    pub fn new() -> Self {
        Self::with_path("/proc/cpuinfo")
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcCpuinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuModelProbe for ProcCpuinfoProbe {
    fn detect(&self) -> Result<Option<String>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.starts_with("model name") {
                if let Some((_, value)) = line.split_once(':') {
                    return Ok(Some(value.trim().to_owned()));
                }
            }
        }
        Ok(None)
    }
}

/// `sysctl -n machdep.cpu.brand_string` on macOS.
pub struct SysctlProbe;

impl CpuModelProbe for SysctlProbe {
    fn detect(&self) -> Result<Option<String>> {
        let output = Command::new("sysctl")
            .args(["-n", "machdep.cpu.brand_string"])
            .output()
            .context("failed to run sysctl")?;
        if !output.status.success() {
            bail!("sysctl exited with {}", output.status);
        }
        let brand = String::from_utf8_lossy(&output.stdout).trim().to_owned();
        Ok((!brand.is_empty()).then_some(brand))
    }
}

/// `wmic cpu get name` on Windows; first non-header line is the model.
pub struct WmicProbe;

impl CpuModelProbe for WmicProbe {
    fn detect(&self) -> Result<Option<String>> {
        let output = Command::new("wmic")
            .args(["cpu", "get", "name"])
            .output()
            .context("failed to run wmic")?;
        if !output.status.success() {
            bail!("wmic exited with {}", output.status);
        }
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text
            .lines()
            .skip(1)
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_owned))
    }
}

#[allow(dead_code)]
struct UnsupportedProbe;

impl CpuModelProbe for UnsupportedProbe {
    fn detect(&self) -> Result<Option<String>> {
        Ok(None)
    }
}
