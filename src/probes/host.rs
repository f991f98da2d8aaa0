use sysinfo::System;

const BYTES_PER_GB: f64 = (1u64 << 30) as f64;

/// Static facts about the machine the run executed on.
#[derive(Debug, Clone)]
pub struct HostInfo {
    pub os: Option<String>,
    pub cpu_count: usize,
    /// Total physical memory in GB, rounded to two decimals.
    pub ram_total_gb: f64,
}

impl HostInfo {
    pub fn collect() -> Self {
        let system = System::new_all();
        let cpu_count = system.cpus().len();
        let ram_total_gb = (system.total_memory() as f64 / BYTES_PER_GB * 100.0).round() / 100.0;
        Self {
            os: System::name(),
            cpu_count,
            ram_total_gb,
        }
    }
}
