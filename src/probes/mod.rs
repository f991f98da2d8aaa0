//! Best-effort host and environment lookups. Every probe here absorbs its
//! own failures; the worst outcome is a null field in the run record.

pub mod cpu_model;
pub mod geo;
pub mod host;
pub mod versions;

pub use cpu_model::{default_cpu_probe, CpuModelProbe};
pub use geo::{GeoInfo, GeoLookup};
pub use host::HostInfo;
