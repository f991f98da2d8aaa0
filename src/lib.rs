//! Records the energy use and estimated carbon emissions of one run of a
//! long-running job, enriches the measurement with host and environment
//! metadata, and writes a single summary row to a CSV file.

pub mod config;
pub mod enrich;
mod error;
pub mod probes;
pub mod report;
pub mod session;
pub mod tracker;

pub use config::CloudEnv;
pub use enrich::{Enricher, RunRecord};
pub use error::SessionError;
pub use session::{SessionStatus, TrackingSession};
pub use tracker::{RaplTracker, TrackerBackend, TrackerSnapshot};
