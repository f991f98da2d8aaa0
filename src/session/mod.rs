mod state;

pub use state::SessionStatus;

use std::path::Path;
use std::time::Instant;

use log::info;

use crate::enrich::{Enricher, RunRecord};
use crate::error::SessionError;
use crate::report;
use crate::tracker::TrackerBackend;

/// Owns the lifecycle of one tracking run: start the backend, let the
/// caller's workload execute, then stop, enrich and persist.
pub struct TrackingSession<B: TrackerBackend> {
    backend: B,
    project_name: String,
    status: SessionStatus,
    started_at: Option<Instant>,
    enricher: Option<Enricher>,
}

impl<B: TrackerBackend> TrackingSession<B> {
    pub fn new(project_name: impl Into<String>, backend: B) -> Self {
        Self {
            backend,
            project_name: project_name.into(),
            status: SessionStatus::Idle,
            started_at: None,
            enricher: None,
        }
    }

    /// Preset the enricher instead of building one at start; tests use this
    /// to avoid real env/network probes.
    pub fn with_enricher(mut self, enricher: Enricher) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Begin measurement. The cloud configuration is captured here, so env
    /// changes made mid-run do not leak into the record.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.status != SessionStatus::Idle {
            return Err(SessionError::AlreadyStarted);
        }

        self.enricher.get_or_insert_with(Enricher::new);
        self.backend.start().map_err(SessionError::Backend)?;
        self.started_at = Some(Instant::now());
        self.status = SessionStatus::Running;
        info!("tracking session '{}' started", self.project_name);
        Ok(())
    }

    /// Stop measurement, enrich the result and write it to `output_path`.
    /// Returns the record that was written.
    pub fn stop(&mut self, output_path: impl AsRef<Path>) -> Result<RunRecord, SessionError> {
        let output_path = output_path.as_ref();
        let started_at = match (self.status, self.started_at) {
            (SessionStatus::Running, Some(anchor)) => anchor,
            _ => return Err(SessionError::NotStarted),
        };

        let emissions = self.backend.stop().map_err(SessionError::Backend)?;
        let duration = started_at.elapsed();
        self.status = SessionStatus::Stopped;

        let enricher = self.enricher.get_or_insert_with(Enricher::new);
        let record = enricher.enrich(
            &self.project_name,
            &self.backend.snapshot(),
            emissions,
            duration,
        );

        report::write_csv(&record, output_path).map_err(|source| SessionError::Io {
            path: output_path.to_path_buf(),
            source,
        })?;

        info!(
            "run record for '{}' written to {} ({:.6} kg CO2eq over {:.1}s)",
            self.project_name,
            output_path.display(),
            record.emissions,
            record.duration,
        );
        Ok(record)
    }
}
