use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by a tracking session. Best-effort metadata lookups
/// (geolocation, CPU model, versions) never appear here; they degrade to
/// null fields instead.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not running; call start() before stop()")]
    NotStarted,

    #[error("session already started; create a new session to track another run")]
    AlreadyStarted,

    #[error("tracker backend failed")]
    Backend(#[source] anyhow::Error),

    #[error("failed to write run record to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
