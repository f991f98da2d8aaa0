use serde::Serialize;

/// A session is one-shot: once stopped it stays stopped, and a new run
/// needs a new session value.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Idle,
    Running,
    Stopped,
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Idle
    }
}
