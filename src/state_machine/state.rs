use std::fmt;

use serde::{Deserialize, Serialize};

/// The six lifecycle states a job node can occupy.
///
/// A fresh node always starts in `Start`. `Success`, `Cancel` and `Error` are
/// terminal by convention only: a node may `yield` back into any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobState {
    #[default]
    Start,
    Busy,
    Success,
    Retry,
    Cancel,
    Error,
}

impl JobState {
    /// All states in dispatch-table order.
    pub const ALL: [JobState; 6] = [
        JobState::Start,
        JobState::Busy,
        JobState::Success,
        JobState::Retry,
        JobState::Cancel,
        JobState::Error,
    ];

    /// Numeric code of the state (`Start` = 0 .. `Error` = 5).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether the state conventionally ends a job's own lifecycle.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Success | JobState::Cancel | JobState::Error)
    }
}

/// Unknown codes fall through to `Error`, the catch-all.
impl From<u8> for JobState {
    fn from(code: u8) -> Self {
        match code {
            0 => JobState::Start,
            1 => JobState::Busy,
            2 => JobState::Success,
            3 => JobState::Retry,
            4 => JobState::Cancel,
            _ => JobState::Error,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Start => write!(f, "START"),
            JobState::Busy => write!(f, "BUSY"),
            JobState::Success => write!(f, "SUCCESS"),
            JobState::Retry => write!(f, "RETRY"),
            JobState::Cancel => write!(f, "CANCEL"),
            JobState::Error => write!(f, "ERROR"),
        }
    }
}
