use thiserror::Error;

use crate::state_machine::JobState;

/// Failures of the engine itself. Job failures are states, not errors.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("dispatch limit of {limit} reached, entry node left in {entry_state}")]
    DispatchLimit { limit: u64, entry_state: JobState },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_limit_display() {
        let err = ChainError::DispatchLimit {
            limit: 500,
            entry_state: JobState::Busy,
        };
        assert_eq!(
            err.to_string(),
            "dispatch limit of 500 reached, entry node left in BUSY"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChainError>();
    }
}
