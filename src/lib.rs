//! Cooperative continuation engine.
//!
//! A unit of work is written as a [`Job`]: six lifecycle operations, one per
//! [`JobState`]. A [`Chain`] drives its entry job and everything the job
//! delegates to in a single loop. Jobs steer the chain only through the
//! [`Continuation`] they are handed on each dispatch: `yield_to` re-schedules
//! the job in a new state, `invoke` appends a follow-on job, `end` links
//! nothing.
//!
//! ```
//! use jobchain::{Continuation, Handoff, Job, JobState};
//!
//! struct Countdown(u32);
//!
//! impl Job for Countdown {
//!     fn on_start(&mut self, cx: Continuation<'_, ()>, _: &()) -> Handoff {
//!         cx.yield_to(JobState::Busy)
//!     }
//!
//!     fn on_busy(&mut self, cx: Continuation<'_, ()>, _: &()) -> Handoff {
//!         if self.0 == 0 {
//!             return cx.yield_to(JobState::Success);
//!         }
//!         self.0 -= 1;
//!         cx.yield_to(JobState::Busy)
//!     }
//! }
//!
//! assert_eq!(jobchain::execute(Countdown(3), &()), JobState::Success);
//! ```

pub mod config;
pub mod error;
pub mod jobs;
pub mod state_machine;
pub mod ui;

pub use error::ChainError;
pub use state_machine::{
    Chain, ChainReport, Continuation, Dispatch, Handoff, Job, JobState, NodeId, Transition,
    execute,
};
