mod chain;
mod continuation;
mod job;
mod report;
mod state;

pub use chain::{Chain, NodeId, execute};
pub use continuation::{Continuation, Handoff, Transition};
pub use job::Job;
pub use report::{ChainReport, Dispatch};
pub use state::JobState;
