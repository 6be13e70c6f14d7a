use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chain::NodeId;
use super::continuation::Transition;
use super::state::JobState;

/// One dispatch performed by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    /// 1-based position within the run.
    pub seq: u64,
    pub node: NodeId,
    pub job: String,
    /// State the node was dispatched in.
    pub state: JobState,
    pub transition: Transition,
}

/// Record of a traced chain run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainReport {
    pub run_id: Uuid,
    /// State stored on the entry node when the run stopped.
    pub entry_state: JobState,
    /// False when the run was cut short by a dispatch limit.
    pub completed: bool,
    pub nodes: usize,
    pub dispatches: Vec<Dispatch>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
}

impl ChainReport {
    /// Number of dispatches made in `state`, across all nodes.
    pub fn count_in(&self, state: JobState) -> usize {
        self.dispatches.iter().filter(|d| d.state == state).count()
    }

    /// Dispatches of a single node, in order.
    pub fn dispatches_of(&self, node: NodeId) -> impl Iterator<Item = &Dispatch> {
        self.dispatches.iter().filter(move |d| d.node == node)
    }

    /// State of the last node dispatched, if any ran.
    pub fn last_state(&self) -> Option<JobState> {
        let last = self.dispatches.last()?;
        Some(match last.transition {
            Transition::Yield(state) => state,
            _ => last.state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::{Chain, Continuation, Handoff, Job};

    struct Hop {
        hops_left: u32,
    }

    impl Job for Hop {
        fn name(&self) -> &str {
            "hop"
        }

        fn on_start(&mut self, cx: Continuation<'_, ()>, _: &()) -> Handoff {
            cx.yield_to(JobState::Busy)
        }

        fn on_busy(&mut self, cx: Continuation<'_, ()>, _: &()) -> Handoff {
            if self.hops_left == 0 {
                return cx.yield_to(JobState::Cancel);
            }
            cx.invoke(Hop {
                hops_left: self.hops_left - 1,
            })
        }
    }

    #[test]
    fn report_records_each_dispatch() {
        let mut chain = Chain::new(Hop { hops_left: 2 });
        let report = chain.execute_traced(&(), None);

        assert!(report.completed);
        assert_eq!(report.nodes, 3);
        assert_eq!(report.entry_state, JobState::Busy);
        assert_eq!(report.count_in(JobState::Start), 3);
        assert_eq!(report.count_in(JobState::Busy), 3);
        assert_eq!(report.count_in(JobState::Cancel), 1);
        assert_eq!(report.last_state(), Some(JobState::Cancel));
        assert!(report.dispatches.iter().all(|d| d.job == "hop"));

        let entry: Vec<_> = report
            .dispatches_of(chain.entry())
            .map(|d| d.transition)
            .collect();
        assert_eq!(entry.len(), 2);
        assert_eq!(entry[0], Transition::Yield(JobState::Busy));
        assert!(matches!(entry[1], Transition::Invoke(_)));
    }

    #[test]
    fn limited_report_is_incomplete() {
        let mut chain = Chain::new(Hop { hops_left: 100 });
        let report = chain.execute_traced(&(), Some(10));

        assert!(!report.completed);
        assert_eq!(report.dispatches.len(), 10);
    }

    #[test]
    fn report_serializes_to_json() {
        let mut chain = Chain::new(Hop { hops_left: 0 });
        let report = chain.execute_traced(&(), None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entry_state"], "Cancel");
        assert_eq!(json["dispatches"][0]["node"], 0);
        assert_eq!(json["dispatches"][0]["transition"]["Yield"], "Busy");
        assert_eq!(json["dispatches"][2]["transition"], "End");
    }
}
