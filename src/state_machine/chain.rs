//! Job chains and the executor loop that drains them.
//!
//! Nodes live in an [`Arena`] and refer to their successor by [`NodeId`].
//! The executor moves a node's behavior out of its slot for the duration of
//! a dispatch and takes the node's `next` link once the dispatch returns, so
//! a link is consumed exactly once and a node is never reachable both from
//! its predecessor and from the cursor.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, error, info, trace, warn};
use uuid::Uuid;

use super::continuation::{Continuation, Handoff, Transition};
use super::job::Job;
use super::report::{ChainReport, Dispatch};
use super::state::JobState;
use crate::error::ChainError;

/// Index of a node within its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) struct Slot<A> {
    pub(crate) state: JobState,
    pub(crate) next: Option<NodeId>,
    pub(crate) name: String,
    // Empty while the node is being dispatched, and for good once it retires.
    pub(crate) job: Option<Box<dyn Job<A>>>,
}

/// Backing storage for the nodes of one chain.
pub(crate) struct Arena<A> {
    slots: Vec<Slot<A>>,
}

impl<A> Default for Arena<A> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<A> Arena<A> {
    pub(crate) fn insert(&mut self, job: Box<dyn Job<A>>) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            state: JobState::Start,
            next: None,
            name: job.name().to_string(),
            job: Some(job),
        });
        id
    }

    pub(crate) fn slot(&self, id: NodeId) -> &Slot<A> {
        &self.slots[id.0]
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> &mut Slot<A> {
        &mut self.slots[id.0]
    }

    pub(crate) fn tail(&self, from: NodeId) -> NodeId {
        let mut cur = from;
        while let Some(next) = self.slot(cur).next {
            cur = next;
        }
        cur
    }

    /// Link `node` behind the tail reachable from `from`; returns that tail.
    pub(crate) fn append(&mut self, from: NodeId, node: NodeId) -> NodeId {
        let tail = self.tail(from);
        self.slot_mut(tail).next = Some(node);
        tail
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, id: NodeId) -> Option<&Slot<A>> {
        self.slots.get(id.0)
    }

    fn pending_links(&self) -> usize {
        self.slots.iter().filter(|s| s.next.is_some()).count()
    }
}

enum RunOutcome {
    Drained,
    LimitReached,
}

/// A chain of job nodes seeded from one entry job.
///
/// `A` is the argument type passed through to every dispatched operation.
pub struct Chain<A = ()> {
    arena: Arena<A>,
    entry: NodeId,
}

impl<A> Chain<A> {
    /// Seed a chain with `job` in `Start` and no successor.
    pub fn new<J>(job: J) -> Self
    where
        J: Job<A> + 'static,
    {
        let mut arena = Arena::default();
        let entry = arena.insert(Box::new(job));
        Self { arena, entry }
    }

    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// State stored on the entry node.
    pub fn state(&self) -> JobState {
        self.arena.slot(self.entry).state
    }

    /// Last recorded state of any node this chain has created.
    pub fn state_of(&self, id: NodeId) -> Option<JobState> {
        self.arena.get(id).map(|s| s.state)
    }

    /// Whether the node still holds its behavior (not yet retired).
    pub fn is_live(&self, id: NodeId) -> bool {
        self.arena.get(id).is_some_and(|s| s.job.is_some())
    }

    /// Number of nodes ever created in this chain, retired ones included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Number of `next` links currently set.
    pub fn pending_links(&self) -> usize {
        self.arena.pending_links()
    }

    /// Drive the chain until no successor is linked.
    ///
    /// Returns the entry node's own state, which is not necessarily the state
    /// of the last node dispatched.
    pub fn execute(&mut self, args: &A) -> JobState {
        self.run(args, None, None);
        self.state()
    }

    /// Like [`execute`](Self::execute), but gives up after `limit` dispatches.
    pub fn execute_bounded(&mut self, args: &A, limit: u64) -> Result<JobState, ChainError> {
        match self.run(args, Some(limit), None) {
            RunOutcome::Drained => Ok(self.state()),
            RunOutcome::LimitReached => Err(ChainError::DispatchLimit {
                limit,
                entry_state: self.state(),
            }),
        }
    }

    /// Run the chain, recording every dispatch.
    pub fn execute_traced(&mut self, args: &A, limit: Option<u64>) -> ChainReport {
        let started_at = Utc::now();
        let mut dispatches = Vec::new();
        let outcome = self.run(args, limit, Some(&mut dispatches));
        let completed_at = Utc::now();

        ChainReport {
            run_id: Uuid::new_v4(),
            entry_state: self.state(),
            completed: matches!(outcome, RunOutcome::Drained),
            nodes: self.node_count(),
            dispatches,
            started_at,
            completed_at,
            duration_ms: (completed_at - started_at).num_milliseconds(),
        }
    }

    fn run(
        &mut self,
        args: &A,
        limit: Option<u64>,
        mut record: Option<&mut Vec<Dispatch>>,
    ) -> RunOutcome {
        let _span = debug_span!("chain", entry = %self.entry).entered();
        let mut cursor = Some(self.entry);
        let mut seq: u64 = 0;

        while let Some(id) = cursor {
            if let Some(max) = limit
                && seq >= max
            {
                warn!(limit = max, node = %id, "dispatch limit reached, abandoning chain");
                return RunOutcome::LimitReached;
            }

            let slot = self.arena.slot_mut(id);
            let state = slot.state;
            let Some(mut job) = slot.job.take() else {
                error!(node = %id, "linked node has no behavior, stopping");
                break;
            };
            debug!(node = %id, job = %slot.name, %state, "dispatch");

            let handoff = dispatch(job.as_mut(), state, Continuation::new(&mut self.arena, id), args);
            let transition = handoff.transition();
            seq += 1;

            let slot = self.arena.slot_mut(id);
            // Only a yield can make this node reachable again.
            if id == self.entry || matches!(transition, Transition::Yield(_)) {
                slot.job = Some(job);
            } else {
                trace!(node = %id, "retired");
            }

            if let Some(record) = record.as_deref_mut() {
                record.push(Dispatch {
                    seq,
                    node: id,
                    job: slot.name.clone(),
                    state,
                    transition,
                });
            }

            cursor = slot.next.take();
        }

        info!(dispatches = seq, entry_state = %self.state(), "chain drained");
        RunOutcome::Drained
    }
}

/// Run a single job (and whatever it delegates to) to completion.
pub fn execute<A, J>(job: J, args: &A) -> JobState
where
    J: Job<A> + 'static,
{
    Chain::new(job).execute(args)
}

fn dispatch<A>(
    job: &mut dyn Job<A>,
    state: JobState,
    cx: Continuation<'_, A>,
    args: &A,
) -> Handoff {
    match state {
        JobState::Start => job.on_start(cx, args),
        JobState::Busy => job.on_busy(cx, args),
        JobState::Success => job.on_success(cx, args),
        JobState::Retry => job.on_retry(cx, args),
        JobState::Cancel => job.on_cancel(cx, args),
        JobState::Error => job.on_failed(cx, args),
    }
}
