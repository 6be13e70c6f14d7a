//! The continuation API: the only way job code may reshape its chain.
//!
//! A [`Continuation`] is created by the executor for a single dispatch and is
//! consumed by the one chain operation the job picks. The resulting
//! [`Handoff`] can only be produced here, so a lifecycle operation cannot
//! return without having made exactly one decision.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::chain::{Arena, NodeId};
use super::job::Job;
use super::state::JobState;

/// What a dispatched node did with its continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// The node re-linked itself at the tail, to be dispatched again in this state.
    Yield(JobState),
    /// A new node was appended at the tail.
    Invoke(NodeId),
    /// Nothing was linked; the node leaves the chain.
    End,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Yield(state) => write!(f, "yield {state}"),
            Transition::Invoke(node) => write!(f, "invoke {node}"),
            Transition::End => write!(f, "end"),
        }
    }
}

/// Receipt proving a continuation was consumed.
#[must_use = "lifecycle operations must return the handoff to the executor"]
#[derive(Debug)]
pub struct Handoff {
    transition: Transition,
}

impl Handoff {
    pub fn transition(&self) -> Transition {
        self.transition
    }
}

/// Handle on the node currently being dispatched.
pub struct Continuation<'a, A> {
    arena: &'a mut Arena<A>,
    current: NodeId,
}

impl<'a, A> Continuation<'a, A> {
    pub(crate) fn new(arena: &'a mut Arena<A>, current: NodeId) -> Self {
        Self { arena, current }
    }

    /// Id of the node being dispatched.
    pub fn id(&self) -> NodeId {
        self.current
    }

    /// State the node was dispatched in.
    pub fn state(&self) -> JobState {
        self.arena.slot(self.current).state
    }

    /// Last node reachable from the dispatched node through `next` links.
    pub fn tail(&self) -> NodeId {
        self.arena.tail(self.current)
    }

    /// Re-schedule the dispatched node in `state`.
    ///
    /// The node is linked behind the current tail of its own remaining chain.
    /// When nothing follows it that tail is the node itself: the self-link is
    /// consumed by the executor right after this dispatch returns.
    pub fn yield_to(self, state: JobState) -> Handoff {
        self.arena.slot_mut(self.current).state = state;
        let tail = self.arena.append(self.current, self.current);
        trace!(node = %self.current, %tail, %state, "yield");
        Handoff {
            transition: Transition::Yield(state),
        }
    }

    /// Append `job` as a fresh node (state `Start`, no successor) at the
    /// tail, delegating the rest of the workflow to it.
    pub fn invoke<J>(self, job: J) -> Handoff
    where
        J: Job<A> + 'static,
    {
        let node = self.arena.insert(Box::new(job));
        let tail = self.arena.append(self.current, node);
        trace!(node = %self.current, %tail, invoked = %node, "invoke");
        Handoff {
            transition: Transition::Invoke(node),
        }
    }

    /// Link nothing. Unless something was already queued behind the
    /// dispatched node, the run stops after this dispatch.
    pub fn end(self) -> Handoff {
        trace!(node = %self.current, "end");
        Handoff {
            transition: Transition::End,
        }
    }
}
