use super::continuation::{Continuation, Handoff};

/// Behavior of a schedulable job: one operation per lifecycle state.
///
/// The executor calls exactly one of these per dispatch, selected by the
/// node's current state. Each operation receives the [`Continuation`] for the
/// node being dispatched and must hand it back through one of
/// [`yield_to`](Continuation::yield_to), [`invoke`](Continuation::invoke) or
/// [`end`](Continuation::end). `args` is the value given to
/// [`Chain::execute`](super::Chain::execute), passed through untouched.
///
/// `on_start` and `on_busy` carry the job's work and have no default. The
/// remaining operations end the node's life in the chain unless overridden.
pub trait Job<A = ()> {
    /// Label used in logs and dispatch reports.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// One-time initialization. Should end with `yield_to`, otherwise the
    /// node leaves the chain still in `Start`.
    fn on_start(&mut self, cx: Continuation<'_, A>, args: &A) -> Handoff;

    /// Incremental work: yield `Busy` again to continue, or move on to
    /// `Success`, `Retry`, `Cancel` or `Error`.
    fn on_busy(&mut self, cx: Continuation<'_, A>, args: &A) -> Handoff;

    /// Completion. May `invoke` a follow-on job.
    fn on_success(&mut self, cx: Continuation<'_, A>, _args: &A) -> Handoff {
        cx.end()
    }

    /// Recovery attempt. Typically yields back into `Busy` or `Start`, or
    /// gives up with `Error`/`Cancel`.
    fn on_retry(&mut self, cx: Continuation<'_, A>, _args: &A) -> Handoff {
        cx.end()
    }

    /// Cooperative teardown.
    fn on_cancel(&mut self, cx: Continuation<'_, A>, _args: &A) -> Handoff {
        cx.end()
    }

    /// Catch-all for `Error`.
    fn on_failed(&mut self, cx: Continuation<'_, A>, _args: &A) -> Handoff {
        cx.end()
    }
}
