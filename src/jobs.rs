//! Example jobs that exercise the engine.
//!
//! [`Counter`] counts up to a threshold and can hand over to a follow-on
//! counter once it succeeds. [`Flaky`] fails a fixed number of attempts and
//! recovers through `Retry` until its retry budget runs out.
//!
//! Both report what they do through the [`Progress`] value passed as the
//! chain's argument.

use crate::state_machine::{Continuation, Handoff, Job, JobState};

/// Observer handed through the chain as the opaque argument.
pub trait Progress {
    fn started(&self, _job: &str) {}
    fn ticked(&self, _job: &str, _count: i32) {}
    fn retrying(&self, _job: &str, _attempt: u32, _max: u32) {}
    fn finished(&self, _job: &str, _state: JobState) {}
}

/// Silent progress.
impl Progress for () {}

pub const DEFAULT_THRESHOLD: i32 = 10;

/// Counts up from `start`, yielding `Busy` after each increment while the
/// count is below the threshold and `Success` once it reaches it.
#[derive(Debug, Clone)]
pub struct Counter {
    name: String,
    count: i32,
    threshold: i32,
    then: Option<Box<Counter>>,
}

impl Counter {
    pub fn new(name: impl Into<String>, start: i32) -> Self {
        Self {
            name: name.into(),
            count: start,
            threshold: DEFAULT_THRESHOLD,
            then: None,
        }
    }

    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Invoke `next` once this counter succeeds.
    pub fn then(mut self, next: Counter) -> Self {
        self.then = Some(Box::new(next));
        self
    }
}

impl<P: Progress> Job<P> for Counter {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_start(&mut self, cx: Continuation<'_, P>, progress: &P) -> Handoff {
        progress.started(&self.name);
        cx.yield_to(JobState::Busy)
    }

    fn on_busy(&mut self, cx: Continuation<'_, P>, progress: &P) -> Handoff {
        if self.count >= self.threshold {
            return cx.yield_to(JobState::Success);
        }
        self.count += 1;
        progress.ticked(&self.name, self.count);
        cx.yield_to(JobState::Busy)
    }

    fn on_success(&mut self, cx: Continuation<'_, P>, progress: &P) -> Handoff {
        progress.finished(&self.name, JobState::Success);
        match self.then.take() {
            Some(next) => cx.invoke(*next),
            None => cx.end(),
        }
    }

    fn on_cancel(&mut self, cx: Continuation<'_, P>, progress: &P) -> Handoff {
        progress.finished(&self.name, JobState::Cancel);
        cx.end()
    }

    fn on_failed(&mut self, cx: Continuation<'_, P>, progress: &P) -> Handoff {
        progress.finished(&self.name, JobState::Error);
        cx.end()
    }
}

/// Fails its first `failures` busy attempts, retrying up to `max_retries`
/// times before giving up with `Error`.
#[derive(Debug, Clone)]
pub struct Flaky {
    name: String,
    failures: u32,
    max_retries: u32,
    retry_count: u32,
}

impl Flaky {
    pub fn new(name: impl Into<String>, failures: u32, max_retries: u32) -> Self {
        Self {
            name: name.into(),
            failures,
            max_retries,
            retry_count: 0,
        }
    }
}

impl<P: Progress> Job<P> for Flaky {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_start(&mut self, cx: Continuation<'_, P>, progress: &P) -> Handoff {
        progress.started(&self.name);
        cx.yield_to(JobState::Busy)
    }

    fn on_busy(&mut self, cx: Continuation<'_, P>, _progress: &P) -> Handoff {
        if self.failures > 0 {
            self.failures -= 1;
            cx.yield_to(JobState::Retry)
        } else {
            cx.yield_to(JobState::Success)
        }
    }

    fn on_retry(&mut self, cx: Continuation<'_, P>, progress: &P) -> Handoff {
        self.retry_count += 1;
        if self.retry_count > self.max_retries {
            return cx.yield_to(JobState::Error);
        }
        progress.retrying(&self.name, self.retry_count, self.max_retries);
        cx.yield_to(JobState::Busy)
    }

    fn on_success(&mut self, cx: Continuation<'_, P>, progress: &P) -> Handoff {
        progress.finished(&self.name, JobState::Success);
        cx.end()
    }

    fn on_failed(&mut self, cx: Continuation<'_, P>, progress: &P) -> Handoff {
        progress.finished(&self.name, JobState::Error);
        cx.end()
    }
}
