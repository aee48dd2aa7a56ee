//! # pipeline
//!
//! overlap several single tasks and deliver their results in order
//!
//! every round resumes all in-flight tasks by one step, then looks at the
//! oldest one only. a task that finished early waits behind a slower one, so
//! results come out in submission order. keeping several tasks in flight hides
//! the latency of whatever their bodies wait on: device transfers, memory
//! prefetches, requests served by another thread.
//!

use std::collections::VecDeque;
use std::fmt;

use crate::coroutine::Coroutine;
use crate::policy::Policy;
use crate::rt::Error;
use crate::task::SingleTask;

/// advance every task in `queue` by one step and pop the oldest if it settled
///
/// returns the oldest task's result once it is done, or `None` while it is
/// still running. a task that failed is popped too, its failure is the
/// result under `Propagate`. under `Discard` a failed head is popped without
/// a result, so `None` alone does not tell it from a head still running:
/// compare the queue length before and after the call to detect it.
pub fn advance<C, P>(queue: &mut VecDeque<SingleTask<C, P>>) -> P::Output<C::Return>
where
    C: Coroutine<Yield = ()>,
    P: Policy,
{
    P::output(raw_advance(queue))
}

fn raw_advance<C, P>(queue: &mut VecDeque<SingleTask<C, P>>) -> Result<Option<C::Return>, Error>
where
    C: Coroutine<Yield = ()>,
    P: Policy,
{
    for task in queue.iter_mut() {
        task.step();
    }

    match queue.front() {
        Some(head) if head.state().is_terminal() => {}
        _ => return Ok(None),
    }

    match queue.pop_front() {
        Some(mut head) => {
            trace!("pipeline head settled, {} task(s) still in flight", queue.len());
            head.raw_take()
        }
        None => Ok(None),
    }
}

/// a FIFO of in-flight tasks
pub struct Pipeline<C: Coroutine, P: Policy> {
    queue: VecDeque<SingleTask<C, P>>,
    depth: usize,
}

impl<C: Coroutine<Yield = ()>, P: Policy> Pipeline<C, P> {
    /// create a pipeline without a depth limit
    pub fn new() -> Self {
        Self::with_depth(usize::MAX)
    }

    /// create a pipeline that reports full at `depth` tasks in flight
    ///
    /// the depth is advisory: `push_back` never refuses a task, callers check
    /// `is_full` and advance before submitting more work
    pub fn with_depth(depth: usize) -> Self {
        Pipeline {
            queue: VecDeque::new(),
            depth: depth.max(1),
        }
    }

    /// submit a task behind all in-flight ones
    pub fn push_back(&mut self, task: SingleTask<C, P>) {
        self.queue.push_back(task);
    }

    /// advance every task by one step, see [`advance`]
    pub fn advance(&mut self) -> P::Output<C::Return> {
        advance(&mut self.queue)
    }

    /// keep advancing until every in-flight task delivered its result
    ///
    /// rounds without a result are skipped, the iterator ends when the
    /// pipeline is empty
    pub fn drain(&mut self) -> Drain<'_, C, P> {
        Drain { pipeline: self }
    }

    /// number of tasks in flight
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// check if no task is in flight
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// the configured depth
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// check if the in-flight tasks reached the configured depth
    #[inline]
    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.depth
    }
}

impl<C: Coroutine<Yield = ()>, P: Policy> Default for Pipeline<C, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Coroutine, P: Policy> fmt::Debug for Pipeline<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("in_flight", &self.queue.len())
            .field("depth", &self.depth)
            .finish()
    }
}

/// draining iterator, see [`Pipeline::drain`]
pub struct Drain<'a, C: Coroutine, P: Policy> {
    pipeline: &'a mut Pipeline<C, P>,
}

impl<'a, C: Coroutine<Yield = ()>, P: Policy> Iterator for Drain<'a, C, P> {
    type Item = P::Item<C::Return>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.pipeline.queue.is_empty() {
            match raw_advance(&mut self.pipeline.queue) {
                Ok(None) => continue,
                ret => {
                    if let Some(item) = P::item(ret) {
                        return Some(item);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coroutine::{Start, Step};
    use crate::policy::{Discard, Propagate};
    use crate::rt::BoxError;

    // suspends `left` times, then returns `id`, or fails if `fail` is set
    struct Countdown {
        id: usize,
        left: usize,
        fail: bool,
    }

    impl Coroutine for Countdown {
        type Yield = ();
        type Return = usize;

        fn step(&mut self) -> Result<Step<(), usize>, BoxError> {
            if self.left > 0 {
                self.left -= 1;
                return Ok(Step::Yield(()));
            }
            if self.fail {
                return Err(format!("task {} failed", self.id).into());
            }
            Ok(Step::Return(self.id))
        }
    }

    fn task<P: Policy>(id: usize, left: usize, fail: bool) -> SingleTask<Countdown, P> {
        SingleTask::with_start(Countdown { id, left, fail }, Start::Deferred)
    }

    #[test]
    fn slow_head_holds_back_fast_tasks() {
        let mut p = Pipeline::<Countdown, Propagate>::new();
        p.push_back(task(0, 3, false));
        p.push_back(task(1, 0, false));
        p.push_back(task(2, 1, false));

        let mut rounds = Vec::new();
        while !p.is_empty() {
            rounds.push(p.advance().unwrap());
        }
        // the head needs four steps, the others are done by then
        assert_eq!(rounds, [None, None, None, Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn failure_is_delivered_in_order() {
        let mut p = Pipeline::<Countdown, Propagate>::new();
        p.push_back(task(0, 2, false));
        p.push_back(task(1, 0, true));
        p.push_back(task(2, 0, false));

        let out: Vec<Result<usize, String>> =
            p.drain().map(|r| r.map_err(|e| e.to_string())).collect();
        assert_eq!(out, [Ok(0), Err("task 1 failed".to_owned()), Ok(2)]);
        assert!(p.is_empty());
    }

    #[test]
    fn discarded_failure_is_skipped() {
        let mut p = Pipeline::<Countdown, Discard>::new();
        p.push_back(task(0, 1, true));
        p.push_back(task(1, 1, false));
        let out: Vec<usize> = p.drain().collect();
        assert_eq!(out, [1]);
    }

    #[test]
    fn discarded_failure_shows_in_len() {
        let mut p = Pipeline::<Countdown, Discard>::new();
        p.push_back(task(0, 1, true));
        p.push_back(task(1, 3, false));

        // head still running
        assert_eq!(p.advance(), None);
        assert_eq!(p.len(), 2);

        // head failed and was popped without a result
        assert_eq!(p.advance(), None);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn depth_is_reported() {
        let mut p = Pipeline::<Countdown, Discard>::with_depth(2);
        assert_eq!(p.depth(), 2);
        p.push_back(task(0, 5, false));
        assert!(!p.is_full());
        p.push_back(task(1, 5, false));
        assert!(p.is_full());
        assert_eq!(p.advance(), None);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn bare_queue() {
        let mut q: VecDeque<SingleTask<Countdown, Discard>> = VecDeque::new();
        assert_eq!(advance(&mut q), None);
        q.push_back(task(7, 0, false));
        assert_eq!(advance(&mut q), Some(7));
        assert!(q.is_empty());
    }
}
