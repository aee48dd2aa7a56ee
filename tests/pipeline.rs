//! Property tests for the pipeline's in-order delivery.

use std::collections::VecDeque;

use proptest::prelude::*;
use stepgen::{advance, BoxError, Coroutine, Discard, Pipeline, Propagate, SingleTask, Start, Step};

// suspends `left` times, then returns its id
struct Job {
    id: usize,
    left: usize,
    fail: bool,
}

impl Coroutine for Job {
    type Yield = ();
    type Return = usize;

    fn step(&mut self) -> Result<Step<(), usize>, BoxError> {
        if self.left > 0 {
            self.left -= 1;
            return Ok(Step::Yield(()));
        }
        if self.fail {
            return Err(format!("job {} failed", self.id).into());
        }
        Ok(Step::Return(self.id))
    }
}

fn arb_jobs() -> impl Strategy<Value = Vec<(usize, bool, bool)>> {
    prop::collection::vec((0usize..16, any::<bool>(), any::<bool>()), 0..24)
}

fn start_of(eager: bool) -> Start {
    if eager {
        Start::Eager
    } else {
        Start::Deferred
    }
}

proptest! {
    /// all submitted tasks come back, in submission order.
    #[test]
    fn drain_preserves_submission_order(jobs in arb_jobs()) {
        let mut p = Pipeline::<Job, Propagate>::new();
        for (id, &(left, eager, _)) in jobs.iter().enumerate() {
            p.push_back(SingleTask::with_start(Job { id, left, fail: false }, start_of(eager)));
        }
        let out: Vec<usize> = p.drain().map(|r| r.unwrap()).collect();
        prop_assert_eq!(out, (0..jobs.len()).collect::<Vec<_>>());
        prop_assert!(p.is_empty());
    }

    /// submitting while advancing, as a bounded driver does, keeps the order.
    #[test]
    fn interleaved_submission_preserves_order(jobs in arb_jobs(), depth in 1usize..6) {
        let mut p = Pipeline::<Job, Propagate>::with_depth(depth);
        let mut out = Vec::new();
        for (id, &(left, eager, _)) in jobs.iter().enumerate() {
            while p.is_full() {
                if let Some(v) = p.advance().unwrap() {
                    out.push(v);
                }
            }
            p.push_back(SingleTask::with_start(Job { id, left, fail: false }, start_of(eager)));
            if let Some(v) = p.advance().unwrap() {
                out.push(v);
            }
            prop_assert!(p.len() <= depth);
        }
        out.extend(p.drain().map(|r| r.unwrap()));
        prop_assert_eq!(out, (0..jobs.len()).collect::<Vec<_>>());
    }

    /// failures take their slot in the order, and only once.
    #[test]
    fn failures_keep_their_slot(jobs in arb_jobs()) {
        let mut q = VecDeque::new();
        for (id, &(left, eager, fail)) in jobs.iter().enumerate() {
            let job = Job { id, left, fail };
            q.push_back(SingleTask::<Job, Propagate>::with_start(job, start_of(eager)));
        }
        let mut out = Vec::new();
        while !q.is_empty() {
            match advance(&mut q) {
                Ok(Some(v)) => out.push(Ok(v)),
                Ok(None) => {}
                Err(e) => out.push(Err(e.to_string())),
            }
        }
        let expected: Vec<Result<usize, String>> = jobs
            .iter()
            .enumerate()
            .map(|(id, &(_, _, fail))| if fail { Err(format!("job {id} failed")) } else { Ok(id) })
            .collect();
        prop_assert_eq!(out, expected);
    }

    /// with failures discarded, the surviving results are still in order.
    #[test]
    fn discarded_failures_leave_a_gap(jobs in arb_jobs()) {
        let mut p = Pipeline::<Job, Discard>::new();
        for (id, &(left, eager, fail)) in jobs.iter().enumerate() {
            p.push_back(SingleTask::with_start(Job { id, left, fail }, start_of(eager)));
        }
        let out: Vec<usize> = p.drain().collect();
        let expected: Vec<usize> = jobs
            .iter()
            .enumerate()
            .filter(|(_, job)| !job.2)
            .map(|(id, _)| id)
            .collect();
        prop_assert_eq!(out, expected);
    }
}
