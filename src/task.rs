//! # single task
//!
//! a resumable computation that produces exactly one result
//!

use std::any::type_name;
use std::fmt;

use crate::cell::ResultCell;
use crate::coroutine::{Coroutine, Start, Step};
use crate::policy::{Discard, Policy};
use crate::rt::{Error, Frame, Handle, State};

/// a computation that suspends any number of times and then returns once
///
/// the body yields `()` at its suspension points, or suspends on an awaiter,
/// and commits its result with `Step::Return`. once completed the task stays
/// completed and keeps the result until it is taken. a task with
/// `Return = ()` only reports completion.
///
/// the default policy is `Discard`: a failing body just completes without a
/// value. use `Propagate` to get the failure back from the next call.
pub struct SingleTask<C: Coroutine, P: Policy = Discard> {
    handle: Handle<C, C::Return, P>,
}

impl<C: Coroutine<Yield = ()>> SingleTask<C, Discard> {
    /// create a task that runs to its first suspension point right away
    pub fn new(body: C) -> Self {
        Self::with_start(body, Start::Eager)
    }

    /// create a task that runs nothing until the first resume
    pub fn deferred(body: C) -> Self {
        Self::with_start(body, Start::Deferred)
    }
}

impl<C: Coroutine<Yield = ()>, P: Policy> SingleTask<C, P> {
    /// create a task with the given start policy
    ///
    /// an eager start runs the body inside the constructor, a failure raised
    /// there is reported by the first call
    pub fn with_start(body: C, start: Start) -> Self {
        let mut task = SingleTask {
            handle: Handle::new(body),
        };
        if start == Start::Eager {
            if let Some(frame) = task.handle.frame_mut() {
                advance(frame);
            }
        }
        task
    }

    /// run the body to its next suspension point
    ///
    /// returns the result once the body has returned, `None` while it is
    /// still running. a completed task is not run again.
    #[inline]
    pub fn resume(&mut self) -> P::Output<&C::Return> {
        P::output(self.raw_resume())
    }

    /// poll for the result without running the body
    #[inline]
    pub fn get(&mut self) -> P::Output<&C::Return> {
        P::output(self.raw_get())
    }

    /// move the result out of a completed task
    ///
    /// a second call returns `None`, the task itself stays completed
    #[inline]
    pub fn take_output(&mut self) -> P::Output<C::Return> {
        P::output(self.raw_take())
    }

    /// consume the task, returning its result if it completed
    pub fn into_output(mut self) -> P::Output<C::Return> {
        P::output(self.raw_take())
    }

    /// is finished: returned, failed, or destroyed
    ///
    /// a task whose failure was reported is empty and counts as done
    #[inline]
    pub fn is_done(&self) -> bool {
        self.handle.state().is_terminal()
    }

    /// get the life cycle state
    #[inline]
    pub fn state(&self) -> State {
        self.handle.state()
    }

    /// drop the suspended body now, the task becomes empty
    pub fn destroy(&mut self) {
        self.handle.destroy();
    }

    /// run one step without surfacing a pending failure
    ///
    /// used by drivers that only look at some of their tasks each round, the
    /// failure then waits for the task's next `get`/`resume`
    pub(crate) fn step(&mut self) {
        if let Some(frame) = self.handle.frame_mut() {
            if !frame.state.is_terminal() {
                advance(frame);
            }
        }
    }

    fn raw_resume(&mut self) -> Result<Option<&C::Return>, Error> {
        if let Some(frame) = self.handle.check()? {
            if !frame.state.is_terminal() {
                advance(frame);
            }
        }
        self.raw_get()
    }

    fn raw_get(&mut self) -> Result<Option<&C::Return>, Error> {
        let frame = self.handle.check()?;
        Ok(frame.and_then(|f| match f.state {
            State::Completed => f.cell.value(),
            _ => None,
        }))
    }

    pub(crate) fn raw_take(&mut self) -> Result<Option<C::Return>, Error> {
        let frame = self.handle.check()?;
        Ok(frame.and_then(|f| match f.state {
            State::Completed => f.cell.take_value(),
            _ => None,
        }))
    }
}

// one resumption step
fn advance<C, P>(frame: &mut Frame<C, C::Return, P>)
where
    C: Coroutine<Yield = ()>,
    P: Policy,
{
    match frame.step() {
        Some(Step::Yield(())) | None => {}
        Some(Step::Await(awaiter)) => frame.awaiting = Some(awaiter),
        Some(Step::Return(v)) => {
            frame.cell.set_value(v);
            frame.state = State::Completed;
        }
    }
}

impl<C: Coroutine, P: Policy> fmt::Debug for SingleTask<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SingleTask<Return={}> {{ state: {:?} }}",
            type_name::<C::Return>(),
            self.handle.state()
        )
    }
}
