//! # run time support
//!
//! the suspended frame and the handle that owns it
//!
use std::any::Any;
use std::fmt;

use crate::awaiter::Awaiter;
use crate::cell::ResultCell;
use crate::coroutine::{Coroutine, Step};
use crate::policy::Policy;

/// boxed failure raised by a body
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// errors reported by the driving methods
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// the body failed during a resumption step
    #[error("{0}")]
    Step(#[source] BoxError),
    /// the body panicked during a resumption step
    #[error("coroutine panicked: {0}")]
    Panicked(String),
    /// the handle is empty: destroyed, or its failure was already reported
    #[error("called coroutine on empty/destroyed handle")]
    UseAfterEnd,
}

impl Error {
    pub(crate) fn from_panic(cause: Box<dyn Any + Send + 'static>) -> Self {
        let msg = match cause.downcast::<&'static str>() {
            Ok(s) => (*s).to_owned(),
            Err(cause) => match cause.downcast::<String>() {
                Ok(s) => *s,
                Err(_) => "Box<dyn Any>".to_owned(),
            },
        };
        Error::Panicked(msg)
    }

    /// check if this is a failure raised by the body
    pub fn is_step_failure(&self) -> bool {
        matches!(self, Error::Step(_) | Error::Panicked(_))
    }

    /// check if the handle was already empty
    pub fn is_use_after_end(&self) -> bool {
        matches!(self, Error::UseAfterEnd)
    }
}

/// life cycle of a suspended computation
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum State {
    /// constructed, the body never ran
    NotStarted,
    /// paused at a suspension point
    Suspended,
    /// the body finished, or failed with the failure discarded
    Completed,
    /// the body failed and the failure has not been reported yet
    Failed,
    /// the handle owns no frame any more
    Empty,
}

impl State {
    /// check if the body can not run again
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, State::NotStarted | State::Suspended)
    }
}

/// a paused body together with its result cell
pub(crate) struct Frame<B, T, P: Policy> {
    pub(crate) body: B,
    pub(crate) cell: P::Cell<T>,
    pub(crate) state: State,
    // event to block on before the body runs again
    pub(crate) awaiting: Option<Box<dyn Awaiter>>,
    // the current value was produced but never handed to the caller
    pub(crate) unread: bool,
}

impl<B: Coroutine, T, P: Policy> Frame<B, T, P> {
    /// run the body to its next suspension point
    ///
    /// returns `None` if the step failed, the failure is then recorded in the
    /// cell according to the policy
    pub(crate) fn step(&mut self) -> Option<Step<B::Yield, B::Return>> {
        debug_assert!(!self.state.is_terminal());
        if let Some(awaiter) = self.awaiting.take() {
            if let Err(err) = P::run(|| awaiter.wait()) {
                self.state = P::capture(&mut self.cell, err);
                return None;
            }
        }

        let body = &mut self.body;
        match P::run(|| body.step()) {
            Ok(step) => {
                self.state = State::Suspended;
                Some(step)
            }
            Err(err) => {
                self.state = P::capture(&mut self.cell, err);
                None
            }
        }
    }
}

impl<B, T, P: Policy> fmt::Debug for Frame<B, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Frame")
            .field("state", &self.state)
            .field("awaiting", &self.awaiting.is_some())
            .finish()
    }
}

/// the unique owner of a frame
///
/// moving the handle moves the ownership, dropping it reclaims the frame
pub(crate) struct Handle<B, T, P: Policy> {
    frame: Option<Box<Frame<B, T, P>>>,
}

impl<B, T, P: Policy> Handle<B, T, P> {
    pub(crate) fn new(body: B) -> Self {
        Handle {
            frame: Some(Box::new(Frame {
                body,
                cell: Default::default(),
                state: State::NotStarted,
                awaiting: None,
                unread: false,
            })),
        }
    }

    #[inline]
    pub(crate) fn state(&self) -> State {
        self.frame.as_ref().map_or(State::Empty, |f| f.state)
    }

    #[inline]
    pub(crate) fn frame_mut(&mut self) -> Option<&mut Frame<B, T, P>> {
        self.frame.as_deref_mut()
    }

    /// surface a pending failure before touching the frame
    ///
    /// a reported failure destroys the frame. an empty handle is an error
    /// only when the policy propagates failures.
    pub(crate) fn check(&mut self) -> Result<Option<&mut Frame<B, T, P>>, Error> {
        let Some(frame) = self.frame.as_mut() else {
            return if P::PROPAGATES {
                Err(Error::UseAfterEnd)
            } else {
                Ok(None)
            };
        };
        if let Some(err) = frame.cell.take_failure() {
            self.destroy();
            return Err(err);
        }
        Ok(self.frame.as_deref_mut())
    }

    /// drop the frame, the handle becomes empty
    pub(crate) fn destroy(&mut self) {
        if let Some(frame) = self.frame.take() {
            if !frame.state.is_terminal() {
                trace!("reclaiming an unfinished coroutine frame");
            }
        }
    }
}

impl<B, T, P: Policy> fmt::Debug for Handle<B, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Handle").field("state", &self.state()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coroutine::from_fn;
    use crate::policy::{Discard, Propagate};

    fn failing() -> impl Coroutine<Yield = (), Return = ()> {
        from_fn(|| -> Result<Step<(), ()>, BoxError> { Err("boom".into()) })
    }

    #[test]
    fn failure_destroys_on_report() {
        let mut h = Handle::<_, (), Propagate>::new(failing());
        let frame = h.check().unwrap().unwrap();
        assert!(frame.step().is_none());
        assert_eq!(h.state(), State::Failed);

        let err = h.check().unwrap_err();
        assert!(err.is_step_failure());
        assert_eq!(err.to_string(), "boom");
        assert_eq!(h.state(), State::Empty);
        assert!(h.check().unwrap_err().is_use_after_end());
    }

    #[test]
    fn discarded_failure_completes() {
        let mut h = Handle::<_, (), Discard>::new(failing());
        let frame = h.check().unwrap().unwrap();
        assert!(frame.step().is_none());
        assert_eq!(h.state(), State::Completed);
        assert!(h.check().unwrap().is_some());

        h.destroy();
        assert_eq!(h.state(), State::Empty);
        assert!(h.check().unwrap().is_none());
    }

    #[test]
    fn panic_becomes_failure() {
        let body = from_fn(|| -> Result<Step<(), ()>, BoxError> { panic!("bad step") });
        let mut h = Handle::<_, (), Propagate>::new(body);
        let frame = h.check().unwrap().unwrap();
        assert!(frame.step().is_none());
        match h.check() {
            Err(Error::Panicked(msg)) => assert_eq!(msg, "bad step"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
