//! # failure policy
//!
//! compile time switch for the failure channel of a computation
//!
//! `Propagate` keeps a failure in the result cell and hands it to the caller on
//! the next interaction. `Discard` has no failure channel at all: the cell is a
//! plain `Option<T>`, failures are dropped and the driving methods cannot fail.
//! under both policies a panicking body ends like a failing one.
//!

use std::panic;

use crate::cell::{FallibleCell, ResultCell, ValueCell};
use crate::rt::{BoxError, Error, State};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Propagate {}
    impl Sealed for super::Discard {}
}

/// selects how failures raised inside a body are handled
pub trait Policy: sealed::Sealed + Sized + 'static {
    /// the result cell used by computations under this policy
    type Cell<T>: ResultCell<T>;

    /// what `resume`/`get` hand back for a value of type `T`
    type Output<T>;

    /// what iteration yields for a value of type `T`
    type Item<T>;

    /// true if failures reach the caller
    const PROPAGATES: bool;

    /// run one piece of body code, turning its failure or panic into an `Error`
    #[inline]
    fn run<R>(f: impl FnOnce() -> Result<R, BoxError>) -> Result<R, Error> {
        catch_step(f)
    }

    /// record a failure in the cell, returns the state the frame ends up in
    fn capture<T>(cell: &mut Self::Cell<T>, err: Error) -> State;

    /// shape a driving result into the policy's return type
    fn output<T>(ret: Result<Option<T>, Error>) -> Self::Output<T>;

    /// shape a driving result into an iteration item
    fn item<T>(ret: Result<Option<T>, Error>) -> Option<Self::Item<T>>;
}

/// failures are stored and reported on the next interaction
#[derive(Debug, Clone, Copy, Default)]
pub struct Propagate;

/// failures are silently dropped, the computation just reports completion
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

// a panic never unwinds through the driver, it ends the body like a failure
#[inline]
fn catch_step<R>(f: impl FnOnce() -> Result<R, BoxError>) -> Result<R, Error> {
    match panic::catch_unwind(panic::AssertUnwindSafe(f)) {
        Ok(ret) => ret.map_err(Error::Step),
        Err(cause) => {
            error!("panicked inside coroutine body");
            Err(Error::from_panic(cause))
        }
    }
}

impl Policy for Propagate {
    type Cell<T> = FallibleCell<T>;
    type Output<T> = Result<Option<T>, Error>;
    type Item<T> = Result<T, Error>;

    const PROPAGATES: bool = true;

    #[inline]
    fn capture<T>(cell: &mut FallibleCell<T>, err: Error) -> State {
        debug!("coroutine step failed: {err}");
        cell.set_failure(err);
        State::Failed
    }

    #[inline]
    fn output<T>(ret: Result<Option<T>, Error>) -> Self::Output<T> {
        ret
    }

    #[inline]
    fn item<T>(ret: Result<Option<T>, Error>) -> Option<Self::Item<T>> {
        ret.transpose()
    }
}

impl Policy for Discard {
    type Cell<T> = ValueCell<T>;
    type Output<T> = Option<T>;
    type Item<T> = T;

    const PROPAGATES: bool = false;

    #[inline]
    fn capture<T>(_cell: &mut ValueCell<T>, err: Error) -> State {
        debug!("discarding coroutine failure: {err}");
        State::Completed
    }

    #[inline]
    fn output<T>(ret: Result<Option<T>, Error>) -> Self::Output<T> {
        ret.ok().flatten()
    }

    #[inline]
    fn item<T>(ret: Result<Option<T>, Error>) -> Option<Self::Item<T>> {
        ret.ok().flatten()
    }
}
