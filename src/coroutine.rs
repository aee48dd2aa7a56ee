//! # coroutine
//!
//! the body of a suspended computation
//!
//! a body is an explicit state machine: its fields are the captured locals and
//! its own resumption point, and `step` runs it from that point to the next
//! suspension point. the generator and the single task drive the same trait,
//! they only differ in what they do with each `Step`.
//!

use std::fmt;

use crate::awaiter::Awaiter;
use crate::rt::BoxError;

/// where one step of a body stopped
pub enum Step<Y, R> {
    /// suspend and publish a value
    ///
    /// a single task yields `()` at its plain suspension points
    Yield(Y),
    /// suspend until the awaiter's event has completed
    ///
    /// the driver blocks on it before the body runs again
    Await(Box<dyn Awaiter>),
    /// the body has finished
    Return(R),
}

impl<Y: fmt::Debug, R: fmt::Debug> fmt::Debug for Step<Y, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Step::Yield(v) => f.debug_tuple("Yield").field(v).finish(),
            Step::Await(_) => f.write_str("Await(..)"),
            Step::Return(v) => f.debug_tuple("Return").field(v).finish(),
        }
    }
}

/// a resumable body
pub trait Coroutine {
    /// the type published at suspension points
    type Yield;
    /// the type produced when the body finishes
    type Return;

    /// run until the next suspension point, the end, or a failure
    ///
    /// the driver never calls `step` again after it returned `Step::Return`
    /// or an error.
    fn step(&mut self) -> Result<Step<Self::Yield, Self::Return>, BoxError>;
}

impl<C: Coroutine + ?Sized> Coroutine for Box<C> {
    type Yield = C::Yield;
    type Return = C::Return;

    #[inline]
    fn step(&mut self) -> Result<Step<C::Yield, C::Return>, BoxError> {
        (**self).step()
    }
}

impl<C: Coroutine + ?Sized> Coroutine for &mut C {
    type Yield = C::Yield;
    type Return = C::Return;

    #[inline]
    fn step(&mut self) -> Result<Step<C::Yield, C::Return>, BoxError> {
        (**self).step()
    }
}

/// body built from a step closure, see [`from_fn`]
pub struct FromFn<F> {
    f: F,
}

/// create a body that calls `f` for every step
///
/// the closure carries the body's state in its captures.
///
/// ```
/// use stepgen::{from_fn, Generator, Step};
///
/// let mut n = 0;
/// let mut g = Generator::new(from_fn(move || {
///     n += 1;
///     Ok(if n <= 3 { Step::Yield(n) } else { Step::Return(()) })
/// }));
/// assert_eq!(g.resume().unwrap(), Some(&1));
/// ```
pub fn from_fn<F, Y, R>(f: F) -> FromFn<F>
where
    F: FnMut() -> Result<Step<Y, R>, BoxError>,
{
    FromFn { f }
}

impl<F, Y, R> Coroutine for FromFn<F>
where
    F: FnMut() -> Result<Step<Y, R>, BoxError>,
{
    type Yield = Y;
    type Return = R;

    #[inline]
    fn step(&mut self) -> Result<Step<Y, R>, BoxError> {
        (self.f)()
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("FromFn { .. }")
    }
}

/// when a new computation starts running
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Start {
    /// run to the first suspension point inside the constructor
    Eager,
    /// run nothing until the first explicit resume
    #[default]
    Deferred,
}
