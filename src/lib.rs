//! # stepgen
//!
//! stackless generators and single result tasks
//!
//! a body is a plain state machine implementing [`Coroutine`]: every call to
//! `step` runs it from its saved resumption point to the next suspension point.
//! [`Generator`] publishes one value per suspension, [`SingleTask`] commits one
//! result when the body returns. both are driven only by their owner, there is
//! no scheduler and no thread behind them.
//!
//! the failure policy is a type parameter. under [`Propagate`] a failing body
//! is reported once, by the next call into the handle, and the handle is
//! destroyed as part of reporting. under [`Discard`] there is no failure
//! channel at all and the driving methods return plain `Option`s.
//!
//! ```
//! use stepgen::{from_fn, Generator, Step};
//!
//! let (mut i, end) = (0u32, 100u32);
//! let range = Generator::new(from_fn(move || {
//!     if i >= end {
//!         return Ok(Step::Return(()));
//!     }
//!     i += 1;
//!     Ok(Step::Yield(i - 1))
//! }));
//! let sum: Result<u32, _> = range.into_iter().sum();
//! assert_eq!(sum.unwrap(), 4950);
//! ```
//!
//! [`Pipeline`] keeps several tasks in flight and advances them round-robin,
//! delivering results in submission order.
//!

#![deny(missing_docs)]

#[macro_use]
extern crate log;

mod awaiter;
mod cell;
mod coroutine;
mod gen_impl;
pub mod hint;
mod pipeline;
mod policy;
mod rt;
mod task;

pub use crate::awaiter::{wait_fn, Awaiter, WaitFn};
pub use crate::cell::{FallibleCell, ResultCell, ValueCell};
pub use crate::coroutine::{from_fn, Coroutine, FromFn, Start, Step};
pub use crate::gen_impl::{Generator, IntoIter, Iter};
pub use crate::pipeline::{advance, Drain, Pipeline};
pub use crate::policy::{Discard, Policy, Propagate};
pub use crate::rt::{BoxError, Error, State};
pub use crate::task::SingleTask;
