//! # result cell
//!
//! storage shared between a suspended body and its owning handle
//!

use crate::rt::Error;

/// the slot a computation publishes its outcome through
///
/// it holds at most one of: a value, a pending failure, or nothing.
pub trait ResultCell<T>: Default {
    /// store a value, overwriting whatever was there
    fn set_value(&mut self, v: T);

    /// take the pending failure out of the cell
    ///
    /// a failure is handed out at most once, the next call returns `None`
    fn take_failure(&mut self) -> Option<Error>;

    /// read the stored value
    ///
    /// a pending failure reads as no value, drain it first with `take_failure`
    fn value(&self) -> Option<&T>;

    /// move the stored value out, leaving the cell empty
    fn take_value(&mut self) -> Option<T>;
}

/// cell without a failure channel
///
/// failures never reach this cell, so it is exactly an `Option<T>`
#[derive(Debug)]
pub struct ValueCell<T> {
    value: Option<T>,
}

impl<T> Default for ValueCell<T> {
    fn default() -> Self {
        ValueCell { value: None }
    }
}

impl<T> ResultCell<T> for ValueCell<T> {
    #[inline]
    fn set_value(&mut self, v: T) {
        self.value = Some(v);
    }

    #[inline]
    fn take_failure(&mut self) -> Option<Error> {
        None
    }

    #[inline]
    fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[inline]
    fn take_value(&mut self) -> Option<T> {
        self.value.take()
    }
}

#[derive(Debug)]
enum Slot<T> {
    Empty,
    Value(T),
    Failure(Error),
}

/// cell with a failure channel
///
/// a value and a failure share the same storage, setting one replaces the other
#[derive(Debug)]
pub struct FallibleCell<T> {
    slot: Slot<T>,
}

impl<T> Default for FallibleCell<T> {
    fn default() -> Self {
        FallibleCell { slot: Slot::Empty }
    }
}

impl<T> FallibleCell<T> {
    /// record a failure, dropping any stored value
    #[inline]
    pub fn set_failure(&mut self, err: Error) {
        self.slot = Slot::Failure(err);
    }

    /// check if a failure is waiting to be taken
    #[inline]
    pub fn has_failure(&self) -> bool {
        matches!(self.slot, Slot::Failure(_))
    }
}

impl<T> ResultCell<T> for FallibleCell<T> {
    #[inline]
    fn set_value(&mut self, v: T) {
        self.slot = Slot::Value(v);
    }

    #[inline]
    fn take_failure(&mut self) -> Option<Error> {
        if !self.has_failure() {
            return None;
        }
        match std::mem::replace(&mut self.slot, Slot::Empty) {
            Slot::Failure(err) => Some(err),
            _ => None,
        }
    }

    #[inline]
    fn value(&self) -> Option<&T> {
        match &self.slot {
            Slot::Value(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    fn take_value(&mut self) -> Option<T> {
        if self.has_failure() {
            return None;
        }
        match std::mem::replace(&mut self.slot, Slot::Empty) {
            Slot::Value(v) => Some(v),
            _ => None,
        }
    }
}
