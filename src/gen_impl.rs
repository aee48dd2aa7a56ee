//! # generator
//!
//! lazy sequence over a body that publishes one value per suspension
//!

use std::any::type_name;
use std::fmt;
use std::iter::FusedIterator;

use crate::cell::ResultCell;
use crate::coroutine::{Coroutine, Start, Step};
use crate::policy::{Policy, Propagate};
use crate::rt::{Error, Frame, Handle, State};

/// a lazily evaluated sequence
///
/// each `resume` runs the body to its next `Step::Yield` and publishes the
/// value. the sequence is single pass: once the body returned it stays done.
///
/// with the default `Propagate` policy a failure raised by the body is
/// reported once, by the call that observes it, and the generator is destroyed
/// as part of reporting. with `Discard` the generator just ends.
pub struct Generator<C: Coroutine, P: Policy = Propagate> {
    handle: Handle<C, C::Yield, P>,
}

impl<C: Coroutine<Return = ()>> Generator<C, Propagate> {
    /// create a generator that runs nothing until the first resume
    pub fn new(body: C) -> Self {
        Self::with_start(body, Start::Deferred)
    }

    /// create a generator that runs to its first value right away
    pub fn eager(body: C) -> Self {
        Self::with_start(body, Start::Eager)
    }
}

impl<C: Coroutine<Return = ()>, P: Policy> Generator<C, P> {
    /// create a generator with the given start policy
    ///
    /// a failure during an eager start stays pending until the first call
    pub fn with_start(body: C, start: Start) -> Self {
        let mut g = Generator {
            handle: Handle::new(body),
        };
        if start == Start::Eager {
            if let Some(frame) = g.handle.frame_mut() {
                advance(frame);
                frame.unread = frame.state == State::Suspended;
            }
        }
        g
    }

    /// run the body to its next value
    ///
    /// returns `None` once the sequence has ended
    #[inline]
    pub fn resume(&mut self) -> P::Output<&C::Yield> {
        P::output(self.raw_resume())
    }

    /// read the current value without running the body
    #[inline]
    pub fn get(&mut self) -> P::Output<&C::Yield> {
        P::output(self.raw_get())
    }

    /// iterate over the remaining values
    ///
    /// the first item is the next value, or the value produced by an eager
    /// start if nothing consumed it yet. items are moved out of the generator.
    pub fn iter(&mut self) -> Iter<'_, C, P> {
        Iter {
            gen: self,
            done: false,
        }
    }

    /// is finished
    #[inline]
    pub fn is_done(&self) -> bool {
        self.handle.state().is_terminal()
    }

    /// get the life cycle state
    #[inline]
    pub fn state(&self) -> State {
        self.handle.state()
    }

    /// drop the suspended body now, the generator becomes empty
    pub fn destroy(&mut self) {
        self.handle.destroy();
    }

    fn raw_resume(&mut self) -> Result<Option<&C::Yield>, Error> {
        if let Some(frame) = self.handle.check()? {
            if !frame.state.is_terminal() {
                advance(frame);
                frame.unread = false;
            }
        }
        self.raw_get()
    }

    fn raw_get(&mut self) -> Result<Option<&C::Yield>, Error> {
        let frame = self.handle.check()?;
        Ok(frame.and_then(|f| match f.state {
            State::Suspended => f.cell.value(),
            _ => None,
        }))
    }

    fn next_item(&mut self) -> Result<Option<C::Yield>, Error> {
        if let Some(frame) = self.handle.check()? {
            if frame.unread {
                frame.unread = false;
            } else if !frame.state.is_terminal() {
                advance(frame);
            }
        }
        let frame = self.handle.check()?;
        Ok(frame.and_then(|f| match f.state {
            State::Suspended => f.cell.take_value(),
            _ => None,
        }))
    }
}

// one resumption step, waits on awaiters until the body yields or returns
fn advance<C, P>(frame: &mut Frame<C, C::Yield, P>)
where
    C: Coroutine<Return = ()>,
    P: Policy,
{
    loop {
        match frame.step() {
            Some(Step::Yield(v)) => {
                frame.cell.set_value(v);
                return;
            }
            Some(Step::Await(awaiter)) => frame.awaiting = Some(awaiter),
            Some(Step::Return(())) => {
                let _ = frame.cell.take_value();
                frame.state = State::Completed;
                return;
            }
            None => return,
        }
    }
}

impl<C: Coroutine, P: Policy> fmt::Debug for Generator<C, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Generator<Yield={}> {{ state: {:?} }}",
            type_name::<C::Yield>(),
            self.handle.state()
        )
    }
}

/// borrowing iterator, see [`Generator::iter`]
///
/// an error is yielded at most once, the iterator is fused after it
pub struct Iter<'a, C: Coroutine, P: Policy> {
    gen: &'a mut Generator<C, P>,
    done: bool,
}

impl<'a, C: Coroutine<Return = ()>, P: Policy> Iterator for Iter<'a, C, P> {
    type Item = P::Item<C::Yield>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let ret = self.gen.next_item();
        self.done = !matches!(ret, Ok(Some(_)));
        P::item(ret)
    }
}

impl<'a, C: Coroutine<Return = ()>, P: Policy> FusedIterator for Iter<'a, C, P> {}

/// owning iterator
pub struct IntoIter<C: Coroutine, P: Policy> {
    gen: Generator<C, P>,
    done: bool,
}

impl<C: Coroutine<Return = ()>, P: Policy> Iterator for IntoIter<C, P> {
    type Item = P::Item<C::Yield>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let ret = self.gen.next_item();
        self.done = !matches!(ret, Ok(Some(_)));
        P::item(ret)
    }
}

impl<C: Coroutine<Return = ()>, P: Policy> FusedIterator for IntoIter<C, P> {}

impl<C: Coroutine<Return = ()>, P: Policy> IntoIterator for Generator<C, P> {
    type Item = P::Item<C::Yield>;
    type IntoIter = IntoIter<C, P>;

    fn into_iter(self) -> IntoIter<C, P> {
        IntoIter {
            gen: self,
            done: false,
        }
    }
}

impl<'a, C: Coroutine<Return = ()>, P: Policy> IntoIterator for &'a mut Generator<C, P> {
    type Item = P::Item<C::Yield>;
    type IntoIter = Iter<'a, C, P>;

    fn into_iter(self) -> Iter<'a, C, P> {
        self.iter()
    }
}
