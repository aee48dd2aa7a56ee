//! # awaiter
//!
//! external events a body can suspend on
//!
//! a body that started slow work somewhere else (a device copy, a kernel launch,
//! a request on another thread) suspends with `Step::Await`. the driver keeps the
//! awaiter and blocks on it right before it runs the body again, so a caller
//! that resumes several computations round-robin overlaps their waits.
//!

use std::fmt;
use std::sync::mpsc::Receiver;

use crate::rt::BoxError;

/// a pending external event
pub trait Awaiter {
    /// block until the event has completed
    ///
    /// an error is raised as a failure of the waiting body
    fn wait(self: Box<Self>) -> Result<(), BoxError>;
}

/// awaiter that runs a blocking closure, see [`wait_fn`]
pub struct WaitFn<F> {
    f: F,
}

/// wrap a blocking closure as an awaiter
pub fn wait_fn<F>(f: F) -> Box<dyn Awaiter>
where
    F: FnOnce() -> Result<(), BoxError> + 'static,
{
    Box::new(WaitFn { f })
}

impl<F> Awaiter for WaitFn<F>
where
    F: FnOnce() -> Result<(), BoxError>,
{
    fn wait(self: Box<Self>) -> Result<(), BoxError> {
        (self.f)()
    }
}

impl<F> fmt::Debug for WaitFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("WaitFn { .. }")
    }
}

/// completion signal delivered over a channel
///
/// the event is done once a message arrives, a dropped sender is a failure
impl<T> Awaiter for Receiver<T> {
    fn wait(self: Box<Self>) -> Result<(), BoxError> {
        self.recv()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::mpsc::channel;
    use std::thread;

    #[test]
    fn channel_event() {
        let (tx, rx) = channel();
        let h = thread::spawn(move || tx.send(7u32).unwrap());
        let a: Box<dyn Awaiter> = Box::new(rx);
        assert!(a.wait().is_ok());
        h.join().unwrap();
    }

    #[test]
    fn dropped_sender_fails() {
        let (tx, rx) = channel::<()>();
        drop(tx);
        assert!(Box::new(rx).wait().is_err());
    }

    #[test]
    fn closure_event() {
        let a = wait_fn(|| Err("device lost".into()));
        assert_eq!(a.wait().unwrap_err().to_string(), "device lost");
    }
}
