extern crate stepgen;

use stepgen::{BoxError, Coroutine, SingleTask, Step};

// suspends three times before producing the answer
struct SlowFunction {
    i: u32,
}

impl Coroutine for SlowFunction {
    type Yield = ();
    type Return = u32;

    fn step(&mut self) -> Result<Step<(), u32>, BoxError> {
        if self.i < 3 {
            self.i += 1;
            return Ok(Step::Yield(()));
        }
        Ok(Step::Return(42))
    }
}

fn main() {
    let mut task = SingleTask::deferred(SlowFunction { i: 0 });
    while task.resume().is_none() {
        println!("Result not ready");
    }
    println!("Got value: {:?}", task.get());
}
