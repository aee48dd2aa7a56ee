extern crate stepgen;

use stepgen::{from_fn, BoxError, SingleTask, Step};

fn main() {
    // a task that never returns, it is simply dropped when no longer needed
    let prefix = "Counter: ";
    let mut i = 0u32;
    let mut counter = SingleTask::new(from_fn(move || -> Result<Step<(), ()>, BoxError> {
        println!("{prefix}{i}");
        i += 1;
        Ok(Step::Yield(()))
    }));

    for _ in 0..3 {
        println!("In main function");
        counter.resume();
    }
    println!("done: {}", counter.is_done());
}
