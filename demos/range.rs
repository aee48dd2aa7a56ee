extern crate stepgen;

use stepgen::{from_fn, BoxError, Coroutine, Generator, Step};

// numbers from begin while below end, fails on a zero step
fn range(begin: f32, end: f32, step: f32) -> Generator<impl Coroutine<Yield = f32, Return = ()>> {
    let mut next = begin;
    let mut checked = false;
    Generator::new(from_fn(move || -> Result<Step<f32, ()>, BoxError> {
        if !checked {
            if step == 0.0 {
                return Err("Step set to 0 in range.".into());
            }
            checked = true;
        }
        if next >= end {
            return Ok(Step::Return(()));
        }
        let v = next;
        next += step;
        Ok(Step::Yield(v))
    }))
}

fn main() {
    for i in range(0.0, 10.0, 0.0) {
        match i {
            Ok(i) => println!("{i}"),
            Err(e) => println!("range failed: {e}"),
        }
    }

    for i in range(0.0, 10.0, 0.99).into_iter().flatten() {
        println!("{i}");
    }

    let sum: Result<f32, _> = range(0.0, 100.0, 0.5).into_iter().sum();
    println!("sum = {:?}", sum);

    let mut g = range(1.0, 10.0, 0.0);
    if let Err(e) = g.resume() {
        println!("first call: {e}");
    }
    if let Err(e) = g.resume() {
        println!("second call: {e}");
    }
}
