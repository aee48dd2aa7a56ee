extern crate stepgen;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{channel, Sender};
use std::thread;
use std::time::Duration;

use stepgen::{wait_fn, BoxError, Coroutine, Pipeline, Propagate, SingleTask, Start, Step};

type Request = (u32, Sender<u32>);

// a worker thread standing in for an accelerator: squares its inputs slowly
fn spawn_device() -> (Sender<Request>, thread::JoinHandle<()>) {
    let (tx, rx) = channel::<Request>();
    let h = thread::spawn(move || {
        for (x, reply) in rx {
            thread::sleep(Duration::from_millis(2));
            let _ = reply.send(x * x);
        }
    });
    (tx, h)
}

enum Pc {
    Submit,
    Finish,
}

// offloads the square of its input, then adds one on the host
struct Offload {
    input: u32,
    device: Sender<Request>,
    result: Rc<Cell<Option<u32>>>,
    pc: Pc,
}

impl Offload {
    fn new(input: u32, device: Sender<Request>) -> Self {
        Offload {
            input,
            device,
            result: Rc::new(Cell::new(None)),
            pc: Pc::Submit,
        }
    }
}

impl Coroutine for Offload {
    type Yield = ();
    type Return = u32;

    fn step(&mut self) -> Result<Step<(), u32>, BoxError> {
        match self.pc {
            Pc::Submit => {
                let (tx, rx) = channel();
                self.device
                    .send((self.input, tx))
                    .map_err(|_| "device is gone")?;
                let slot = self.result.clone();
                self.pc = Pc::Finish;
                Ok(Step::Await(wait_fn(move || {
                    slot.set(Some(rx.recv()?));
                    Ok(())
                })))
            }
            Pc::Finish => {
                let squared = self.result.take().ok_or("no result from device")?;
                Ok(Step::Return(squared + 1))
            }
        }
    }
}

fn main() {
    let (device, h) = spawn_device();
    let mut pipeline = Pipeline::<Offload, Propagate>::with_depth(4);

    for input in 0..20 {
        while pipeline.is_full() {
            match pipeline.advance() {
                Ok(Some(v)) => println!("result: {v}"),
                Ok(None) => {}
                Err(e) => println!("task failed: {e}"),
            }
        }
        let task = SingleTask::with_start(Offload::new(input, device.clone()), Start::Eager);
        pipeline.push_back(task);
        println!("submitted {input}, {} in flight of {}", pipeline.len(), pipeline.depth());
    }

    for r in pipeline.drain() {
        match r {
            Ok(v) => println!("result: {v}"),
            Err(e) => println!("task failed: {e}"),
        }
    }

    drop(device);
    h.join().unwrap();
}
