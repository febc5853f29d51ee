//! In-process simulated accelerator.
//!
//! Reproduces the device side of the handshake protocol with three threads
//! wired together by lock-free streams, the way the hardware wires its
//! kernels together with AXI streams:
//!
//! ```text
//! input region -> [reader] -> stream -> [compute] -> stream -> [writer] -> output region
//! ```
//!
//! - *reader* polls the input region: flag 1 streams the value and acks the
//!   flag back to 0; flag 2 streams the terminal marker, acks, and stops.
//! - *compute* keeps a running product (seeded 1). Payload `0` or
//!   [`ACC_RESET`] resets the product; anything else multiplies into it
//!   (wrapping). The word produced for [`STREAM_END`] is tagged last.
//! - *writer* publishes each product to the output region once the host
//!   has cleared the previous one, and stops after consuming the word
//!   tagged last. The last word itself is shutdown framing, not a result,
//!   and is never published.
//!
//! The host side sees only a [`DeviceSession`]; the region implementations
//! keep an explicit cached view so `pull`/`push` have real copy semantics,
//! matching a mapped device buffer with sync-to/sync-from operations.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_queue::SegQueue;

use axpipe_core::error::{DeviceError, DeviceResult};
use axpipe_core::region::{DeviceSession, HandshakeRegion, KernelRun};
use axpipe_core::slot::{
    ACC_RESET, IN_IDLE, IN_PENDING, IN_SHUTDOWN, OUT_IDLE, OUT_READY, PRODUCT_SEED, REGION_WORDS,
    STREAM_END,
};

/// Device-side poll granularity. Much finer than the host's poll interval
/// so the simulated round trip is dominated by the host, not the device.
const DEVICE_POLL: Duration = Duration::from_micros(200);

/// One word on the device's internal stream.
#[derive(Debug, Clone, Copy)]
struct StreamWord {
    data: i32,
    last: bool,
}

/// Backing store for one simulated handshake region.
struct RegionStore {
    words: [AtomicI32; REGION_WORDS],
}

impl RegionStore {
    fn new() -> Self {
        Self {
            words: [AtomicI32::new(0), AtomicI32::new(0)],
        }
    }

    fn load(&self, idx: usize) -> i32 {
        self.words[idx].load(Ordering::SeqCst)
    }

    fn store(&self, idx: usize, value: i32) {
        self.words[idx].store(value, Ordering::SeqCst);
    }
}

/// Host-side view of a simulated region.
///
/// `pull`/`push` copy between the shared store and a private cache, so a
/// host write is not device-visible until pushed - same contract as a real
/// mapped buffer.
struct SimRegion {
    store: Arc<RegionStore>,
    view: [i32; REGION_WORDS],
}

impl SimRegion {
    fn new(store: Arc<RegionStore>) -> Self {
        Self {
            store,
            view: [0; REGION_WORDS],
        }
    }
}

impl HandshakeRegion for SimRegion {
    fn pull(&mut self) -> DeviceResult<()> {
        for (idx, word) in self.view.iter_mut().enumerate() {
            *word = self.store.load(idx);
        }
        Ok(())
    }

    fn push(&mut self) -> DeviceResult<()> {
        for (idx, word) in self.view.iter().enumerate() {
            self.store.store(idx, *word);
        }
        Ok(())
    }

    fn value(&self) -> i32 {
        self.view[axpipe_core::slot::VALUE]
    }

    fn flag(&self) -> i32 {
        self.view[axpipe_core::slot::FLAG]
    }

    fn set_value(&mut self, value: i32) {
        self.view[axpipe_core::slot::VALUE] = value;
    }

    fn set_flag(&mut self, flag: i32) {
        self.view[axpipe_core::slot::FLAG] = flag;
    }
}

/// Run handle over one or more simulated kernel threads.
struct SimRun {
    handles: Vec<JoinHandle<()>>,
}

impl KernelRun for SimRun {
    fn wait(&mut self) -> DeviceResult<()> {
        if self.handles.is_empty() {
            return Err(DeviceError::AlreadyJoined);
        }
        for handle in self.handles.drain(..) {
            handle.join().map_err(|_| DeviceError::KernelFailed)?;
        }
        Ok(())
    }
}

/// The simulated accelerator.
pub struct SimDevice;

impl SimDevice {
    /// Launch the three kernel threads and hand back the session the host
    /// pipeline runs against.
    pub fn launch() -> DeviceResult<DeviceSession> {
        let in_store = Arc::new(RegionStore::new());
        let out_store = Arc::new(RegionStore::new());

        let to_compute: Arc<SegQueue<StreamWord>> = Arc::new(SegQueue::new());
        let to_writer: Arc<SegQueue<StreamWord>> = Arc::new(SegQueue::new());

        let reader = spawn_kernel("axp-sim-reader", {
            let store = Arc::clone(&in_store);
            let stream = Arc::clone(&to_compute);
            move || reader_kernel(&store, &stream)
        })?;

        let compute = spawn_kernel("axp-sim-compute", {
            let input = Arc::clone(&to_compute);
            let output = Arc::clone(&to_writer);
            move || compute_kernel(&input, &output)
        })?;

        let writer = spawn_kernel("axp-sim-writer", {
            let store = Arc::clone(&out_store);
            let stream = Arc::clone(&to_writer);
            move || writer_kernel(&store, &stream)
        })?;

        Ok(DeviceSession {
            input: Box::new(SimRegion::new(in_store)),
            output: Box::new(SimRegion::new(out_store)),
            reader: Box::new(SimRun {
                handles: vec![reader],
            }),
            // The compute kernel finishes strictly before the writer (it
            // feeds it), so both join behind the writer's run handle.
            writer: Box::new(SimRun {
                handles: vec![compute, writer],
            }),
        })
    }
}

fn spawn_kernel<F>(name: &str, body: F) -> DeviceResult<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(body)
        .map_err(|e| DeviceError::Setup(format!("spawn {}: {}", name, e)))
}

/// Polls the input region; streams accepted values, acks each by clearing
/// the flag, and stops after streaming the terminal marker for flag 2.
fn reader_kernel(store: &RegionStore, stream: &SegQueue<StreamWord>) {
    loop {
        match store.load(axpipe_core::slot::FLAG) {
            IN_SHUTDOWN => {
                stream.push(StreamWord {
                    data: STREAM_END,
                    last: false,
                });
                store.store(axpipe_core::slot::FLAG, IN_IDLE);
                return;
            }
            IN_PENDING => {
                let value = store.load(axpipe_core::slot::VALUE);
                stream.push(StreamWord { data: value, last: false });
                store.store(axpipe_core::slot::FLAG, IN_IDLE);
            }
            _ => thread::sleep(DEVICE_POLL),
        }
    }
}

/// Free-running accumulator between the two streams.
fn compute_kernel(input: &SegQueue<StreamWord>, output: &SegQueue<StreamWord>) {
    let mut product: i32 = PRODUCT_SEED;
    loop {
        let Some(word) = input.pop() else {
            thread::sleep(DEVICE_POLL);
            continue;
        };

        let last = word.data == STREAM_END;
        if word.data == 0 || word.data == ACC_RESET {
            product = PRODUCT_SEED;
        } else if !last {
            product = product.wrapping_mul(word.data);
        }

        output.push(StreamWord {
            data: product,
            last,
        });
        if last {
            return;
        }
    }
}

/// Publishes stream words to the output region, one at a time, waiting for
/// the host to consume each before the next. The word tagged last is
/// termination framing and is dropped, not published.
fn writer_kernel(store: &RegionStore, stream: &SegQueue<StreamWord>) {
    loop {
        let Some(word) = stream.pop() else {
            thread::sleep(DEVICE_POLL);
            continue;
        };
        if word.last {
            return;
        }

        while store.load(axpipe_core::slot::FLAG) != OUT_IDLE {
            thread::sleep(DEVICE_POLL);
        }
        store.store(axpipe_core::slot::VALUE, word.data);
        store.store(axpipe_core::slot::FLAG, OUT_READY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit_raw(region: &mut dyn HandshakeRegion, value: i32) {
        region.set_value(value);
        region.set_flag(IN_PENDING);
        region.push().unwrap();
        loop {
            region.pull().unwrap();
            if region.flag() == IN_IDLE {
                return;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn collect_raw(region: &mut dyn HandshakeRegion) -> i32 {
        loop {
            region.pull().unwrap();
            if region.flag() == OUT_READY {
                let value = region.value();
                region.set_flag(OUT_IDLE);
                region.push().unwrap();
                return value;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_running_product_with_reset() {
        let mut session = SimDevice::launch().unwrap();

        let mut results = Vec::new();
        for value in [3, 4, 0, 5] {
            submit_raw(session.input.as_mut(), value);
            results.push(collect_raw(session.output.as_mut()));
        }
        assert_eq!(results, vec![3, 12, 1, 5]);

        session.input.set_flag(IN_SHUTDOWN);
        session.input.push().unwrap();
        session.reader.wait().unwrap();
        session.writer.wait().unwrap();
    }

    #[test]
    fn test_shutdown_without_inputs() {
        let mut session = SimDevice::launch().unwrap();

        session.input.set_flag(IN_SHUTDOWN);
        session.input.push().unwrap();
        session.reader.wait().unwrap();
        session.writer.wait().unwrap();

        // Terminal framing never reaches the output region.
        session.output.pull().unwrap();
        assert_eq!(session.output.flag(), OUT_IDLE);
    }

    #[test]
    fn test_acc_reset_sentinel() {
        let mut session = SimDevice::launch().unwrap();

        submit_raw(session.input.as_mut(), 7);
        assert_eq!(collect_raw(session.output.as_mut()), 7);
        submit_raw(session.input.as_mut(), ACC_RESET);
        assert_eq!(collect_raw(session.output.as_mut()), 1);
        submit_raw(session.input.as_mut(), 6);
        assert_eq!(collect_raw(session.output.as_mut()), 6);

        session.input.set_flag(IN_SHUTDOWN);
        session.input.push().unwrap();
        session.reader.wait().unwrap();
        session.writer.wait().unwrap();
    }

    #[test]
    fn test_run_handle_double_wait() {
        let mut session = SimDevice::launch().unwrap();
        session.input.set_flag(IN_SHUTDOWN);
        session.input.push().unwrap();

        assert!(session.reader.wait().is_ok());
        assert_eq!(session.reader.wait(), Err(DeviceError::AlreadyJoined));
        session.writer.wait().unwrap();
    }
}
