//! Input dispatch worker.
//!
//! Drains the input queue and drives the input channel, one value at a
//! time: `submit` does not return until the device has acknowledged, so at
//! most one value is ever outstanding on the region.
//!
//! Shutdown: a `None` pop means the stop flag was observed. Items still
//! queued at that point are abandoned - only the result side drains.
//! The worker then signals device shutdown and joins the reader kernel
//! before exiting.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use axpipe_core::herror;
use axpipe_core::hdebug;
use axpipe_core::queue::WorkQueue;
use axpipe_core::stop::StopFlag;
use axpipe_core::{HostError, HostResult};

use crate::channel::InputChannel;

pub const THREAD_NAME: &str = "axp-dispatch";

/// Spawn the dispatch worker.
pub fn spawn_dispatch(
    stop: Arc<StopFlag>,
    inputs: Arc<WorkQueue<i32>>,
    channel: InputChannel,
) -> HostResult<JoinHandle<()>> {
    thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || dispatch_loop(&stop, &inputs, channel))
        .map_err(HostError::Spawn)
}

fn dispatch_loop(stop: &StopFlag, inputs: &WorkQueue<i32>, mut channel: InputChannel) {
    while let Some(value) = inputs.pop_wait(stop) {
        hdebug!("dispatch: submitting {}", value);
        if let Err(e) = channel.submit(value) {
            // Local-only failure policy: report and keep the loop alive.
            herror!("dispatch: submit of {} failed: {}", value, e);
        }
    }

    hdebug!("dispatch: stop observed, signaling device shutdown");
    if let Err(e) = channel.shutdown() {
        herror!("dispatch: device shutdown failed: {}", e);
    }
}
