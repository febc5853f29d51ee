//! Output collection worker.
//!
//! Polls the output channel at a fixed interval - the device has no way to
//! push or interrupt, so polling is the only option. A found result goes
//! straight onto the result queue (no sleep before the next poll); an
//! empty poll sleeps the interval. The stop flag is checked once per
//! iteration, never mid-sleep.
//!
//! After the loop exits, exactly one more collection attempt runs to
//! capture a result produced concurrently with the stop signal, then the
//! writer kernel is joined.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use axpipe_core::hdebug;
use axpipe_core::herror;
use axpipe_core::queue::WorkQueue;
use axpipe_core::stop::StopFlag;
use axpipe_core::{HostError, HostResult};

use crate::channel::OutputChannel;

pub const THREAD_NAME: &str = "axp-collect";

/// Spawn the collection worker.
pub fn spawn_collect(
    stop: Arc<StopFlag>,
    results: Arc<WorkQueue<i32>>,
    channel: OutputChannel,
    poll_interval: Duration,
) -> HostResult<JoinHandle<()>> {
    thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || collect_loop(&stop, &results, channel, poll_interval))
        .map_err(HostError::Spawn)
}

fn collect_loop(
    stop: &StopFlag,
    results: &WorkQueue<i32>,
    mut channel: OutputChannel,
    poll_interval: Duration,
) {
    while !stop.is_set() {
        match channel.try_collect() {
            Ok(Some(value)) => {
                hdebug!("collect: result {}", value);
                results.push(value);
            }
            Ok(None) => thread::sleep(poll_interval),
            Err(e) => {
                // Next iteration retries; the poll loop is the retry.
                herror!("collect: poll failed: {}", e);
                thread::sleep(poll_interval);
            }
        }
    }

    match channel.drain_final() {
        Ok(Some(value)) => {
            hdebug!("collect: final result {}", value);
            results.push(value);
        }
        Ok(None) => {}
        Err(e) => herror!("collect: final drain failed: {}", e),
    }
}
