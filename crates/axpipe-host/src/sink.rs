//! Result sink worker.
//!
//! Persists collected results in arrival order: one decimal integer per
//! line, append mode, flushed per item - correctness over throughput.
//!
//! The store is opened once at thread start. If the open fails, the worker
//! reports and exits early; the rest of the pipeline keeps running and
//! results are silently dropped at this stage. That gap is deliberate:
//! storage loss must not take down the device session.
//!
//! Exit condition differs from the dispatch worker: this one drains the
//! queue completely after the stop flag is set, so no collected result is
//! ever lost to shutdown.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use axpipe_core::herror;
use axpipe_core::queue::WorkQueue;
use axpipe_core::stop::StopFlag;
use axpipe_core::{HostError, HostResult};

pub const THREAD_NAME: &str = "axp-sink";

/// Spawn the sink worker.
pub fn spawn_sink(
    stop: Arc<StopFlag>,
    results: Arc<WorkQueue<i32>>,
    path: PathBuf,
) -> HostResult<JoinHandle<()>> {
    thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || sink_loop(&stop, &results, &path))
        .map_err(HostError::Spawn)
}

fn sink_loop(stop: &StopFlag, results: &WorkQueue<i32>, path: &Path) {
    let mut store = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            herror!("sink: cannot open {}: {}", path.display(), e);
            return;
        }
    };

    while let Some(value) = results.pop_drain(stop) {
        if let Err(e) = writeln!(store, "{}", value).and_then(|_| store.flush()) {
            herror!("sink: write of {} failed: {}", value, e);
        }
    }
}
