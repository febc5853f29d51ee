//! Pipeline assembly and ordered teardown.
//!
//! The topology is static: one front-end thread (the caller) plus the
//! three workers, created once at startup and joined once at shutdown in a
//! fixed order - dispatch first (it signals the device and joins the
//! reader kernel), then collection (it drains the raced result and joins
//! the writer kernel), then the sink (it drains the result queue).

use std::sync::Arc;
use std::thread::JoinHandle;

use axpipe_core::herror;
use axpipe_core::hinfo;
use axpipe_core::queue::{WakeAll, WorkQueue};
use axpipe_core::region::DeviceSession;
use axpipe_core::stop::{ShutdownCoordinator, StopFlag};
use axpipe_core::HostResult;

use crate::channel::{InputChannel, OutputChannel};
use crate::collect::spawn_collect;
use crate::config::HostConfig;
use crate::dispatch::spawn_dispatch;
use crate::sink::spawn_sink;

/// Handle to the running pipeline.
///
/// `submit` is the only steady-state surface; everything else happens at
/// construction or inside the consuming [`Pipeline::shutdown`].
pub struct Pipeline {
    inputs: Arc<WorkQueue<i32>>,
    coordinator: ShutdownCoordinator,
    dispatch: Option<JoinHandle<()>>,
    collect: Option<JoinHandle<()>>,
    sink: Option<JoinHandle<()>>,
}

impl Pipeline {
    /// Wire the queues, channels and workers over a device session.
    pub fn launch(session: DeviceSession, config: &HostConfig) -> HostResult<Self> {
        let stop = Arc::new(StopFlag::new());
        let inputs: Arc<WorkQueue<i32>> = Arc::new(WorkQueue::new());
        let results: Arc<WorkQueue<i32>> = Arc::new(WorkQueue::new());

        let mut coordinator = ShutdownCoordinator::new(Arc::clone(&stop));
        coordinator.register(Arc::clone(&inputs) as Arc<dyn WakeAll>);
        coordinator.register(Arc::clone(&results) as Arc<dyn WakeAll>);

        let input_channel =
            InputChannel::new(session.input, session.reader, config.ack_poll_interval)?;
        let output_channel = OutputChannel::new(session.output, session.writer)?;

        let dispatch = spawn_dispatch(Arc::clone(&stop), Arc::clone(&inputs), input_channel)?;
        let collect = spawn_collect(
            Arc::clone(&stop),
            Arc::clone(&results),
            output_channel,
            config.result_poll_interval,
        )?;
        let sink = spawn_sink(stop, results, config.results_path.clone())?;

        hinfo!("pipeline: workers running");
        Ok(Self {
            inputs,
            coordinator,
            dispatch: Some(dispatch),
            collect: Some(collect),
            sink: Some(sink),
        })
    }

    /// Enqueue one value for dispatch. Never blocks.
    pub fn submit(&self, value: i32) {
        self.inputs.push(value);
    }

    /// Set the stop flag and wake every blocked worker. Idempotent; also
    /// invoked by [`Pipeline::shutdown`].
    pub fn request_stop(&self) {
        self.coordinator.request_stop();
    }

    /// Stop the pipeline and join the workers in teardown order.
    ///
    /// Worker panics are reported, not propagated - by this point the
    /// process is exiting and the remaining joins still need to run.
    pub fn shutdown(mut self) -> HostResult<()> {
        self.coordinator.request_stop();

        join_worker(self.dispatch.take(), "dispatch");
        join_worker(self.collect.take(), "collect");
        join_worker(self.sink.take(), "sink");

        hinfo!("pipeline: all workers joined");
        Ok(())
    }
}

fn join_worker(handle: Option<JoinHandle<()>>, name: &str) {
    if let Some(handle) = handle {
        if handle.join().is_err() {
            herror!("pipeline: {} worker panicked", name);
        }
    }
}
