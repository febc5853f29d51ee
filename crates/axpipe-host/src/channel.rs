//! Handshake channels: the flag protocol drivers.
//!
//! One channel per direction, each owned by exactly one worker thread, so
//! neither needs internal locking - the only shared state is the region
//! itself, reached through explicit `pull`/`push` synchronization.
//!
//! The input side is half-duplex request/acknowledge: at most one value is
//! outstanding (flag stays 1 until the device clears it), which is what
//! makes device processing order equal dispatch order end to end.

use std::thread;
use std::time::Duration;

use axpipe_core::region::{HandshakeRegion, KernelRun};
use axpipe_core::slot::{
    IN_IDLE, IN_PENDING, IN_SHUTDOWN, OUT_IDLE, OUT_READY, PRODUCT_SEED,
};
use axpipe_core::HostResult;

/// Host -> device channel. `submit` blocks for the full device round trip.
pub struct InputChannel {
    region: Box<dyn HandshakeRegion>,
    run: Box<dyn KernelRun>,
    ack_poll: Duration,
}

impl InputChannel {
    /// Take ownership of the input region, zero both words and publish the
    /// idle state so the device starts from a known flag.
    pub fn new(
        mut region: Box<dyn HandshakeRegion>,
        run: Box<dyn KernelRun>,
        ack_poll: Duration,
    ) -> HostResult<Self> {
        region.set_value(0);
        region.set_flag(IN_IDLE);
        region.push()?;
        Ok(Self {
            region,
            run,
            ack_poll,
        })
    }

    /// Publish one value and block until the device acknowledges it.
    ///
    /// The acknowledgment wait polls at `ack_poll` with no timeout: an
    /// unresponsive device blocks the dispatch worker indefinitely. Single
    /// caller only - the channel is owned by the dispatch worker.
    pub fn submit(&mut self, value: i32) -> HostResult<()> {
        self.region.set_value(value);
        self.region.set_flag(IN_PENDING);
        self.region.push()?;

        loop {
            self.region.pull()?;
            if self.region.flag() == IN_IDLE {
                return Ok(());
            }
            thread::sleep(self.ack_poll);
        }
    }

    /// Publish the shutdown flag and hard-join the reader kernel.
    ///
    /// Consumes the channel; nothing can be submitted afterwards.
    pub fn shutdown(mut self) -> HostResult<()> {
        self.region.set_flag(IN_SHUTDOWN);
        self.region.push()?;
        self.run.wait()?;
        Ok(())
    }
}

/// Device -> host channel. Non-blocking collection; the caller paces the
/// polling.
pub struct OutputChannel {
    region: Box<dyn HandshakeRegion>,
    run: Box<dyn KernelRun>,
}

impl OutputChannel {
    /// Take ownership of the output region and seed it `{product seed, idle}`.
    pub fn new(
        mut region: Box<dyn HandshakeRegion>,
        run: Box<dyn KernelRun>,
    ) -> HostResult<Self> {
        region.set_value(PRODUCT_SEED);
        region.set_flag(OUT_IDLE);
        region.push()?;
        Ok(Self { region, run })
    }

    /// Pull the region; if a result is ready, copy it out, clear the flag
    /// and publish the clear.
    ///
    /// The flag is cleared strictly after the value is copied, so a result
    /// can never be dropped between read and return.
    pub fn try_collect(&mut self) -> HostResult<Option<i32>> {
        self.region.pull()?;
        if self.region.flag() != OUT_READY {
            return Ok(None);
        }
        let value = self.region.value();
        self.region.set_flag(OUT_IDLE);
        self.region.push()?;
        Ok(Some(value))
    }

    /// One last collection attempt (for a result that raced the stop
    /// signal), then hard-join the writer kernel. Consumes the channel.
    pub fn drain_final(mut self) -> HostResult<Option<i32>> {
        let last = self.try_collect()?;
        self.run.wait()?;
        Ok(last)
    }
}
