//! Device seam: handshake regions and kernel run handles.
//!
//! The device collaborator is opaque to the host. All the host needs from a
//! backend is:
//!
//! - two [`HandshakeRegion`]s, one per direction, with explicit
//!   host<->device synchronization (the device only sees host writes after
//!   `push`, and host reads are only authoritative right after `pull`);
//! - two [`KernelRun`] handles that can be waited on for kernel completion
//!   during teardown.
//!
//! # Implementors
//!
//! - `axpipe_device::sim` - in-process simulated accelerator (tests, demos).
//! - `axpipe_device::shm` - POSIX shared-memory regions for an
//!   out-of-process device (unix only).

use crate::error::DeviceResult;

/// One two-word handshake region shared with the device.
///
/// The region's host-side view is a cache: `value`/`flag` read the cache,
/// `set_value`/`set_flag` write it. `pull` refreshes the cache from device
/// memory, `push` publishes it. This mirrors a mapped device buffer with
/// explicit sync-to/sync-from operations.
///
/// A region has exactly one owner (the worker driving its direction), so
/// implementations need no internal locking of the host-side view.
pub trait HandshakeRegion: Send {
    /// Refresh the host view from device memory.
    fn pull(&mut self) -> DeviceResult<()>;

    /// Publish the host view to device memory.
    fn push(&mut self) -> DeviceResult<()>;

    /// Payload word, as of the last `pull` (or the last host write).
    fn value(&self) -> i32;

    /// Flag word, as of the last `pull` (or the last host write).
    fn flag(&self) -> i32;

    /// Set the payload word in the host view. Not device-visible until `push`.
    fn set_value(&mut self, value: i32);

    /// Set the flag word in the host view. Not device-visible until `push`.
    fn set_flag(&mut self, flag: i32);
}

/// Handle to one running device kernel.
pub trait KernelRun: Send {
    /// Block until the kernel reports completion.
    ///
    /// Called once, during shutdown, after the host has signaled the device
    /// to stop. This is a hard join: there is no poll interval and no
    /// timeout.
    fn wait(&mut self) -> DeviceResult<()>;
}

/// Everything one-time device setup produces: the two handshake regions and
/// the run handles for the kernels that service them.
pub struct DeviceSession {
    /// Host -> device region, serviced by the reader kernel.
    pub input: Box<dyn HandshakeRegion>,
    /// Device -> host region, serviced by the writer kernel.
    pub output: Box<dyn HandshakeRegion>,
    /// Run handle for the kernel polling the input region.
    pub reader: Box<dyn KernelRun>,
    /// Run handle for the kernel publishing to the output region.
    pub writer: Box<dyn KernelRun>,
}
