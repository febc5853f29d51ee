//! # axpipe-core
//!
//! Core types and traits for the axpipe accelerator host.
//!
//! This crate is device-agnostic: it defines the handshake slot layout and
//! flag protocol, the thread-safe work queue, the shutdown primitives, and
//! the traits a device backend must implement. The backends themselves live
//! in `axpipe-device`; the worker threads that drive them live in
//! `axpipe-host`.
//!
//! ## Modules
//!
//! - `slot` - handshake slot layout, flag codes, stream sentinels
//! - `region` - `HandshakeRegion` / `KernelRun` device traits
//! - `queue` - `WorkQueue`, the mutex/condvar FIFO between workers
//! - `stop` - `StopFlag` and `ShutdownCoordinator`
//! - `error` - error types
//! - `hlog` - leveled stderr logging macros
//! - `env` - environment variable utilities

pub mod env;
pub mod error;
pub mod hlog;
pub mod queue;
pub mod region;
pub mod slot;
pub mod stop;

// Re-exports for convenience
pub use error::{DeviceError, DeviceResult, HostError, HostResult};
pub use queue::{WakeAll, WorkQueue};
pub use region::{DeviceSession, HandshakeRegion, KernelRun};
pub use stop::{ShutdownCoordinator, StopFlag};
