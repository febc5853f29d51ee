//! # axpipe-device
//!
//! Device backends implementing the `axpipe-core` region and run traits.
//!
//! - [`sim`] - an in-process simulated accelerator: three threads (reader,
//!   compute, writer) connected by lock-free streams, speaking the exact
//!   flag protocol a real device would. Used by tests and the `sim` CLI
//!   backend.
//! - [`shm`] (unix only) - handshake regions backed by POSIX shared memory
//!   objects, for talking to an out-of-process device.

pub mod sim;

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        pub mod shm;
    }
}

pub use sim::SimDevice;
