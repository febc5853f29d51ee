//! # axpipe-host
//!
//! The host side of the accelerator pipeline: two handshake channels over
//! the device regions, three worker threads, and the assembly/teardown
//! logic that ties them to the front-end thread.
//!
//! Data flow:
//!
//! ```text
//! front end -> input queue -> dispatch -> input region
//!                                          [device]
//! sink <- result queue <- collection <- output region
//! ```
//!
//! ## Modules
//!
//! - `config` - `HostConfig` (poll intervals, results path)
//! - `channel` - `InputChannel` / `OutputChannel` flag protocol drivers
//! - `dispatch` - input dispatch worker
//! - `collect` - output collection worker
//! - `sink` - result sink worker
//! - `pipeline` - worker spawn, submit surface, ordered teardown

pub mod channel;
pub mod collect;
pub mod config;
pub mod dispatch;
pub mod pipeline;
pub mod sink;

pub use channel::{InputChannel, OutputChannel};
pub use config::HostConfig;
pub use pipeline::Pipeline;
