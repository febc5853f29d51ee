//! Handshake slot layout and flag protocol.
//!
//! Each direction of the host/device exchange is one shared region of two
//! 32-bit words: `[VALUE]` carries the payload, `[FLAG]` carries the
//! handshake state. The host and the device never interpret the words any
//! other way, so the layout is a handful of constants rather than a struct
//! mapped over the region.
//!
//! Input direction (host -> device):
//!
//! | flag | meaning                          | written by |
//! |------|----------------------------------|------------|
//! | 0    | idle / value acknowledged        | device     |
//! | 1    | value pending dispatch           | host       |
//! | 2    | shutdown requested               | host       |
//!
//! Output direction (device -> host):
//!
//! | flag | meaning                          | written by |
//! |------|----------------------------------|------------|
//! | 0    | idle / result consumed           | host       |
//! | 1    | result ready for collection      | device     |

/// Word index of the payload in a handshake region.
pub const VALUE: usize = 0;

/// Word index of the handshake flag in a handshake region.
pub const FLAG: usize = 1;

/// Number of 32-bit words in a handshake region.
pub const REGION_WORDS: usize = 2;

/// Input direction: no value outstanding; the previous value (if any) has
/// been consumed by the device.
pub const IN_IDLE: i32 = 0;

/// Input direction: a value is written and waiting for the device.
pub const IN_PENDING: i32 = 1;

/// Input direction: the host requests device shutdown. The device drains
/// its stream, emits the terminal marker and stops polling this region.
pub const IN_SHUTDOWN: i32 = 2;

/// Output direction: no result pending; the host may not read the value word.
pub const OUT_IDLE: i32 = 0;

/// Output direction: the device has published a result; the host must copy
/// it out and clear the flag back to [`OUT_IDLE`].
pub const OUT_READY: i32 = 1;

/// Sentinel the device's reader kernel injects into its internal stream
/// when the host requests shutdown; the compute kernel tags the word it
/// produces for this sentinel as the last of the stream.
pub const STREAM_END: i32 = -999;

/// Reserved payload that, like `0`, resets the device's running
/// accumulation back to its seed.
pub const ACC_RESET: i32 = -9999;

/// Seed of the device's running product, mirrored into the output region's
/// value word at host startup.
pub const PRODUCT_SEED: i32 = 1;
