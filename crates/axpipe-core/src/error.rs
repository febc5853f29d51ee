//! Error types for the axpipe host.

use core::fmt;

/// Result type for device backend operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Result type for host pipeline operations
pub type HostResult<T> = Result<T, HostError>;

/// Errors a device backend can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// One-time setup failed (shm object, mapping, kernel launch)
    Setup(String),

    /// A pull/push synchronization failed (errno)
    SyncFailed(i32),

    /// A kernel thread panicked or the device process died
    KernelFailed,

    /// A run handle was waited on twice
    AlreadyJoined,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::Setup(what) => write!(f, "device setup failed: {}", what),
            DeviceError::SyncFailed(errno) => write!(f, "region sync failed (errno {})", errno),
            DeviceError::KernelFailed => write!(f, "device kernel failed"),
            DeviceError::AlreadyJoined => write!(f, "kernel run handle already joined"),
        }
    }
}

impl std::error::Error for DeviceError {}

/// Errors surfaced by the host pipeline
#[derive(Debug)]
pub enum HostError {
    /// The device backend failed underneath a channel operation
    Device(DeviceError),

    /// The durable result store could not be opened or written
    Storage(std::io::Error),

    /// A worker thread could not be spawned
    Spawn(std::io::Error),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Device(e) => write!(f, "device error: {}", e),
            HostError::Storage(e) => write!(f, "storage error: {}", e),
            HostError::Spawn(e) => write!(f, "worker spawn failed: {}", e),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Device(e) => Some(e),
            HostError::Storage(e) => Some(e),
            HostError::Spawn(e) => Some(e),
        }
    }
}

impl From<DeviceError> for HostError {
    fn from(e: DeviceError) -> Self {
        HostError::Device(e)
    }
}

impl From<std::io::Error> for HostError {
    fn from(e: std::io::Error) -> Self {
        HostError::Storage(e)
    }
}
