//! POSIX shared-memory handshake regions (unix only).
//!
//! Backs each handshake direction with a named shm object so an
//! out-of-process device can service the protocol. The host creates (or
//! reuses) the objects, sizes them to two words, and maps them; every word
//! access is a volatile load or store - the device writes concurrently and
//! nothing here is cached by agreement with the compiler.
//!
//! Object names are derived from the CLI's device identifiers:
//! `/axpipe-<binary>-<index>-in` and `/axpipe-<binary>-<index>-out`.
//!
//! A real kernel run handle does not exist for an external process; the
//! reader-side handle instead waits for the device to acknowledge shutdown
//! by clearing flag 2 back to 0, which the device does after draining its
//! stream. The writer side has nothing observable to join.

use std::num::NonZeroUsize;
use std::os::fd::OwnedFd;
use std::ptr::NonNull;
use std::thread;
use std::time::Duration;

use libc::c_void;
use nix::fcntl::OFlag;
use nix::sys::mman::{mmap, munmap, shm_open, shm_unlink, MapFlags, ProtFlags};
use nix::sys::stat::Mode;
use nix::unistd::ftruncate;

use axpipe_core::error::{DeviceError, DeviceResult};
use axpipe_core::region::{DeviceSession, HandshakeRegion, KernelRun};
use axpipe_core::slot::{FLAG, IN_SHUTDOWN, REGION_WORDS};

const REGION_BYTES: usize = REGION_WORDS * std::mem::size_of::<i32>();

/// A handshake region mapped from a named POSIX shm object.
pub struct ShmRegion {
    ptr: NonNull<c_void>,
    view: [i32; REGION_WORDS],
    name: String,
    /// Unlink the object on drop. Only one mapping per object owns it.
    owner: bool,
}

// Safety: the mapping is private to this struct, the host-side view is
// single-owner, and all shared-word traffic goes through volatile ops.
// The device is the only concurrent writer.
unsafe impl Send for ShmRegion {}

impl ShmRegion {
    /// Create-or-attach the named object, size it, and map it.
    pub fn open(name: &str, owner: bool) -> DeviceResult<Self> {
        let fd: OwnedFd = shm_open(
            name,
            OFlag::O_CREAT | OFlag::O_RDWR,
            Mode::S_IRUSR | Mode::S_IWUSR,
        )
        .map_err(|e| DeviceError::Setup(format!("shm_open {}: {}", name, e)))?;

        ftruncate(&fd, REGION_BYTES as libc::off_t)
            .map_err(|e| DeviceError::Setup(format!("ftruncate {}: {}", name, e)))?;

        let len = NonZeroUsize::new(REGION_BYTES)
            .ok_or_else(|| DeviceError::Setup("empty region layout".into()))?;

        let ptr = unsafe {
            mmap(
                None,
                len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                &fd,
                0,
            )
        }
        .map_err(|e| DeviceError::Setup(format!("mmap {}: {}", name, e)))?;

        Ok(Self {
            ptr,
            view: [0; REGION_WORDS],
            name: name.to_string(),
            owner,
        })
    }

    #[inline]
    fn word_ptr(&self, idx: usize) -> *mut i32 {
        debug_assert!(idx < REGION_WORDS);
        unsafe { self.ptr.as_ptr().cast::<i32>().add(idx) }
    }
}

impl HandshakeRegion for ShmRegion {
    fn pull(&mut self) -> DeviceResult<()> {
        for idx in 0..REGION_WORDS {
            // Volatile: the device writes these words concurrently.
            self.view[idx] = unsafe { std::ptr::read_volatile(self.word_ptr(idx)) };
        }
        Ok(())
    }

    fn push(&mut self) -> DeviceResult<()> {
        for idx in 0..REGION_WORDS {
            unsafe { std::ptr::write_volatile(self.word_ptr(idx), self.view[idx]) };
        }
        Ok(())
    }

    fn value(&self) -> i32 {
        self.view[axpipe_core::slot::VALUE]
    }

    fn flag(&self) -> i32 {
        self.view[FLAG]
    }

    fn set_value(&mut self, value: i32) {
        self.view[axpipe_core::slot::VALUE] = value;
    }

    fn set_flag(&mut self, flag: i32) {
        self.view[FLAG] = flag;
    }
}

impl Drop for ShmRegion {
    fn drop(&mut self) {
        unsafe {
            let _ = munmap(self.ptr, REGION_BYTES);
        }
        if self.owner {
            let _ = shm_unlink(self.name.as_str());
        }
    }
}

/// Shutdown-acknowledge "join" for the external reader kernel: the device
/// clears flag 2 back to 0 once it has drained and stopped.
struct ShmReaderRun {
    watch: ShmRegion,
    poll: Duration,
    joined: bool,
}

impl KernelRun for ShmReaderRun {
    fn wait(&mut self) -> DeviceResult<()> {
        if self.joined {
            return Err(DeviceError::AlreadyJoined);
        }
        self.joined = true;
        loop {
            self.watch.pull()?;
            if self.watch.flag() != IN_SHUTDOWN {
                return Ok(());
            }
            thread::sleep(self.poll);
        }
    }
}

/// The external writer kernel exposes no completion signal; its results
/// are all collected before the host gets here, so the join is a no-op.
struct ShmWriterRun {
    joined: bool,
}

impl KernelRun for ShmWriterRun {
    fn wait(&mut self) -> DeviceResult<()> {
        if self.joined {
            return Err(DeviceError::AlreadyJoined);
        }
        self.joined = true;
        Ok(())
    }
}

/// Out-of-process device reached through named shm objects.
pub struct ShmDevice;

impl ShmDevice {
    /// Map both handshake regions for the identified device.
    ///
    /// `ack_poll` is the interval at which the reader run handle re-checks
    /// the shutdown acknowledgment.
    pub fn attach(binary: &str, index: u32, ack_poll: Duration) -> DeviceResult<DeviceSession> {
        let in_name = region_name(binary, index, "in");
        let out_name = region_name(binary, index, "out");

        let input = ShmRegion::open(&in_name, true)?;
        let output = ShmRegion::open(&out_name, true)?;
        // Second mapping of the input object, used only to observe the
        // shutdown acknowledgment.
        let watch = ShmRegion::open(&in_name, false)?;

        Ok(DeviceSession {
            input: Box::new(input),
            output: Box::new(output),
            reader: Box::new(ShmReaderRun {
                watch,
                poll: ack_poll,
                joined: false,
            }),
            writer: Box::new(ShmWriterRun { joined: false }),
        })
    }
}

fn region_name(binary: &str, index: u32, dir: &str) -> String {
    format!("/axpipe-{}-{}-{}", binary, index, dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axpipe_core::slot::{IN_PENDING, VALUE};

    #[test]
    fn test_push_pull_round_trip() {
        let name = format!("/axpipe-test-rt-{}", std::process::id());
        let mut writer = ShmRegion::open(&name, true).unwrap();
        let mut reader = ShmRegion::open(&name, false).unwrap();

        writer.set_value(42);
        writer.set_flag(IN_PENDING);
        writer.push().unwrap();

        reader.pull().unwrap();
        assert_eq!(reader.value(), 42);
        assert_eq!(reader.flag(), IN_PENDING);
    }

    #[test]
    fn test_view_is_cached_until_push() {
        let name = format!("/axpipe-test-cache-{}", std::process::id());
        let mut a = ShmRegion::open(&name, true).unwrap();
        let mut b = ShmRegion::open(&name, false).unwrap();

        a.set_value(7);
        // Not pushed yet: b must still see the zeroed object.
        b.pull().unwrap();
        assert_eq!(b.view[VALUE], 0);

        a.push().unwrap();
        b.pull().unwrap();
        assert_eq!(b.value(), 7);
    }
}
