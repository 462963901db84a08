//! `/dev/mem` backed register windows.

use super::mmio::{MapError, Mapper, MmioBlock, RegisterBlock};
use alloc::boxed::Box;
use core::ptr::{self, NonNull};
use log::debug;

/// Maps physical register windows through `/dev/mem`.
///
/// Requires a process with access to `/dev/mem` (usually root).
///
/// Only the crate builds one, for the process-wide chip returned by
/// [`chip`](crate::platform::bcm2711::gpio::chip). A second `/dev/mem`
/// chip would map the controller again behind its own word locks.
///
/// ```compile_fail
/// use drivers::hw::devmem::DevMem;
/// use drivers::platform::bcm2711::gpio::GpioChip;
///
/// let _second = GpioChip::new(DevMem(()));
/// ```
#[derive(Debug)]
pub struct DevMem(());

impl DevMem {
    pub(crate) const fn new() -> Self {
        Self(())
    }
}

/// A live `/dev/mem` mapping; unmapped and closed on drop.
struct DevMemWindow {
    fd: libc::c_int,
    map: *mut libc::c_void,
    map_len: usize,
    block: MmioBlock,
}

// SAFETY: the raw mapping pointer is only used to unmap on drop.
unsafe impl Send for DevMemWindow {}
unsafe impl Sync for DevMemWindow {}

fn page_size() -> usize {
    match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
        n if n > 0 => n as usize,
        _ => 4096,
    }
}

impl Mapper for DevMem {
    fn map(&self, base: usize, len: usize) -> Result<Box<dyn RegisterBlock>, MapError> {
        let fd = unsafe {
            libc::open(
                c"/dev/mem".as_ptr(),
                libc::O_RDWR | libc::O_SYNC | libc::O_CLOEXEC,
            )
        };
        if fd < 0 {
            return Err(MapError::DeviceOpen);
        }

        // mmap offsets must be page aligned.
        let lead = base % page_size();
        let map_len = len + lead;
        let map = unsafe {
            libc::mmap(
                ptr::null_mut(),
                map_len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                (base - lead) as libc::off_t,
            )
        };
        if map == libc::MAP_FAILED {
            unsafe { libc::close(fd) };
            return Err(MapError::Map);
        }

        let Some(start) = NonNull::new(unsafe { map.cast::<u8>().add(lead) }.cast::<u32>()) else {
            unsafe {
                libc::munmap(map, map_len);
                libc::close(fd);
            }
            return Err(MapError::Map);
        };
        debug!("devmem: mapped {len:#x} bytes at {base:#x}");

        // SAFETY: `start` is inside a fresh mapping of `len` bytes that lives
        // as long as the window.
        let block = unsafe { MmioBlock::new(start, len) };
        Ok(Box::new(DevMemWindow {
            fd,
            map,
            map_len,
            block,
        }))
    }
}

impl RegisterBlock for DevMemWindow {
    fn len_words(&self) -> usize {
        self.block.len_words()
    }

    fn read_word(&self, word: usize) -> u32 {
        self.block.read_word(word)
    }

    fn write_word(&self, word: usize, value: u32) {
        self.block.write_word(word, value)
    }
}

impl Drop for DevMemWindow {
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.map, self.map_len);
            libc::close(self.fd);
        }
        debug!("devmem: unmapped {:#x} bytes", self.map_len);
    }
}
