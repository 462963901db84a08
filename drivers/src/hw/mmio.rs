//! Word-addressed access to a mapped register window.
//!
//! Drivers never see raw addresses. A [`Mapper`] turns a physical
//! `(base, len)` window into a [`RegisterBlock`], and every access after
//! that is a word index into the block. Dropping the block releases the
//! mapping.

use alloc::boxed::Box;
use core::fmt;
use core::ptr::{NonNull, read_volatile, write_volatile};

/// Why a register window could not be established.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The memory device could not be opened.
    DeviceOpen,
    /// The mapping call failed or produced a short window.
    Map,
    /// Backing storage for the window could not be reserved.
    Allocation,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MapError::DeviceOpen => "cannot open memory device",
            MapError::Map => "cannot map register window",
            MapError::Allocation => "cannot allocate register window",
        })
    }
}

impl core::error::Error for MapError {}

/// A window of 32-bit device registers.
///
/// `word` is an index in words from the start of the window. Implementors
/// must perform each access as a single volatile 32-bit load or store (or
/// an equivalent model of one).
pub trait RegisterBlock: Send + Sync {
    /// Number of words in the window.
    fn len_words(&self) -> usize;

    /// Read one word.
    fn read_word(&self, word: usize) -> u32;

    /// Write one word.
    fn write_word(&self, word: usize, value: u32);
}

/// Source of register windows.
///
/// A mapper is the only place a physical address is turned into something
/// software can touch.
pub trait Mapper: Send + Sync {
    /// Map `len` bytes of registers starting at physical address `base`.
    fn map(&self, base: usize, len: usize) -> Result<Box<dyn RegisterBlock>, MapError>;
}

/// Register window over memory that is already mapped.
///
/// Does not own the mapping; wrap it in a type that releases the mapping
/// on drop (see `hw::devmem`).
pub struct MmioBlock {
    base: NonNull<u32>,
    words: usize,
}

// SAFETY: the block only performs volatile word accesses to device memory,
// which are valid from any thread.
unsafe impl Send for MmioBlock {}
unsafe impl Sync for MmioBlock {}

impl MmioBlock {
    /// Create a block over `len` bytes starting at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be 4-byte aligned and point to `len` bytes of mapped
    /// device memory that stays mapped for the lifetime of the block.
    pub const unsafe fn new(base: NonNull<u32>, len: usize) -> Self {
        Self {
            base,
            words: len / 4,
        }
    }

    #[inline]
    fn word_ptr(&self, word: usize) -> *mut u32 {
        assert!(word < self.words, "register word {word} outside window");
        // SAFETY: bounds checked above, the window is mapped per `new`.
        unsafe { self.base.as_ptr().add(word) }
    }
}

impl RegisterBlock for MmioBlock {
    fn len_words(&self) -> usize {
        self.words
    }

    #[inline]
    fn read_word(&self, word: usize) -> u32 {
        // SAFETY: `word_ptr` bounds-checks `word` against the window, which
        // `new`'s caller guarantees is mapped and aligned for its lifetime.
        unsafe { read_volatile(self.word_ptr(word)) }
    }

    #[inline]
    fn write_word(&self, word: usize, value: u32) {
        // SAFETY: as for `read_word`.
        unsafe { write_volatile(self.word_ptr(word), value) }
    }
}

impl fmt::Debug for MmioBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MmioBlock")
            .field("base", &self.base)
            .field("words", &self.words)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn mmio_block_reads_back_plain_memory() {
        let mut backing = vec![0u32; 4];
        let base = NonNull::new(backing.as_mut_ptr()).unwrap();
        let block = unsafe { MmioBlock::new(base, 16) };
        assert_eq!(block.len_words(), 4);
        block.write_word(3, 0xDEAD_BEEF);
        assert_eq!(block.read_word(3), 0xDEAD_BEEF);
        assert_eq!(block.read_word(0), 0);
        drop(block);
        assert_eq!(backing[3], 0xDEAD_BEEF);
    }

    #[test]
    #[should_panic(expected = "outside window")]
    fn mmio_block_rejects_out_of_window_word() {
        let mut backing = vec![0u32; 2];
        let base = NonNull::new(backing.as_mut_ptr()).unwrap();
        let block = unsafe { MmioBlock::new(base, 8) };
        block.read_word(2);
    }
}
