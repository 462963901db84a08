//! The mapped GPIO register window shared by every line.

use super::GpioError;
use super::resolve::WordOffset;
use crate::hw::bcm2711::gpio::GPIO_WINDOW_WORDS;
use crate::hw::mmio::RegisterBlock;
use alloc::boxed::Box;
use common::sync::SpinLock;
use core::fmt;
use log::debug;

/// Mapped GPIO registers plus one lock per register word.
///
/// Mutations of a word are serialized through that word's lock, so two
/// lines whose pins share a word cannot lose each other's update. Reads do
/// not lock.
pub struct GpioRegion {
    block: Box<dyn RegisterBlock>,
    locks: [SpinLock<()>; GPIO_WINDOW_WORDS],
    base: usize,
}

impl GpioRegion {
    /// Wrap a freshly mapped window whose physical base is `base`.
    ///
    /// Fails with [`GpioError::MapFailed`] when the window is too short to
    /// hold every register family. The block is dropped, and so unmapped,
    /// on failure.
    pub fn new(block: Box<dyn RegisterBlock>, base: usize) -> Result<Self, GpioError> {
        if block.len_words() < GPIO_WINDOW_WORDS {
            return Err(GpioError::MapFailed);
        }
        debug!("gpio: mapped {} register words at {base:#x}", block.len_words());
        Ok(Self {
            block,
            locks: [const { SpinLock::new(()) }; GPIO_WINDOW_WORDS],
            base,
        })
    }

    #[inline]
    pub fn read(&self, word: WordOffset) -> u32 {
        self.block.read_word(word.get())
    }

    /// Store `value` into `word` under the word's lock.
    pub fn write(&self, word: WordOffset, value: u32) {
        let _guard = self.locks[word.get()].lock();
        self.block.write_word(word.get(), value);
    }

    /// Read-modify-write `word` under the word's lock.
    ///
    /// Returns the value written.
    pub fn modify(&self, word: WordOffset, f: impl FnOnce(u32) -> u32) -> u32 {
        let _guard = self.locks[word.get()].lock();
        let value = f(self.block.read_word(word.get()));
        self.block.write_word(word.get(), value);
        value
    }
}

impl Drop for GpioRegion {
    fn drop(&mut self) {
        debug!("gpio: releasing register window at {:#x}", self.base);
    }
}

impl fmt::Debug for GpioRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpioRegion")
            .field("base", &self.base)
            .field("words", &self.block.len_words())
            .finish()
    }
}
