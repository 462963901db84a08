//! In-memory model of the BCM2711 GPIO controller.
//!
//! [`SimulatedGpio`] behaves like the register window closely enough for
//! the driver to be exercised without hardware:
//!
//! - Set/Clear writes latch the written word and drive the matching
//!   Level bits high/low.
//! - EventStatus writes clear the bits written as 1.
//! - Level writes are ignored.
//! - Any write touching reserved bits is counted.
//!
//! [`SimMapper`] hands out simulated windows and tracks how many are live.

use crate::hw::bcm2711::gpio::{Access, PIN_MAX, RegisterFamily, WORD_SIZE, family_of_word};
use crate::hw::mmio::{MapError, Mapper, RegisterBlock};
use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use common::sync::SpinLock;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Simulated GPIO register file.
#[derive(Debug)]
pub struct SimulatedGpio {
    words: Box<[AtomicU32]>,
    reserved_writes: AtomicUsize,
}

impl SimulatedGpio {
    /// A register file of `words` words, all zero (the reset state: every
    /// pin an input, no pulls).
    pub fn new(words: usize) -> Result<Self, MapError> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(words)
            .map_err(|_| MapError::Allocation)?;
        storage.extend((0..words).map(|_| AtomicU32::new(0)));
        Ok(Self {
            words: storage.into_boxed_slice(),
            reserved_writes: AtomicUsize::new(0),
        })
    }

    /// Raw word content, without side effects.
    pub fn peek(&self, word: usize) -> u32 {
        self.words[word].load(Ordering::SeqCst)
    }

    /// Overwrite a word without side effects, as the hardware itself might.
    pub fn poke(&self, word: usize, value: u32) {
        self.words[word].store(value, Ordering::SeqCst);
    }

    /// Word `n` of `family`.
    pub fn register(&self, family: RegisterFamily, n: usize) -> u32 {
        self.peek(family.layout().window_word(n))
    }

    /// Drive the external level of `pin`, as seen through the Level family.
    pub fn set_pin_level(&self, pin: u8, high: bool) {
        assert!(pin <= PIN_MAX, "no such pin {pin}");
        let word = RegisterFamily::Level.layout().window_word(pin as usize / 32);
        let bit = 1u32 << (pin % 32);
        if high {
            self.words[word].fetch_or(bit, Ordering::SeqCst);
        } else {
            self.words[word].fetch_and(!bit, Ordering::SeqCst);
        }
    }

    /// Number of writes that set a reserved bit.
    pub fn reserved_writes(&self) -> usize {
        self.reserved_writes.load(Ordering::SeqCst)
    }
}

impl RegisterBlock for SimulatedGpio {
    fn len_words(&self) -> usize {
        self.words.len()
    }

    fn read_word(&self, word: usize) -> u32 {
        self.peek(word)
    }

    fn write_word(&self, word: usize, value: u32) {
        let Some((family, n)) = family_of_word(word) else {
            if value != 0 {
                self.reserved_writes.fetch_add(1, Ordering::SeqCst);
            }
            self.poke(word, value);
            return;
        };

        let layout = family.layout();
        let mask = layout.mask(n);
        if value & !mask != 0 {
            self.reserved_writes.fetch_add(1, Ordering::SeqCst);
        }

        let level = RegisterFamily::Level.layout().window_word(n);
        match (family, layout.access) {
            (RegisterFamily::Set, _) => {
                self.poke(word, value);
                self.words[level].fetch_or(value & mask, Ordering::SeqCst);
            }
            (RegisterFamily::Clear, _) => {
                self.poke(word, value);
                self.words[level].fetch_and(!(value & mask), Ordering::SeqCst);
            }
            (_, Access::ReadOnly) => {}
            (_, Access::WriteOneToClear) => {
                self.words[word].fetch_and(!value, Ordering::SeqCst);
            }
            _ => self.poke(word, value),
        }
    }
}

/// Window returned by [`SimMapper`]; decrements the live count on drop.
struct SimWindow {
    regs: Arc<SimulatedGpio>,
    live: Arc<AtomicUsize>,
}

impl RegisterBlock for SimWindow {
    fn len_words(&self) -> usize {
        self.regs.len_words()
    }

    fn read_word(&self, word: usize) -> u32 {
        self.regs.read_word(word)
    }

    fn write_word(&self, word: usize, value: u32) {
        self.regs.write_word(word, value)
    }
}

impl Drop for SimWindow {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// [`Mapper`] producing [`SimulatedGpio`] windows.
#[derive(Debug, Default)]
pub struct SimMapper {
    live: Arc<AtomicUsize>,
    maps: AtomicUsize,
    peak: AtomicUsize,
    fail_next: SpinLock<Option<MapError>>,
    last: SpinLock<Option<Arc<SimulatedGpio>>>,
}

impl SimMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `map` call fail with `err`.
    pub fn fail_next(&self, err: MapError) {
        *self.fail_next.lock() = Some(err);
    }

    /// Windows mapped and not yet released.
    pub fn live_mappings(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Most windows ever live at the same time.
    pub fn peak_mappings(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Successful `map` calls so far.
    pub fn total_mappings(&self) -> usize {
        self.maps.load(Ordering::SeqCst)
    }

    /// Register file behind the most recent window, for inspection.
    pub fn last_window(&self) -> Option<Arc<SimulatedGpio>> {
        self.last.lock().clone()
    }
}

impl Mapper for SimMapper {
    fn map(&self, _base: usize, len: usize) -> Result<Box<dyn RegisterBlock>, MapError> {
        if let Some(err) = self.fail_next.lock().take() {
            return Err(err);
        }
        let regs = Arc::new(SimulatedGpio::new(len / WORD_SIZE)?);
        *self.last.lock() = Some(Arc::clone(&regs));
        self.maps.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(live, Ordering::SeqCst);
        Ok(Box::new(SimWindow {
            regs,
            live: Arc::clone(&self.live),
        }))
    }
}
