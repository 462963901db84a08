//! Pin address resolution.
//!
//! For a family packing `G` pins of width `W` into each of its `N` words,
//! pin `p` lives in word `(p / G) mod N` at bit `(p mod G) * W`. The last
//! word of every family is only partly backed by pins and gets the
//! family's narrower mask.

use super::GpioError;
use crate::hw::bcm2711::gpio::{Access, FieldWidth, PIN_MAX, RegisterFamily};

/// A validated pin index (0–57).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pin(u8);

impl Pin {
    pub const fn new(pin: u8) -> Result<Self, GpioError> {
        if pin <= PIN_MAX {
            Ok(Pin(pin))
        } else {
            Err(GpioError::BadPin)
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Resolve this pin in `family`. Cannot fail: the pin is already valid.
    pub fn resolve(self, family: RegisterFamily) -> ResolvedAddress {
        let layout = family.layout();
        let per_word = layout.width.pins_per_word();
        let bank = (self.0 / per_word) as usize % layout.words;
        let shift = (self.0 % per_word) as u32 * layout.width.bits();
        let mask = layout.mask(bank);

        ResolvedAddress {
            family,
            word: WordOffset(layout.window_word(bank)),
            bank,
            shift,
            write_mask: mask,
            read_mask: mask,
        }
    }

    /// Resolve this pin in every family, indexed by `RegisterFamily::index`.
    pub fn resolve_all(self) -> [ResolvedAddress; RegisterFamily::COUNT] {
        RegisterFamily::ALL.map(|family| self.resolve(family))
    }
}

/// Word index inside the GPIO window.
///
/// Only produced by resolution, so it always names a word of the layout
/// table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordOffset(usize);

impl WordOffset {
    pub const fn get(self) -> usize {
        self.0
    }
}

/// Where one pin's field lives for one register family.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    family: RegisterFamily,
    word: WordOffset,
    // Word number within the family, 0 for the lowest pins.
    bank: usize,
    shift: u32,
    write_mask: u32,
    read_mask: u32,
}

impl ResolvedAddress {
    pub const fn family(&self) -> RegisterFamily {
        self.family
    }

    /// Word inside the GPIO window.
    pub const fn word(&self) -> WordOffset {
        self.word
    }

    /// Bit position of the field's least significant bit.
    pub const fn shift(&self) -> u32 {
        self.shift
    }

    /// Bits of the word software may drive.
    pub const fn write_mask(&self) -> u32 {
        self.write_mask
    }

    /// Bits of the word that carry meaning on read.
    pub const fn read_mask(&self) -> u32 {
        self.read_mask
    }

    /// Word number within the family, `(pin / pins_per_word) mod words`.
    pub const fn word_index(&self) -> usize {
        self.bank
    }

    pub fn width(&self) -> FieldWidth {
        self.family.layout().width
    }

    pub fn access(&self) -> Access {
        self.family.layout().access
    }

    /// Whether this is the family's last, narrower-masked word.
    pub fn is_last_word(&self) -> bool {
        self.bank == self.family.layout().words - 1
    }

    /// Bits owned by the pin, in place.
    pub fn field_mask(&self) -> u32 {
        self.width().field_mask() << self.shift
    }
}

/// Resolve `pin` in `family`.
pub fn resolve(pin: u8, family: RegisterFamily) -> Result<ResolvedAddress, GpioError> {
    Ok(Pin::new(pin)?.resolve(family))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::bcm2711::gpio::{GPIO_WINDOW_WORDS, WORD_SIZE};

    fn pins() -> impl Iterator<Item = u8> {
        0..=PIN_MAX
    }

    #[test]
    fn rejects_pins_past_57() {
        for family in RegisterFamily::ALL {
            assert!(resolve(57, family).is_ok());
            assert_eq!(resolve(58, family), Err(GpioError::BadPin));
            assert_eq!(resolve(u8::MAX, family), Err(GpioError::BadPin));
        }
    }

    #[test]
    fn word_index_follows_grouping() {
        for family in RegisterFamily::ALL {
            let layout = family.layout();
            let per_word = layout.width.pins_per_word() as usize;
            for pin in pins() {
                let addr = resolve(pin, family).unwrap();
                assert_eq!(addr.word_index(), (pin as usize / per_word) % layout.words);
                assert_eq!(addr.word().get(), layout.offset / WORD_SIZE + addr.word_index());
                assert!(addr.word().get() < GPIO_WINDOW_WORDS);
            }
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        for family in RegisterFamily::ALL {
            for pin in pins() {
                assert_eq!(resolve(pin, family), resolve(pin, family));
            }
        }
    }

    #[test]
    fn function_select_boundaries() {
        let at = |pin| resolve(pin, RegisterFamily::FunctionSelect).unwrap();

        assert_eq!((at(9).word_index(), at(9).shift()), (0, 27));
        assert_eq!((at(10).word_index(), at(10).shift()), (1, 0));
        assert_eq!((at(49).word_index(), at(49).shift()), (4, 27));
        assert_eq!((at(50).word_index(), at(50).shift()), (5, 0));

        assert_eq!(at(49).write_mask(), 0x3FFF_FFFF);
        assert!(at(50).is_last_word());
        assert_eq!(at(50).write_mask(), 0x00FF_FFFF);
        assert_eq!(at(57).shift(), 21);
    }

    #[test]
    fn one_bit_boundaries() {
        for family in [RegisterFamily::Set, RegisterFamily::Clear, RegisterFamily::Level] {
            let a = resolve(31, family).unwrap();
            assert_eq!((a.word_index(), a.shift(), a.write_mask()), (0, 31, 0xFFFF_FFFF));
            let b = resolve(32, family).unwrap();
            assert_eq!((b.word_index(), b.shift(), b.write_mask()), (1, 0, 0x03FF_FFFF));
            assert!(b.is_last_word());
        }
        let set = resolve(17, RegisterFamily::Set).unwrap();
        assert_eq!(set.word().get(), 0x1C / WORD_SIZE);
    }

    #[test]
    fn pull_config_boundaries() {
        let a = resolve(47, RegisterFamily::PullConfig).unwrap();
        assert_eq!((a.word_index(), a.shift(), a.write_mask()), (2, 30, 0xFFFF_FFFF));
        let b = resolve(48, RegisterFamily::PullConfig).unwrap();
        assert_eq!((b.word_index(), b.shift(), b.write_mask()), (3, 0, 0x000F_FFFF));
        assert_eq!(resolve(57, RegisterFamily::PullConfig).unwrap().shift(), 18);
    }

    #[test]
    fn every_field_fits_its_mask() {
        for family in RegisterFamily::ALL {
            for pin in pins() {
                let addr = resolve(pin, family).unwrap();
                assert_eq!(addr.field_mask() & !addr.write_mask(), 0, "{family:?} pin {pin}");
                assert_eq!(addr.read_mask(), addr.write_mask());
            }
        }
    }

    #[test]
    fn resolve_all_is_indexed_by_family() {
        let pin = Pin::new(23).unwrap();
        let all = pin.resolve_all();
        for family in RegisterFamily::ALL {
            assert_eq!(all[family.index()], pin.resolve(family));
        }
    }
}
