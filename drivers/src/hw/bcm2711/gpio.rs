//! BCM2711 GPIO register layout.
//!
//! Pure data: where every register family lives inside the GPIO window,
//! how wide each pin's field is, and which bits of each word are backed by
//! a pin. The controller exposes 58 pins, which do not fill a whole number
//! of words in any family, so the last word of every family carries
//! reserved high bits.

use super::PERIPHERAL_BASE;

/// Base physical address of the GPIO controller.
pub const GPIO_BASE: usize = PERIPHERAL_BASE + 0x0020_0000;

/// Size in bytes of one register word.
pub const WORD_SIZE: usize = 4;

/// Highest valid pin index.
pub const PIN_MAX: u8 = 57;

/// Number of pins exposed by the controller.
pub const PIN_COUNT: usize = PIN_MAX as usize + 1;

/// Byte length of the window that covers every register family
/// (`GPIO_PUP_PDN_CNTRL_REG3` is the last register).
pub const GPIO_WINDOW_LEN: usize = 0xF0 + WORD_SIZE;

/// Number of 32-bit words in the GPIO window.
pub const GPIO_WINDOW_WORDS: usize = GPIO_WINDOW_LEN / WORD_SIZE;

/// Bits per pin inside a register family.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldWidth {
    OneBit,
    TwoBit,
    ThreeBit,
}

impl FieldWidth {
    /// Number of bits a pin owns.
    pub const fn bits(self) -> u32 {
        match self {
            FieldWidth::OneBit => 1,
            FieldWidth::TwoBit => 2,
            FieldWidth::ThreeBit => 3,
        }
    }

    /// Number of pins packed into one word.
    ///
    /// 3-bit fields pack 10 per word and leave bits 31:30 unused.
    pub const fn pins_per_word(self) -> u8 {
        match self {
            FieldWidth::OneBit => 32,
            FieldWidth::TwoBit => 16,
            FieldWidth::ThreeBit => 10,
        }
    }

    /// Unshifted mask covering one field.
    pub const fn field_mask(self) -> u32 {
        (1 << self.bits()) - 1
    }
}

/// How software may touch a register family.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    /// Persistent state, read-modify-write.
    ReadWrite,
    /// Strobe: writing 1 acts, writing 0 does nothing, reads are meaningless.
    WriteOnly,
    /// Reflects pin state, writes are ignored by hardware.
    ReadOnly,
    /// Status bits cleared by writing 1.
    WriteOneToClear,
}

/// Functional register groups of the GPIO controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RegisterFamily {
    /// `GPFSEL0`–`GPFSEL5`.
    FunctionSelect,
    /// `GPSET0`–`GPSET1`.
    Set,
    /// `GPCLR0`–`GPCLR1`.
    Clear,
    /// `GPLEV0`–`GPLEV1`.
    Level,
    /// `GPEDS0`–`GPEDS1`.
    EventStatus,
    /// `GPREN0`–`GPREN1`.
    RisingEdge,
    /// `GPFEN0`–`GPFEN1`.
    FallingEdge,
    /// `GPHEN0`–`GPHEN1`.
    HighLevel,
    /// `GPLEN0`–`GPLEN1`.
    LowLevel,
    /// `GPAREN0`–`GPAREN1`.
    AsyncRising,
    /// `GPAFEN0`–`GPAFEN1`.
    AsyncFalling,
    /// `GPIO_PUP_PDN_CNTRL_REG0`–`GPIO_PUP_PDN_CNTRL_REG3`.
    PullConfig,
}

impl RegisterFamily {
    /// Every family, in address order.
    pub const ALL: [RegisterFamily; 12] = [
        RegisterFamily::FunctionSelect,
        RegisterFamily::Set,
        RegisterFamily::Clear,
        RegisterFamily::Level,
        RegisterFamily::EventStatus,
        RegisterFamily::RisingEdge,
        RegisterFamily::FallingEdge,
        RegisterFamily::HighLevel,
        RegisterFamily::LowLevel,
        RegisterFamily::AsyncRising,
        RegisterFamily::AsyncFalling,
        RegisterFamily::PullConfig,
    ];

    /// Number of families.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of the family in [`RegisterFamily::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Static layout of the family.
    pub fn layout(self) -> &'static FamilyLayout {
        &LAYOUT[self as usize]
    }
}

/// Where a family lives and how its words are packed.
#[derive(Debug)]
pub struct FamilyLayout {
    pub family: RegisterFamily,
    /// Byte offset of the first word from [`GPIO_BASE`].
    pub offset: usize,
    pub words: usize,
    pub width: FieldWidth,
    pub access: Access,
    /// Valid bits of every word but the last.
    pub full_mask: u32,
    /// Valid bits of the last word.
    pub last_mask: u32,
}

impl FamilyLayout {
    /// Word index (from the start of the window) of the family's `n`th word.
    pub const fn window_word(&self, n: usize) -> usize {
        self.offset / WORD_SIZE + n
    }

    /// Valid bits of the family's `n`th word.
    pub const fn mask(&self, n: usize) -> u32 {
        if n == self.words - 1 {
            self.last_mask
        } else {
            self.full_mask
        }
    }
}

const ONE_BIT_FULL: u32 = 0xFFFF_FFFF;
// Pins 32..=57, bits 31:26 reserved.
const ONE_BIT_LAST: u32 = 0x03FF_FFFF;

const fn one_bit(family: RegisterFamily, offset: usize, access: Access) -> FamilyLayout {
    FamilyLayout {
        family,
        offset,
        words: 2,
        width: FieldWidth::OneBit,
        access,
        full_mask: ONE_BIT_FULL,
        last_mask: ONE_BIT_LAST,
    }
}

/// Layout table, indexed by `RegisterFamily as usize`.
///
/// Detect-enable offsets follow the BCM2711 peripheral manual.
static LAYOUT: [FamilyLayout; RegisterFamily::COUNT] = [
    FamilyLayout {
        family: RegisterFamily::FunctionSelect,
        offset: 0x00,
        words: 6,
        width: FieldWidth::ThreeBit,
        access: Access::ReadWrite,
        full_mask: 0x3FFF_FFFF,
        // Pins 50..=57, bits 31:24 reserved.
        last_mask: 0x00FF_FFFF,
    },
    one_bit(RegisterFamily::Set, 0x1C, Access::WriteOnly),
    one_bit(RegisterFamily::Clear, 0x28, Access::WriteOnly),
    one_bit(RegisterFamily::Level, 0x34, Access::ReadOnly),
    one_bit(RegisterFamily::EventStatus, 0x40, Access::WriteOneToClear),
    one_bit(RegisterFamily::RisingEdge, 0x4C, Access::ReadWrite),
    one_bit(RegisterFamily::FallingEdge, 0x58, Access::ReadWrite),
    one_bit(RegisterFamily::HighLevel, 0x64, Access::ReadWrite),
    one_bit(RegisterFamily::LowLevel, 0x70, Access::ReadWrite),
    one_bit(RegisterFamily::AsyncRising, 0x7C, Access::ReadWrite),
    one_bit(RegisterFamily::AsyncFalling, 0x88, Access::ReadWrite),
    FamilyLayout {
        family: RegisterFamily::PullConfig,
        offset: 0xE4,
        words: 4,
        width: FieldWidth::TwoBit,
        access: Access::ReadWrite,
        full_mask: 0xFFFF_FFFF,
        // Pins 48..=57, bits 31:20 reserved.
        last_mask: 0x000F_FFFF,
    },
];

/// Family and word number owning a window word, if any.
pub fn family_of_word(word: usize) -> Option<(RegisterFamily, usize)> {
    LAYOUT.iter().find_map(|layout| {
        let first = layout.window_word(0);
        (first..first + layout.words)
            .contains(&word)
            .then(|| (layout.family, word - first))
    })
}

/// GPIO pin function selection.
///
/// Alternate function codes are not sequential.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FuncSelect {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

impl FuncSelect {
    /// Decode a 3-bit function-select field.
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            0b000 => FuncSelect::Input,
            0b001 => FuncSelect::Output,
            0b100 => FuncSelect::Alt0,
            0b101 => FuncSelect::Alt1,
            0b110 => FuncSelect::Alt2,
            0b111 => FuncSelect::Alt3,
            0b011 => FuncSelect::Alt4,
            _ => FuncSelect::Alt5,
        }
    }
}

/// Internal pull resistor setting (`GPIO_PUP_PDN_CNTRL` encoding).
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pull {
    Off = 0b00,
    Up = 0b01,
    Down = 0b10,
}

impl Pull {
    /// Decode a 2-bit pull field; `0b11` is reserved.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits & 0b11 {
            0b00 => Some(Pull::Off),
            0b01 => Some(Pull::Up),
            0b10 => Some(Pull::Down),
            _ => None,
        }
    }
}
