//! BCM2711 GPIO Controller Driver
//!
//! Pin-to-register resolution and masked register access for the 58 GPIO
//! lines of the BCM2711.
//!
//! # Layers
//!
//! - [`resolve`]: pin × register family → word, shift and masks.
//! - [`field`]: read/write of one pin's field inside a shared word.
//! - [`region`]: the mapped register window shared by every line, with one
//!   lock per word.
//! - [`line`]: a requested pin and the operations on it.
//! - [`chip`]: hands out lines and owns the lifetime of the mapping.
//!
//! # Example
//!
//! ```
//! use drivers::platform::bcm2711::gpio::{FuncSelect, GpioChip};
//! use drivers::platform::bcm2711::sim::SimMapper;
//!
//! let chip = GpioChip::new(SimMapper::new());
//! let mut led = chip.request(17)?;
//! led.configure_function(FuncSelect::Output)?;
//! led.write_level(1)?;
//! assert_eq!(led.read_level()?, 1);
//! # Ok::<(), drivers::platform::bcm2711::gpio::GpioError>(())
//! ```

pub mod chip;
pub mod field;
pub mod line;
pub mod region;
pub mod resolve;

pub use crate::hw::bcm2711::gpio::{FieldWidth, FuncSelect, Pull, RegisterFamily};
pub use chip::GpioChip;
#[cfg(feature = "devmem")]
pub use chip::chip;
pub use field::{read_field, write_field};
pub use line::GpioLine;
pub use region::GpioRegion;
pub use resolve::{Pin, ResolvedAddress, resolve};

use crate::hal::gpio::PullMode;
use crate::hw::mmio::MapError;
use core::fmt;

impl From<PullMode> for Pull {
    fn from(mode: PullMode) -> Self {
        match mode {
            PullMode::None => Pull::Off,
            PullMode::Up => Pull::Up,
            PullMode::Down => Pull::Down,
        }
    }
}

/// GPIO errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Pin index outside 0–57.
    BadPin,
    /// The memory device could not be opened.
    DeviceOpenFailed,
    /// Bookkeeping or backing storage could not be allocated.
    AllocationFailed,
    /// The register window could not be mapped, or is too short.
    MapFailed,
    /// The line was released or never requested.
    NullState,
    /// A level write found the pin not configured as an output.
    PinMisconfigured,
    /// A value outside the operation's domain.
    OutOfRange,
    /// Read of a write-only family or write of a read-only one.
    AccessDenied,
}

impl From<MapError> for GpioError {
    fn from(err: MapError) -> Self {
        match err {
            MapError::DeviceOpen => GpioError::DeviceOpenFailed,
            MapError::Map => GpioError::MapFailed,
            MapError::Allocation => GpioError::AllocationFailed,
        }
    }
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GpioError::BadPin => "pin index out of range",
            GpioError::DeviceOpenFailed => "cannot open memory device",
            GpioError::AllocationFailed => "allocation failed",
            GpioError::MapFailed => "cannot map GPIO registers",
            GpioError::NullState => "line is not requested",
            GpioError::PinMisconfigured => "pin is not configured as an output",
            GpioError::OutOfRange => "value out of range",
            GpioError::AccessDenied => "register does not permit this access",
        })
    }
}

impl core::error::Error for GpioError {}
