//! GPIO Driver Subsystem
//!
//! Register-level access to the BCM2711 (Raspberry Pi 4) GPIO controller
//! from a process that maps the controller's registers.
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent trait definitions
//! - [`hw`]: Register layouts and mapped-window access
//! - [`platform`]: Platform-specific drivers (SoC level)
//!
//! # Usage Example
//!
//! ```no_run
//! # #[cfg(feature = "devmem")]
//! # fn main() -> Result<(), drivers::platform::bcm2711::gpio::GpioError> {
//! use drivers::hal::gpio::OutputPin;
//! use drivers::platform::bcm2711::gpio::{FuncSelect, chip};
//!
//! let mut led = chip().request_labelled(17, "led")?;
//! led.configure_function(FuncSelect::Output)?;
//! led.set_high()?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "devmem"))]
//! # fn main() {}
//! ```

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod hal;
pub mod hw;
pub mod platform;

// Re-export commonly used types
pub use hal::gpio::{InputPin, OutputPin, PinLevel, PullMode, StatefulOutputPin};
pub use platform::bcm2711::gpio::{GpioChip, GpioError, GpioLine};
