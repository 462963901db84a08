//! A requested GPIO line.

use super::GpioError;
use super::chip::{RegionSlot, release_region};
use super::field::{read_field, write_field};
use super::region::GpioRegion;
use super::resolve::{Pin, ResolvedAddress};
use crate::hal::gpio::{InputPin, OutputPin, PinLevel, StatefulOutputPin};
use crate::hw::bcm2711::gpio::{FuncSelect, Pull, RegisterFamily};
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;
use log::{debug, warn};

/// One GPIO pin bound to the shared register window.
///
/// Register addresses are resolved once, when the line is requested, and
/// never change. The line keeps the window mapped until it is released
/// or dropped; after [`GpioLine::release`] every operation fails with
/// [`GpioError::NullState`].
pub struct GpioLine {
    pin: Pin,
    label: String,
    addrs: [ResolvedAddress; RegisterFamily::COUNT],
    region: Option<Arc<GpioRegion>>,
    slot: Arc<RegionSlot>,
    requested: Option<FuncSelect>,
}

impl GpioLine {
    pub(super) fn new(
        pin: Pin,
        label: String,
        region: Arc<GpioRegion>,
        slot: Arc<RegionSlot>,
    ) -> Self {
        debug!("gpio: line {} requested as {label:?}", pin.get());
        Self {
            pin,
            label,
            addrs: pin.resolve_all(),
            region: Some(region),
            slot,
            requested: None,
        }
    }

    pub fn pin(&self) -> u8 {
        self.pin.get()
    }

    /// Consumer name given at request time.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Resolved address of this pin in `family`.
    pub fn address(&self, family: RegisterFamily) -> &ResolvedAddress {
        &self.addrs[family.index()]
    }

    /// Whether the line still holds the register window.
    pub fn is_requested(&self) -> bool {
        self.region.is_some()
    }

    /// Last function set through this line. Not authoritative: other code
    /// may reconfigure the pin behind the line's back.
    pub fn requested_function(&self) -> Option<FuncSelect> {
        self.requested
    }

    fn region(&self) -> Result<&GpioRegion, GpioError> {
        self.region.as_deref().ok_or(GpioError::NullState)
    }

    fn read_reg(&self, family: RegisterFamily) -> Result<u32, GpioError> {
        read_field(self.region()?, self.address(family))
    }

    fn write_reg(&self, family: RegisterFamily, value: u32) -> Result<(), GpioError> {
        write_field(self.region()?, self.address(family), value)
    }

    /// Select the pin's function.
    pub fn configure_function(&mut self, func: FuncSelect) -> Result<(), GpioError> {
        self.write_reg(RegisterFamily::FunctionSelect, func as u32)?;
        self.requested = Some(func);
        Ok(())
    }

    /// Function currently selected in hardware.
    pub fn function(&self) -> Result<FuncSelect, GpioError> {
        self.read_reg(RegisterFamily::FunctionSelect)
            .map(FuncSelect::from_bits)
    }

    /// Drive the pin high (`1`) or low (`0`).
    ///
    /// The live function-select field is checked on every call, so the
    /// write is refused with [`GpioError::PinMisconfigured`] if the pin is
    /// not an output right now. Exactly one of the Set or Clear strobes is
    /// written.
    pub fn write_level(&mut self, value: u8) -> Result<(), GpioError> {
        let strobe = match value {
            0 => RegisterFamily::Clear,
            1 => RegisterFamily::Set,
            _ => return Err(GpioError::OutOfRange),
        };
        let func = self.function()?;
        if func != FuncSelect::Output {
            warn!("gpio: line {} write refused, function is {func:?}", self.pin());
            return Err(GpioError::PinMisconfigured);
        }
        self.write_reg(strobe, 1)
    }

    /// Sampled level of the pin, `0` or `1`.
    pub fn read_level(&self) -> Result<u8, GpioError> {
        self.read_reg(RegisterFamily::Level).map(|bit| bit as u8)
    }

    /// Configure the internal pull resistor.
    pub fn set_pull(&mut self, pull: impl Into<Pull>) -> Result<(), GpioError> {
        self.write_reg(RegisterFamily::PullConfig, pull.into() as u32)
    }

    /// Pull resistor currently configured in hardware.
    pub fn pull(&self) -> Result<Pull, GpioError> {
        Pull::from_bits(self.read_reg(RegisterFamily::PullConfig)?).ok_or(GpioError::OutOfRange)
    }

    /// Give the register window back. Idempotent.
    ///
    /// The window is unmapped once no line holds it.
    pub fn release(&mut self) {
        if let Some(region) = self.region.take() {
            release_region(&self.slot, region);
            debug!("gpio: line {} released", self.pin());
        }
    }
}

impl Drop for GpioLine {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for GpioLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpioLine")
            .field("pin", &self.pin())
            .field("label", &self.label)
            .field("requested", &self.is_requested())
            .finish()
    }
}

impl InputPin for GpioLine {
    type Error = GpioError;

    fn read(&self) -> Result<PinLevel, Self::Error> {
        self.read_level().map(|bit| PinLevel::from(bit != 0))
    }
}

impl OutputPin for GpioLine {
    type Error = GpioError;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write_level(1)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write_level(0)
    }
}

impl StatefulOutputPin for GpioLine {
    fn read(&self) -> Result<PinLevel, Self::Error> {
        <Self as InputPin>::read(self)
    }
}
