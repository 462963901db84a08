//! Line request and release, and the lifetime of the shared mapping.

use super::GpioError;
use super::line::GpioLine;
use super::region::GpioRegion;
use super::resolve::Pin;
use crate::hw::bcm2711::gpio::{GPIO_BASE, GPIO_WINDOW_LEN};
use crate::hw::mmio::Mapper;
use crate::platform::Platform;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use common::sync::SpinLock;

/// Slot holding the live register window, shared by a chip and its lines.
///
/// The window is created and dropped only while the slot is locked, so a
/// request can never map a second window while the last one is being torn
/// down.
pub(super) type RegionSlot = SpinLock<Option<Arc<GpioRegion>>>;

/// Hands out [`GpioLine`]s over one shared register window.
///
/// The window is mapped by the first request and shared by every line
/// requested afterwards. It is unmapped when the last line is released;
/// a later request maps it again.
pub struct GpioChip<M: Mapper> {
    mapper: M,
    base: usize,
    len: usize,
    region: Arc<RegionSlot>,
}

impl<M: Mapper> GpioChip<M> {
    /// Chip over the BCM2711 GPIO window.
    pub fn new(mapper: M) -> Self {
        Self::with_window(mapper, GPIO_BASE, GPIO_WINDOW_LEN)
    }

    /// Chip over the GPIO window reported by platform `P`.
    pub fn for_platform<P: Platform>(mapper: M) -> Self {
        let (base, len) = P::gpio_window();
        Self::with_window(mapper, base, len)
    }

    /// Chip over an explicit physical window.
    pub fn with_window(mapper: M, base: usize, len: usize) -> Self {
        Self {
            mapper,
            base,
            len,
            region: Arc::new(SpinLock::new(None)),
        }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// Whether any line currently holds the window.
    pub fn is_mapped(&self) -> bool {
        self.region.lock().is_some()
    }

    /// Request `pin`, labelled `"GPIO<pin>"`.
    pub fn request(&self, pin: u8) -> Result<GpioLine, GpioError> {
        let pin = Pin::new(pin)?;
        self.request_pin(pin, format!("GPIO{}", pin.get()))
    }

    /// Request `pin` under a consumer name.
    pub fn request_labelled(&self, pin: u8, label: &str) -> Result<GpioLine, GpioError> {
        let pin = Pin::new(pin)?;
        self.request_pin(pin, String::from(label))
    }

    fn request_pin(&self, pin: Pin, label: String) -> Result<GpioLine, GpioError> {
        let region = self.acquire()?;
        Ok(GpioLine::new(pin, label, region, Arc::clone(&self.region)))
    }

    /// Reuse the live window or map a new one.
    ///
    /// The slot stays locked while mapping so concurrent first requests
    /// map exactly once.
    fn acquire(&self) -> Result<Arc<GpioRegion>, GpioError> {
        let mut slot = self.region.lock();
        if let Some(region) = slot.as_ref() {
            return Ok(Arc::clone(region));
        }
        let block = self.mapper.map(self.base, self.len)?;
        let region = Arc::new(GpioRegion::new(block, self.base)?);
        *slot = Some(Arc::clone(&region));
        Ok(region)
    }
}

/// Drop `region` on behalf of a line, unmapping the window if no other
/// line holds it. Runs entirely under the slot lock.
pub(super) fn release_region(slot: &RegionSlot, region: Arc<GpioRegion>) {
    let mut slot = slot.lock();
    drop(region);
    // Only the slot's own reference is left.
    if slot.as_ref().is_some_and(|live| Arc::strong_count(live) == 1) {
        *slot = None;
    }
}

#[cfg(feature = "devmem")]
static DEVMEM_CHIP: spin::Lazy<GpioChip<crate::hw::devmem::DevMem>> =
    spin::Lazy::new(|| GpioChip::new(crate::hw::devmem::DevMem::new()));

/// Process-wide chip mapping the real controller through `/dev/mem`.
///
/// The only way to obtain a `/dev/mem` chip, so every line in the process
/// shares one mapping and one set of word locks.
#[cfg(feature = "devmem")]
pub fn chip() -> &'static GpioChip<crate::hw::devmem::DevMem> {
    &DEVMEM_CHIP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::mmio::MapError;
    use crate::platform::bcm2711::Bcm2711Platform;
    use crate::platform::bcm2711::sim::SimMapper;

    #[test]
    fn lines_share_one_mapping() {
        let chip = GpioChip::new(SimMapper::new());
        let a = chip.request(2).unwrap();
        let b = chip.request(3).unwrap();
        assert_eq!(chip.mapper().total_mappings(), 1);
        assert_eq!(chip.mapper().live_mappings(), 1);
        drop(a);
        assert!(chip.is_mapped());
        drop(b);
        assert!(!chip.is_mapped());
        assert_eq!(chip.mapper().live_mappings(), 0);
    }

    #[test]
    fn remaps_after_full_teardown() {
        let chip = GpioChip::new(SimMapper::new());
        drop(chip.request(4).unwrap());
        let _line = chip.request(4).unwrap();
        assert_eq!(chip.mapper().total_mappings(), 2);
        assert_eq!(chip.mapper().live_mappings(), 1);
    }

    #[test]
    fn bad_pin_never_maps() {
        let chip = GpioChip::new(SimMapper::new());
        assert_eq!(chip.request(58).unwrap_err(), GpioError::BadPin);
        assert_eq!(chip.mapper().total_mappings(), 0);
        assert!(!chip.is_mapped());
    }

    #[test]
    fn mapper_failures_surface_and_roll_back() {
        let chip = GpioChip::new(SimMapper::new());
        for (err, expected) in [
            (MapError::DeviceOpen, GpioError::DeviceOpenFailed),
            (MapError::Map, GpioError::MapFailed),
            (MapError::Allocation, GpioError::AllocationFailed),
        ] {
            chip.mapper().fail_next(err);
            assert_eq!(chip.request(7).unwrap_err(), expected);
            assert!(!chip.is_mapped());
        }
        assert!(chip.request(7).is_ok());
    }

    #[test]
    fn short_window_is_unmapped_on_failure() {
        let chip = GpioChip::with_window(SimMapper::new(), GPIO_BASE, 0x40);
        assert_eq!(chip.request(0).unwrap_err(), GpioError::MapFailed);
        assert_eq!(chip.mapper().total_mappings(), 1);
        assert_eq!(chip.mapper().live_mappings(), 0);
    }

    #[test]
    fn labels() {
        let chip = GpioChip::for_platform::<Bcm2711Platform>(SimMapper::new());
        assert_eq!(chip.request(5).unwrap().label(), "GPIO5");
        assert_eq!(chip.request_labelled(6, "status-led").unwrap().label(), "status-led");
    }
}
