pub mod gpio;
pub mod sim;

use super::{MemoryMap, Platform};
use crate::hw::bcm2711::gpio::{GPIO_BASE, GPIO_WINDOW_LEN};
use crate::hw::bcm2711::{PERIPHERAL_BASE, PERIPHERAL_SIZE};

pub struct Bcm2711Platform;

impl Platform for Bcm2711Platform {
    fn name() -> &'static str {
        "BCM2711 (Raspberry Pi 4)"
    }

    fn memory_map() -> MemoryMap {
        MemoryMap {
            peripheral_base: PERIPHERAL_BASE,
            peripheral_size: PERIPHERAL_SIZE,
        }
    }

    fn gpio_window() -> (usize, usize) {
        (GPIO_BASE, GPIO_WINDOW_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpio_window_sits_inside_peripherals() {
        let map = Bcm2711Platform::memory_map();
        let (base, len) = Bcm2711Platform::gpio_window();
        assert_eq!(base, 0xFE20_0000);
        assert_eq!(len, 0xF4);
        assert!(base >= map.peripheral_base);
        assert!(base + len <= map.peripheral_base + map.peripheral_size);
    }
}
