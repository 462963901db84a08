pub mod gpio;

/// ARM-side peripheral base of the BCM2711 in low-peripheral mode.
pub const PERIPHERAL_BASE: usize = 0xFE00_0000;

/// Size of the peripheral window starting at [`PERIPHERAL_BASE`].
pub const PERIPHERAL_SIZE: usize = 0x0180_0000;
