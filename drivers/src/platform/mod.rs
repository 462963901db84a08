//! Platform Abstraction Layer
//!
//! Each supported SoC implements the [`Platform`] trait and provides its
//! GPIO driver. The active platform is chosen with a Cargo feature.
//!
//! # Usage
//!
//! ```
//! use drivers::platform::{CurrentPlatform, Platform};
//!
//! let (base, len) = CurrentPlatform::gpio_window();
//! assert!(base >= CurrentPlatform::memory_map().peripheral_base);
//! assert!(len > 0);
//! ```

/// Platform memory map information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMap {
    /// Start of peripheral region
    pub peripheral_base: usize,
    /// Size of peripheral region
    pub peripheral_size: usize,
}

/// Platform trait - implemented by each supported platform
pub trait Platform {
    /// Platform name for debugging
    fn name() -> &'static str;

    /// Static memory map for this platform
    fn memory_map() -> MemoryMap;

    /// Physical `(base, len)` of the GPIO register window.
    fn gpio_window() -> (usize, usize);
}

// Platform selection based on Cargo features
cfg_if::cfg_if! {
    if #[cfg(feature = "bcm2711")] {
        pub mod bcm2711;
        pub use bcm2711::Bcm2711Platform as CurrentPlatform;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features bcm2711"
        );
    }
}
