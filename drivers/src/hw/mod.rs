//! Raw hardware knowledge: register layouts and access to mapped windows.
//!
//! Nothing in here knows about lines or pins as objects; see
//! [`crate::platform`] for the drivers built on top.

pub mod bcm2711;
#[cfg(feature = "devmem")]
pub mod devmem;
pub mod mmio;
