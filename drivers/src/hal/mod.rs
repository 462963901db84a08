//! Hardware Abstraction Layer (HAL) - Platform-Independent Traits
//!
//! This module defines generic traits for interacting with hardware
//! peripherals. Platform drivers implement them so application code can
//! be written without naming a specific SoC.
//!
//! # Available Interfaces
//!
//! - [`gpio`]: General Purpose Input/Output control

pub mod gpio;
