//! Shared building blocks for the driver crates.
//!
//! - [`sync`]: spinning mutual-exclusion primitives usable without an OS.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod sync;
