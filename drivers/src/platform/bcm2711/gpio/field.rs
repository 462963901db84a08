//! Masked access to one pin's field inside a shared register word.

use super::GpioError;
use super::region::GpioRegion;
use super::resolve::ResolvedAddress;
use crate::hw::bcm2711::gpio::Access;
use log::trace;

/// Read the field at `addr`, right-aligned.
///
/// Bits outside the word's read mask are ignored. Write-only (strobe)
/// families have no readable state and fail with
/// [`GpioError::AccessDenied`].
pub fn read_field(region: &GpioRegion, addr: &ResolvedAddress) -> Result<u32, GpioError> {
    if addr.access() == Access::WriteOnly {
        return Err(GpioError::AccessDenied);
    }
    let word = region.read(addr.word()) & addr.read_mask();
    Ok((word & addr.field_mask()) >> addr.shift())
}

/// Write `value` into the field at `addr` without disturbing any other
/// pin in the same word.
///
/// `value` is truncated to the field width. Reserved bits outside the
/// word's write mask are always written as 0.
///
/// - Read-write families are read-modify-written under the word's lock.
/// - Strobe and write-1-to-clear families are written with only this
///   field's bits set: their current content is treated as 0, so other
///   pins see a 0 (no effect).
/// - The read-only family fails with [`GpioError::AccessDenied`].
pub fn write_field(
    region: &GpioRegion,
    addr: &ResolvedAddress,
    value: u32,
) -> Result<(), GpioError> {
    let width_mask = addr.width().field_mask();
    let bits = ((value & width_mask) << addr.shift()) & addr.write_mask();

    match addr.access() {
        Access::ReadOnly => return Err(GpioError::AccessDenied),
        Access::ReadWrite => {
            let keep = !addr.field_mask() & addr.write_mask();
            region.modify(addr.word(), |current| {
                ((current & addr.write_mask()) & keep) | bits
            });
        }
        Access::WriteOnly | Access::WriteOneToClear => region.write(addr.word(), bits),
    }

    trace!(
        "gpio: {:?}[{}] <<{} = {:#x}",
        addr.family(),
        addr.word_index(),
        addr.shift(),
        value & width_mask
    );
    Ok(())
}
