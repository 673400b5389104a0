use crate::{Error, RomCode};
use core::fmt::Debug;

/// Blocking transaction primitives of a OneWire bus master.
///
/// [`Driver`](crate::Driver) implements this by bit-banging a pin; bridge
/// chips or simulated buses can implement it directly.
pub trait Bus {
    type Error: Debug;

    /// Sends a reset pulse. `Ok(true)` if at least one device answered with a
    /// presence pulse.
    fn reset(&mut self) -> Result<bool, Error<Self::Error>>;

    /// Restarts the enumeration done by [`search`](Bus::search).
    fn reset_search(&mut self);

    /// Finds the next device on the bus, `Ok(None)` once every device has
    /// been reported.
    fn search(&mut self) -> Result<Option<RomCode>, Error<Self::Error>>;

    /// Addresses a single device (MATCH ROM) for the next function command.
    fn select(&mut self, rom_code: RomCode) -> Result<(), Error<Self::Error>>;

    /// Addresses every device at once (SKIP ROM).
    fn skip(&mut self) -> Result<(), Error<Self::Error>>;

    /// Writes `bytes`. With `power` the line is held high after the last bit
    /// to feed parasite powered devices, until the next reset.
    fn write_bytes(&mut self, bytes: &[u8], power: bool) -> Result<(), Error<Self::Error>>;

    fn read_byte(&mut self) -> Result<u8, Error<Self::Error>>;

    fn read_bit(&mut self) -> Result<bool, Error<Self::Error>>;

    fn read_bytes(&mut self, dst: &mut [u8]) -> Result<(), Error<Self::Error>> {
        for d in dst {
            *d = self.read_byte()?;
        }
        Ok(())
    }
}
