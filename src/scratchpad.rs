use crate::{crc8, Bus, Error, OpCode, RomCode, ThermometerCommand};
use byteorder::{ByteOrder, LittleEndian};
use core::{fmt::Debug, ops::Deref};

/// Raw register file of a thermometer, as returned by READ SCRATCHPAD
///
/// | Byte | Content                                  |
/// | ---- | ---------------------------------------- |
/// | 0, 1 | temperature register, little endian      |
/// | 2, 3 | alarm thresholds or user bytes           |
/// | 4    | configuration (resolution, family flags) |
/// | 5..8 | family specific                          |
/// | 8    | CRC-8 of bytes 0 to 7                    |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Scratchpad {
    raw: [u8; Self::BYTES],
}

impl From<[u8; Scratchpad::BYTES]> for Scratchpad {
    fn from(raw: [u8; Scratchpad::BYTES]) -> Self {
        Scratchpad { raw }
    }
}

impl Deref for Scratchpad {
    type Target = [u8; Self::BYTES];

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

impl AsRef<[u8]> for Scratchpad {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl Scratchpad {
    pub const BYTES: usize = 9;

    /// Unmasked temperature register
    pub fn raw_temperature(&self) -> u16 {
        LittleEndian::read_u16(&self.raw[0..2])
    }

    pub fn configuration(&self) -> u8 {
        self.raw[4]
    }

    pub fn crc8(&self) -> u8 {
        self.raw[8]
    }

    pub fn ensure_correct_crc8<E: Debug>(&self) -> Result<(), Error<E>> {
        let computed = crc8(&self.raw[..8]);
        if computed != self.crc8() {
            Err(Error::CrcMismatch(computed, self.crc8()))
        } else {
            Ok(())
        }
    }

    /// Addresses `rom_code`, reads its scratchpad and verifies the CRC.
    ///
    /// The bus is reset again after the read; a device that no longer answers
    /// at that point yields [`Error::ProtocolError`].
    pub fn read<B: Bus>(bus: &mut B, rom_code: RomCode) -> Result<Self, Error<B::Error>> {
        if !bus.reset()? {
            return Err(Error::NoPresence);
        }
        bus.select(rom_code)?;
        bus.write_bytes(&[ThermometerCommand::ReadScratchpad.op_code()], false)?;

        let mut raw = [0u8; Self::BYTES];
        bus.read_bytes(&mut raw)?;

        if !bus.reset()? {
            return Err(Error::ProtocolError);
        }

        let scratchpad = Self::from(raw);
        scratchpad.ensure_correct_crc8()?;
        Ok(scratchpad)
    }
}
