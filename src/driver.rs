use crate::{Bus, Command, DeviceSearch, Error, IoWire, OpCode, RomCode};
use embedded_hal::delay::DelayNs;

/// Bit-banged bus master on an open-drain [`IoWire`]
pub struct Driver<W: IoWire, D: DelayNs> {
    io_wire: W,
    delay: D,
    search: DeviceSearch,
}

impl<W: IoWire, D: DelayNs> Driver<W, D> {
    pub fn new(io_wire: W, delay: D) -> Self {
        Driver {
            io_wire,
            delay,
            search: DeviceSearch::new(),
        }
    }

    /// Gives back the wire and the delay.
    pub fn release(self) -> (W, D) {
        (self.io_wire, self.delay)
    }

    /// Performs a reset and listens for a presence pulse.
    /// Returns Err(WireFault) if the wire seems to be shortened,
    /// Ok(()) if presence pulse has been received and Err(NoPresence)
    /// if no other device was detected but the wire seems to be ok
    pub fn reset_pulse(&mut self) -> Result<(), Error<W::Error>> {
        self.io_wire.set_strong_pullup(false)?;
        self.set_high()?;

        self.ensure_wire_high()?;
        self.set_low()?;

        self.delay.delay_us(480);
        self.set_high()?;

        let mut presence = false;
        for _ in 0..7 {
            self.delay.delay_us(10);
            presence |= self.is_low()?;
        }
        self.delay.delay_us(410);
        if presence {
            Ok(())
        } else {
            Err(Error::NoPresence)
        }
    }

    fn ensure_wire_high(&mut self) -> Result<(), Error<W::Error>> {
        for _ in 0..125 {
            if self.is_high()? {
                return Ok(());
            }
            self.delay.delay_us(2);
        }
        Err(Error::WireFault)
    }

    pub(crate) fn read_slot(&mut self) -> Result<bool, W::Error> {
        self.set_low()?;
        self.delay.delay_us(3);
        self.set_high()?;
        self.delay.delay_us(2); // was 10
        let val = self.is_high();
        self.delay.delay_us(61); // was 53
        val
    }

    pub(crate) fn write_slot(&mut self, high: bool) -> Result<(), W::Error> {
        self.set_low()?;
        self.delay.delay_us(if high { 10 } else { 65 });
        self.set_high()?;
        self.delay.delay_us(if high { 55 } else { 5 });
        Ok(())
    }

    pub(crate) fn write_byte(&mut self, byte: u8) -> Result<(), W::Error> {
        let mut byte = byte;
        for _ in 0..8 {
            self.write_slot((byte & 0x01) == 0x01)?;
            byte >>= 1;
        }
        Ok(())
    }

    #[inline(always)]
    fn set_high(&mut self) -> Result<(), W::Error> {
        self.io_wire.set_high()
    }

    #[inline(always)]
    fn set_low(&mut self) -> Result<(), W::Error> {
        self.io_wire.set_low()
    }

    #[inline(always)]
    fn is_high(&mut self) -> Result<bool, W::Error> {
        self.io_wire.is_high()
    }

    #[inline(always)]
    fn is_low(&mut self) -> Result<bool, W::Error> {
        self.io_wire.is_low()
    }
}

impl<W: IoWire, D: DelayNs> Bus for Driver<W, D> {
    type Error = W::Error;

    fn reset(&mut self) -> Result<bool, Error<W::Error>> {
        self.reset_pulse().map(|_| true).or_else(|error| {
            if matches!(error, Error::NoPresence) {
                Ok(false)
            } else {
                Err(error)
            }
        })
    }

    fn reset_search(&mut self) {
        self.search = DeviceSearch::new();
    }

    fn search(&mut self) -> Result<Option<RomCode>, Error<W::Error>> {
        let mut search = core::mem::take(&mut self.search);
        let result = self.search_next(&mut search, Command::SearchRom);
        self.search = search;
        result
    }

    fn select(&mut self, rom_code: RomCode) -> Result<(), Error<W::Error>> {
        self.write_byte(Command::MatchRom.op_code())?;
        for byte in rom_code.to_bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    fn skip(&mut self) -> Result<(), Error<W::Error>> {
        self.write_byte(Command::SkipRom.op_code())?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8], power: bool) -> Result<(), Error<W::Error>> {
        for b in bytes {
            self.write_byte(*b)?;
        }
        if power {
            self.io_wire.set_strong_pullup(true)?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, Error<W::Error>> {
        let mut byte = 0_u8;
        for _ in 0..8 {
            byte >>= 1;
            if self.read_slot()? {
                byte |= 0x80;
            }
        }
        Ok(byte)
    }

    fn read_bit(&mut self) -> Result<bool, Error<W::Error>> {
        Ok(self.read_slot()?)
    }
}
