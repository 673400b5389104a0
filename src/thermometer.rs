use crate::{DeviceFamily, Error, Resolution, RomCode, Scratchpad, Temperature};
use core::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// Cached state of one thermometer on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thermometer {
    rom_code: RomCode,
    family: DeviceFamily,
    resolution: Resolution,
    temperature: Option<Temperature>,
}

impl Thermometer {
    /// Classifies a freshly discovered device. The temperature stays unknown
    /// until the first conversion completes: a scratchpad read outside a
    /// conversion holds whatever the device latched last, possibly the
    /// power-on value.
    pub fn from_scratchpad<E: Debug>(
        rom_code: RomCode,
        scratchpad: &Scratchpad,
    ) -> Result<Self, Error<E>> {
        let mut thermometer = Thermometer {
            rom_code,
            family: DeviceFamily::Unknown,
            resolution: Resolution::Bits12,
            temperature: None,
        };
        thermometer.update(scratchpad)?;
        thermometer.temperature = None;
        Ok(thermometer)
    }

    /// Re-runs classification and decoding on a scratchpad read after a
    /// conversion. On error the record is left untouched.
    pub fn update<E: Debug>(&mut self, scratchpad: &Scratchpad) -> Result<(), Error<E>> {
        let family = DeviceFamily::classify(self.rom_code.family_code(), scratchpad)?;
        let reading = family
            .decode(scratchpad)
            .ok_or(Error::UnsupportedFamily(self.rom_code.family_code()))?;
        self.family = family;
        self.resolution = reading.resolution;
        self.temperature = reading.temperature;
        Ok(())
    }

    pub fn rom_code(&self) -> RomCode {
        self.rom_code
    }

    pub fn family(&self) -> DeviceFamily {
        self.family
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Last reading, `None` before the first conversion or for families
    /// whose register is not decoded
    pub fn temperature(&self) -> Option<Temperature> {
        self.temperature
    }
}

impl Display for Thermometer {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{{rom_code: {}, family: {}, resolution: {}, temperature: ",
            self.rom_code, self.family, self.resolution
        )?;
        match self.temperature {
            Some(temperature) => write!(f, "{temperature}}}"),
            None => f.write_str("unknown}"),
        }
    }
}
