//! Family classification and scratchpad decoding.
//!
//! | Family     | Code | Resolution | Register             |
//! | ---------- | ---- | ---------- | -------------------- |
//! | DS18S20    | 0x10 | 9 bits     | 1/2 °C               |
//! | DS18B20    | 0x28 | 9-12 bits  | 1/16 °C, masked      |
//! | DS1822     | 0x22 | 9-12 bits  | 1/16 °C, masked      |
//! | DS1825     | 0x3B | 9-12 bits  | 1/16 °C, masked      |
//! | MAX31850   | 0x3B | 14 bits    | not decoded yet      |
//! | DS28EA00   | 0x42 | 9-12 bits  | 1/16 °C, masked      |
//!
//! DS1825 and MAX31850 share a family code and are told apart by bit 7 of
//! the configuration register. The DS1820 reports as DS18S20 and the
//! MAX31820 as DS18B20.

use crate::{Error, Resolution, Scratchpad, Temperature};
use core::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// Family codes of the supported thermometers
pub mod family_code {
    pub const DS18S20: u8 = 0x10;
    pub const DS1822: u8 = 0x22;
    pub const DS18B20: u8 = 0x28;
    pub const DS1825: u8 = 0x3B;
    pub const MAX31850: u8 = 0x3B;
    pub const DS28EA00: u8 = 0x42;
}

/// Configuration bit set by the MAX31850 and clear on the DS1825
const MAX31850_CONFIG_FLAG: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceFamily {
    #[default]
    Unknown,
    /// Also covers the DS1820
    Ds18s20,
    /// Also covers the MAX31820
    Ds18b20,
    Ds1822,
    Ds1825,
    Max31850,
    Ds28ea00,
    Broadcast,
}

/// Outcome of decoding one scratchpad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub resolution: Resolution,
    /// `None` when the family's register layout is not decoded
    pub temperature: Option<Temperature>,
}

impl DeviceFamily {
    /// Whether devices with this family code can be classified at all
    pub const fn is_supported_code(code: u8) -> bool {
        matches!(
            code,
            family_code::DS18S20
                | family_code::DS18B20
                | family_code::DS1822
                | family_code::DS1825
                | family_code::DS28EA00
        )
    }

    /// Tells the family of a device from its family code and scratchpad.
    ///
    /// Fails with [`Error::BogusScratchpad`] when a DS18S20 reports bytes that
    /// its datasheet fixes, and with [`Error::UnsupportedFamily`] for codes
    /// that are not thermometers this crate understands.
    pub fn classify<E: Debug>(family_code: u8, scratchpad: &Scratchpad) -> Result<Self, Error<E>> {
        match family_code {
            family_code::DS18S20 => {
                // DS1820 and DS18S20 always read 0xFF from bytes 4 and 5
                if scratchpad[4] != 0xFF || scratchpad[5] != 0xFF {
                    Err(Error::BogusScratchpad(scratchpad[4], scratchpad[5]))
                } else {
                    Ok(DeviceFamily::Ds18s20)
                }
            }
            family_code::DS18B20 => Ok(DeviceFamily::Ds18b20),
            family_code::DS1822 => Ok(DeviceFamily::Ds1822),
            family_code::DS1825 => {
                if scratchpad.configuration() & MAX31850_CONFIG_FLAG == 0 {
                    Ok(DeviceFamily::Ds1825)
                } else {
                    Ok(DeviceFamily::Max31850)
                }
            }
            family_code::DS28EA00 => Ok(DeviceFamily::Ds28ea00),
            other => Err(Error::UnsupportedFamily(other)),
        }
    }

    /// Decodes resolution and temperature. `None` for the pseudo families
    /// that never describe a real device.
    pub fn decode(self, scratchpad: &Scratchpad) -> Option<Reading> {
        match self {
            DeviceFamily::Ds18s20 => Some(Reading {
                resolution: Resolution::Bits9,
                temperature: Some(Temperature::from_halves(
                    scratchpad.raw_temperature() as i16,
                )),
            }),
            DeviceFamily::Ds18b20
            | DeviceFamily::Ds1822
            | DeviceFamily::Ds1825
            | DeviceFamily::Ds28ea00 => {
                let resolution = Resolution::from_config(scratchpad.configuration());
                let mask = !((1u16 << (12 - resolution.bits())) - 1);
                Some(Reading {
                    resolution,
                    temperature: Some(Temperature::from_sixteenths(
                        (scratchpad.raw_temperature() & mask) as i16,
                    )),
                })
            }
            // TODO: decode the 14-bit thermocouple register once verified
            // against a MAX31850 sample.
            DeviceFamily::Max31850 => Some(Reading {
                resolution: Resolution::Bits14,
                temperature: None,
            }),
            DeviceFamily::Unknown | DeviceFamily::Broadcast => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            DeviceFamily::Unknown => "UNKNOWN",
            DeviceFamily::Ds18s20 => "DS18S20",
            DeviceFamily::Ds18b20 => "DS18B20",
            DeviceFamily::Ds1822 => "DS1822",
            DeviceFamily::Ds1825 => "DS1825",
            DeviceFamily::Max31850 => "MAX31850",
            DeviceFamily::Ds28ea00 => "DS28EA00",
            DeviceFamily::Broadcast => "BROADCAST",
        }
    }
}

impl Display for DeviceFamily {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.name())
    }
}
