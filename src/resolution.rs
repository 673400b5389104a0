use core::{
    fmt::{Display, Formatter, Result as FmtResult},
    time::Duration,
};

/// Number of significant bits in a temperature sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Resolution {
    Bits9 = 9,
    Bits10 = 10,
    Bits11 = 11,
    Bits12 = 12,
    Bits13 = 13,
    Bits14 = 14,
}

impl Resolution {
    pub const ALL: [Resolution; 6] = [
        Resolution::Bits9,
        Resolution::Bits10,
        Resolution::Bits11,
        Resolution::Bits12,
        Resolution::Bits13,
        Resolution::Bits14,
    ];

    /// Decodes the 2-bit R1:R0 field (bits 5 and 6) of a configuration
    /// register.
    pub const fn from_config(config: u8) -> Self {
        match (config >> 5) & 0b11 {
            0b00 => Resolution::Bits9,
            0b01 => Resolution::Bits10,
            0b10 => Resolution::Bits11,
            _ => Resolution::Bits12,
        }
    }

    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Maximum conversion time given by the datasheets. 13 and 14 bits are
    /// only produced by the MAX31850.
    pub const fn conversion_time(&self) -> Duration {
        match self {
            Resolution::Bits9 => Duration::from_micros(93_750),
            Resolution::Bits10 => Duration::from_micros(187_500),
            Resolution::Bits11 => Duration::from_millis(375),
            Resolution::Bits12 => Duration::from_millis(750),
            Resolution::Bits13 | Resolution::Bits14 => Duration::from_millis(100),
        }
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{} bits", self.bits())
    }
}
