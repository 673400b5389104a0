use core::fmt::{Display, Formatter, Result as FmtResult};

/// A temperature reading, stored exactly in sixteenths of a degree Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature {
    sixteenths: i32,
}

impl Temperature {
    /// From a register counting 1/16 °C steps
    pub const fn from_sixteenths(raw: i16) -> Self {
        Self {
            sixteenths: raw as i32,
        }
    }

    /// From a register counting 1/2 °C steps
    pub const fn from_halves(raw: i16) -> Self {
        Self {
            sixteenths: raw as i32 * 8,
        }
    }

    pub const fn as_sixteenths(&self) -> i32 {
        self.sixteenths
    }

    pub fn degrees_celsius(&self) -> f32 {
        self.sixteenths as f32 / 16_f32
    }

    /// Split into two parts: integer and fraction N.
    /// Original value may be calculated as: integer + fraction/10000
    pub const fn split(&self) -> (i32, i32) {
        if self.sixteenths >= 0 {
            (self.sixteenths >> 4, (self.sixteenths & 0xF) * 625)
        } else {
            let abs = -self.sixteenths;
            (-(abs >> 4), -625 * (abs & 0xF))
        }
    }
}

impl Display for Temperature {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let (integer, fraction) = self.split();
        if self.sixteenths < 0 && integer == 0 {
            f.write_str("-")?;
        }
        write!(f, "{}.{:04}°C", integer, fraction.abs())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Temperature {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=f32}°C", self.degrees_celsius())
    }
}
