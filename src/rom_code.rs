use crate::crc8;
use core::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Identifies a device on the bus. Can be passed by value.
///
/// Byte 0 (the least significant byte of [`raw`](RomCode::raw)) is the family
/// code, bytes 1 to 6 hold the serial number and byte 7 is the CRC-8 of the
/// first seven bytes. Ordering follows the raw value.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RomCode(u64);

impl RomCode {
    /// The length of a rom code in bytes
    pub const BYTES: usize = 8;

    /// The length of a rom code in bits
    pub const BITS: u8 = Self::BYTES as u8 * 8;

    /// Addresses every device at once
    pub const BROADCAST: RomCode = RomCode(u64::MAX);

    /// Not assigned to any device
    pub const UNKNOWN: RomCode = RomCode(0);

    pub const fn new(raw: u64) -> Self {
        RomCode(raw)
    }

    /// Builds a rom code from a family code and the lower 48 bits of `serial`,
    /// filling in the CRC.
    pub fn from_parts(family_code: u8, serial: u64) -> Self {
        let raw = family_code as u64 | (serial & 0xFFFF_FFFF_FFFF) << 8;
        let mut bytes = raw.to_le_bytes();
        bytes[7] = crc8(&bytes[..7]);
        Self::from(bytes)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub const fn family_code(&self) -> u8 {
        self.0 as u8
    }

    pub const fn serial(&self) -> u64 {
        (self.0 >> 8) & 0xFFFF_FFFF_FFFF
    }

    pub const fn crc(&self) -> u8 {
        (self.0 >> 56) as u8
    }

    pub const fn is_broadcast(&self) -> bool {
        self.0 == u64::MAX
    }

    pub const fn is_unknown(&self) -> bool {
        self.0 == 0
    }

    /// True when the trailing byte matches the CRC-8 of the first seven.
    /// Corrupted reads and the broadcast code fail this check. The all-zero
    /// code passes it, its family code is never a supported one though.
    pub fn is_valid_unicast(&self) -> bool {
        let bytes = self.to_bytes();
        crc8(&bytes[..7]) == bytes[7]
    }

    /// Bytes in bus order, family code first
    pub const fn to_bytes(&self) -> [u8; Self::BYTES] {
        self.0.to_le_bytes()
    }

    /// Writes exactly 16 upper case hex digits, most significant byte first.
    pub fn write_hex(&self, out: &mut [u8; 16]) {
        for (i, byte) in self.0.to_be_bytes().iter().enumerate() {
            out[i * 2] = nibble_to_hex(byte >> 4);
            out[i * 2 + 1] = nibble_to_hex(byte & 0x0F);
        }
    }
}

fn nibble_to_hex(nibble: u8) -> u8 {
    if nibble >= 10 {
        nibble - 10 + b'A'
    } else {
        nibble + b'0'
    }
}

impl From<[u8; RomCode::BYTES]> for RomCode {
    fn from(bytes: [u8; RomCode::BYTES]) -> Self {
        RomCode(u64::from_le_bytes(bytes))
    }
}

impl From<RomCode> for [u8; RomCode::BYTES] {
    fn from(rom_code: RomCode) -> [u8; RomCode::BYTES] {
        rom_code.to_bytes()
    }
}

impl From<RomCode> for u64 {
    fn from(rom_code: RomCode) -> u64 {
        rom_code.0
    }
}

/// Error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RomCodeError {
    NotEnough,
    Invalid,
}

impl FromStr for RomCode {
    type Err = RomCodeError;

    /// Parses the [`Display`] form back. Whitespace and `:` between digits
    /// are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut raw = 0u64;
        let mut digits = 0;

        for c in s.chars().filter(|c| !c.is_whitespace() && *c != ':') {
            if digits == Self::BYTES * 2 {
                return Err(RomCodeError::Invalid);
            }
            let nibble = c.to_digit(16).ok_or(RomCodeError::Invalid)?;
            raw = (raw << 4) | nibble as u64;
            digits += 1;
        }

        if digits < Self::BYTES * 2 {
            return Err(RomCodeError::NotEnough);
        }
        Ok(RomCode(raw))
    }
}

impl Display for RomCode {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{:016X}", self.0)
    }
}

impl Debug for RomCode {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "RomCode({:016X})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RomCode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=u64:X}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::{RomCode, RomCodeError};

    // Maxim application note 27, the worked CRC example
    const AN27: [u8; 8] = [0x02, 0x1C, 0xB8, 0x01, 0x00, 0x00, 0x00, 0xA2];

    #[test]
    fn valid_unicast() {
        assert!(RomCode::from(AN27).is_valid_unicast());
    }

    #[test]
    fn corrupting_any_byte_invalidates() {
        for i in 0..RomCode::BYTES {
            let mut bytes = AN27;
            bytes[i] ^= 0x10;
            assert!(!RomCode::from(bytes).is_valid_unicast(), "byte {i}");
        }
    }

    #[test]
    fn reserved_codes() {
        assert!(RomCode::BROADCAST.is_broadcast());
        assert!(!RomCode::BROADCAST.is_valid_unicast());
        assert!(RomCode::default().is_unknown());
    }

    #[test]
    fn parts() {
        let rom_code = RomCode::from(AN27);
        assert_eq!(rom_code.family_code(), 0x02);
        assert_eq!(rom_code.serial(), 0x0000_0001_B81C);
        assert_eq!(rom_code.crc(), 0xA2);
        assert_eq!(RomCode::from_parts(0x02, 0x0000_0001_B81C), rom_code);
        assert_eq!(<[u8; 8]>::from(rom_code), AN27);
    }

    #[test]
    fn ordering_follows_raw_value() {
        assert!(RomCode::new(0x0100) > RomCode::new(0x00FF));
        assert!(RomCode::UNKNOWN < RomCode::BROADCAST);
    }

    #[test]
    fn display_most_significant_byte_first() {
        let mut out = [0u8; 16];
        RomCode::from(AN27).write_hex(&mut out);
        assert_eq!(&out, b"A200000001B81C02");
    }

    #[test]
    fn parse_rom_code() {
        let rom_code: RomCode = "A200000001B81C02".parse().unwrap();

        assert_eq!(rom_code, RomCode::from(AN27));
    }

    #[test]
    fn parse_rom_code_separated() {
        let expected = RomCode::from(AN27);

        assert_eq!("a2 00 00 00 01 b8 1c 02".parse::<RomCode>(), Ok(expected));
        assert_eq!("A2:00:00:00:01:B8:1C:02".parse::<RomCode>(), Ok(expected));
    }

    #[test]
    fn parse_rom_code_errors() {
        assert_eq!("A200".parse::<RomCode>(), Err(RomCodeError::NotEnough));
        assert_eq!(
            "A200000001B81C0G".parse::<RomCode>(),
            Err(RomCodeError::Invalid)
        );
        assert_eq!(
            "A200000001B81C0200".parse::<RomCode>(),
            Err(RomCodeError::Invalid)
        );
    }
}
