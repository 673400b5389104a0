pub trait OpCode {
    fn op_code(&self) -> u8;
}

/// ROM commands, understood by every device on the bus. The full set is
/// listed for [`Bus`](crate::Bus) implementors; the engine only issues MATCH,
/// SKIP and SEARCH ROM.
#[derive(Clone, Copy, Debug)]
#[repr(u8)]
pub enum Command {
    MatchRom = 0x55,
    SearchRom = 0xF0,
    SearchRomAlarmed = 0xEC,
    SkipRom = 0xCC,
    ReadRom = 0x33,
}

impl OpCode for Command {
    fn op_code(&self) -> u8 {
        *self as _
    }
}

/// Function commands shared by the DS18x20 family of thermometers. The engine
/// issues CONVERT, READ SCRATCHPAD and READ POWER SUPPLY; the EEPROM commands
/// are here for applications configuring alarms or resolution themselves.
#[derive(Clone, Copy, Debug)]
#[repr(u8)]
pub enum ThermometerCommand {
    Convert = 0x44,
    WriteScratchpad = 0x4E,
    ReadScratchpad = 0xBE,
    CopyScratchpad = 0x48,
    RecallE2 = 0xB8,
    ReadPowerSupply = 0xB4,
}

impl OpCode for ThermometerCommand {
    fn op_code(&self) -> u8 {
        *self as _
    }
}
