use onewire_thermometers::{crc8, Bus, Error, RomCode, ThermometerCommand};

#[derive(Debug, PartialEq)]
pub enum FakeError {}

pub fn scratchpad(lsb: u8, msb: u8, b4: u8, b5: u8) -> [u8; 9] {
    let mut raw = [lsb, msb, 0x4B, 0x46, b4, b5, 0x0C, 0x10, 0];
    raw[8] = crc8(&raw[..8]);
    raw
}

/// DS18B20 style scratchpad at 12 bits
pub fn ds18b20_scratchpad(lsb: u8, msb: u8) -> [u8; 9] {
    scratchpad(lsb, msb, 0x7F, 0xFF)
}

pub struct FakeDevice {
    pub rom_code: RomCode,
    pub scratchpad: [u8; 9],
    pub parasite: bool,
}

impl FakeDevice {
    pub fn new(rom_code: RomCode, scratchpad: [u8; 9]) -> Self {
        FakeDevice {
            rom_code,
            scratchpad,
            parasite: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Selection {
    Nobody,
    Device(usize),
    All,
}

/// Simulates devices at transaction level and records the commands it sees.
pub struct FakeBus {
    pub devices: Vec<FakeDevice>,
    /// Device that stops answering right after sending its scratchpad
    pub drops_after_read: Option<RomCode>,

    pub resets: usize,
    pub convert_commands: usize,
    pub last_convert_power: Option<bool>,
    pub scratchpad_reads: Vec<RomCode>,

    search_cursor: usize,
    selection: Selection,
    read_buffer: Vec<u8>,
    power_query: bool,
    presence_lost: bool,
}

impl FakeBus {
    pub fn new(devices: Vec<FakeDevice>) -> Self {
        FakeBus {
            devices,
            drops_after_read: None,
            resets: 0,
            convert_commands: 0,
            last_convert_power: None,
            scratchpad_reads: Vec::new(),
            search_cursor: 0,
            selection: Selection::Nobody,
            read_buffer: Vec::new(),
            power_query: false,
            presence_lost: false,
        }
    }

    pub fn device(&mut self, rom_code: RomCode) -> &mut FakeDevice {
        self.devices
            .iter_mut()
            .find(|d| d.rom_code == rom_code)
            .expect("no such device")
    }

    pub fn remove(&mut self, rom_code: RomCode) {
        self.devices.retain(|d| d.rom_code != rom_code);
    }
}

impl Bus for FakeBus {
    type Error = FakeError;

    fn reset(&mut self) -> Result<bool, Error<FakeError>> {
        self.resets += 1;
        self.selection = Selection::Nobody;
        self.read_buffer.clear();
        self.power_query = false;
        if self.presence_lost {
            self.presence_lost = false;
            return Ok(false);
        }
        Ok(!self.devices.is_empty())
    }

    fn reset_search(&mut self) {
        self.search_cursor = 0;
    }

    fn search(&mut self) -> Result<Option<RomCode>, Error<FakeError>> {
        let found = self.devices.get(self.search_cursor).map(|d| d.rom_code);
        self.search_cursor += 1;
        Ok(found)
    }

    fn select(&mut self, rom_code: RomCode) -> Result<(), Error<FakeError>> {
        self.selection = match self.devices.iter().position(|d| d.rom_code == rom_code) {
            Some(idx) => Selection::Device(idx),
            None => Selection::Nobody,
        };
        Ok(())
    }

    fn skip(&mut self) -> Result<(), Error<FakeError>> {
        self.selection = Selection::All;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8], power: bool) -> Result<(), Error<FakeError>> {
        let command = bytes[0];
        if command == ThermometerCommand::Convert as u8 {
            assert_eq!(self.selection, Selection::All, "convert must be broadcast");
            self.convert_commands += 1;
            self.last_convert_power = Some(power);
        } else if command == ThermometerCommand::ReadScratchpad as u8 {
            if let Selection::Device(idx) = self.selection {
                let device = &self.devices[idx];
                self.scratchpad_reads.push(device.rom_code);
                self.read_buffer = device.scratchpad.iter().rev().copied().collect();
                if self.drops_after_read == Some(device.rom_code) {
                    self.presence_lost = true;
                }
            }
        } else if command == ThermometerCommand::ReadPowerSupply as u8 {
            self.power_query = true;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, Error<FakeError>> {
        Ok(self.read_buffer.pop().unwrap_or(0xFF))
    }

    fn read_bit(&mut self) -> Result<bool, Error<FakeError>> {
        if self.power_query {
            Ok(!self.devices.iter().any(|d| d.parasite))
        } else {
            Ok(true)
        }
    }
}
