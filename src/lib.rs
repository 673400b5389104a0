#![no_std]
#![doc = include_str!("../README.md")]

// This mod MUST go first, so that the others see its macros.
mod fmt;

mod bus;
mod command;
mod driver;
mod event;
pub mod family;
mod iowire;
mod onewire;
mod resolution;
mod result;
mod rom_code;
mod scratchpad;
mod search;
mod temperature;
mod thermometer;
mod thermometers;
mod timer;

pub use bus::Bus;
pub use command::{Command, OpCode, ThermometerCommand};
pub use driver::Driver;
pub use event::{ConversionListener, DiscoveryListener, EventListener, MAX_EVENT_LISTENERS};
pub use family::{DeviceFamily, Reading};
pub use iowire::{Inverted, IoWire};
pub use onewire::OneWire;
pub use resolution::Resolution;
pub use result::{Error, ListenerError};
pub use rom_code::{RomCode, RomCodeError};
pub use scratchpad::Scratchpad;
pub use search::DeviceSearch;
pub use temperature::Temperature;
pub use thermometer::Thermometer;
pub use thermometers::{discover_all, Thermometers, CONVERSION_DELAY, DEFAULT_CAPACITY};
pub use timer::{OneShot, Uptime};

pub fn compute_partial_crc8(crc: u8, data: &[u8]) -> u8 {
    let mut crc = crc;
    for byte in data.iter() {
        let mut byte = *byte;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0x00 {
                crc ^= 0x8C;
            }
            byte >>= 1;
        }
    }
    crc
}

/// Dallas/Maxim CRC-8 as used for rom codes and scratchpads
pub fn crc8(data: &[u8]) -> u8 {
    compute_partial_crc8(0, data)
}
