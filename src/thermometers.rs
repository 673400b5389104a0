use crate::{
    event::EventListeners, Bus, DeviceFamily, Error, EventListener, ListenerError, OneShot,
    OpCode, RomCode, Scratchpad, Thermometer, ThermometerCommand, Uptime,
};
use core::time::Duration;
use heapless::{LinearMap, Vec};

/// Default number of thermometers a registry can hold
pub const DEFAULT_CAPACITY: usize = 16;

/// Time between the convert command and collecting results: the longest
/// conversion of any supported family (12 bits). Not adapted to the
/// resolutions actually present on the bus.
pub const CONVERSION_DELAY: Duration = Duration::from_millis(750);

/// Enumerates the bus and keeps the rom codes of supported thermometers.
///
/// Codes failing the CRC check and devices of other families are dropped. A
/// bus error ends the search early; the codes found until then are returned.
pub fn discover_all<B: Bus, const N: usize>(bus: &mut B) -> Vec<RomCode, N> {
    let mut result = Vec::new();
    bus.reset_search();
    loop {
        let rom_code = match bus.search() {
            Ok(Some(rom_code)) => rom_code,
            Ok(None) => break,
            Err(e) => {
                warn!("OneWire search aborted ({})", e.as_str());
                break;
            }
        };
        if !rom_code.is_valid_unicast() {
            debug!("Ignoring OneWire device {} (CRC error)", rom_code);
            continue;
        }
        if !DeviceFamily::is_supported_code(rom_code.family_code()) {
            debug!("Ignoring OneWire device {} (not a thermometer)", rom_code);
            continue;
        }
        if result.contains(&rom_code) {
            continue;
        }
        if result.push(rom_code).is_err() {
            warn!("More than {} thermometers on the bus, ignoring {}", N, rom_code);
        }
    }
    result
}

/// Registry of the thermometers found on one bus, together with the
/// conversion cycle that refreshes their readings.
///
/// The registry never owns the bus: every operation touching the wire borrows
/// it from the caller, normally [`OneWire`](crate::OneWire).
pub struct Thermometers<'a, const N: usize = DEFAULT_CAPACITY> {
    /// Deadline of the completed conversion
    last_completed_conversion: Option<Uptime>,

    /// Armed while a conversion is pending
    conversion_completion: OneShot,

    /// Whether the bus uses parasite power. Auto-detected.
    parasite: bool,

    /// Discovered rom codes, sorted ascending
    rom_codes: Vec<RomCode, N>,

    thermometers: LinearMap<RomCode, Thermometer, N>,

    event_listeners: EventListeners<'a>,
}

impl<'a, const N: usize> Default for Thermometers<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> Thermometers<'a, N> {
    pub const fn new() -> Self {
        Thermometers {
            last_completed_conversion: None,
            conversion_completion: OneShot::new(),
            parasite: false,
            rom_codes: Vec::new(),
            thermometers: LinearMap::new(),
            event_listeners: EventListeners::new(),
        }
    }

    pub fn is_parasite(&self) -> bool {
        self.parasite
    }

    /// Count of supported thermometers identified on the bus
    pub fn count(&self) -> usize {
        self.rom_codes.len()
    }

    /// Rom code of the `idx`th thermometer, ordered by rom code
    pub fn rom_code(&self, idx: usize) -> Option<RomCode> {
        self.rom_codes.get(idx).copied()
    }

    pub fn rom_codes(&self) -> &[RomCode] {
        &self.rom_codes
    }

    pub fn thermometer_by_rom_code(&self, rom_code: RomCode) -> Option<&Thermometer> {
        self.thermometers.get(&rom_code)
    }

    /// The `idx`th thermometer, ordered by rom code
    pub fn thermometer(&self, idx: usize) -> Option<&Thermometer> {
        self.rom_code(idx)
            .and_then(|rom_code| self.thermometer_by_rom_code(rom_code))
    }

    /// Thermometers ordered by rom code
    pub fn iter(&self) -> impl Iterator<Item = &Thermometer> + '_ {
        self.rom_codes
            .iter()
            .filter_map(move |rom_code| self.thermometers.get(rom_code))
    }

    /// When the readings were last refreshed
    pub fn last_reading_time(&self) -> Option<Uptime> {
        self.last_completed_conversion
    }

    pub fn is_conversion_pending(&self) -> bool {
        self.conversion_completion.is_scheduled()
    }

    /// When the pending conversion completes
    pub fn pending_conversion_time(&self) -> Option<Uptime> {
        self.conversion_completion.deadline()
    }

    pub fn add_event_listener(
        &mut self,
        listener: &'a dyn EventListener,
    ) -> Result<(), ListenerError> {
        self.event_listeners.add(listener)
    }

    /// Returns false if the listener was not registered.
    pub fn remove_event_listener(&mut self, listener: &dyn EventListener) -> bool {
        self.event_listeners.remove(listener)
    }

    /// Starts a conversion cycle unless one is pending already.
    ///
    /// Detects the power mode, reconciles the registry with the devices on the
    /// bus and broadcasts the convert command. Results are collected by
    /// [`poll`](Self::poll) once [`CONVERSION_DELAY`] has passed. Fails only
    /// when the convert command could not be issued, in which case no
    /// conversion is pending afterwards.
    ///
    /// A bus without thermometers still succeeds as long as some device
    /// answers the reset. With nothing attached at all there is no presence
    /// pulse and the result is [`Error::NoPresence`].
    pub fn update<B: Bus>(&mut self, bus: &mut B, now: Uptime) -> Result<(), Error<B::Error>> {
        if self.is_conversion_pending() {
            return Ok(());
        }
        self.read_power_supply(bus);
        self.update_thermometers(bus);
        self.begin_conversion(bus)?;
        self.conversion_completion.schedule_at(now + CONVERSION_DELAY);
        Ok(())
    }

    /// Completes the pending conversion once its deadline has passed. Returns
    /// true if it did.
    pub fn poll<B: Bus>(&mut self, bus: &mut B, now: Uptime) -> bool {
        match self.conversion_completion.fire(now) {
            Some(deadline) => {
                self.conversion_completed(bus, deadline);
                true
            }
            None => false,
        }
    }

    /// Runs discovery and reconciles the registry with its result. Devices
    /// that fail to be read or classified are left out until the next pass.
    pub fn update_thermometers<B: Bus>(&mut self, bus: &mut B) {
        let discovered: Vec<RomCode, N> = discover_all(bus);

        let gone: Vec<RomCode, N> = self
            .thermometers
            .keys()
            .filter(|rom_code| !discovered.contains(rom_code))
            .copied()
            .collect();
        for rom_code in gone.iter() {
            info!("OneWire thermometer {} disappeared", rom_code);
            self.thermometers.remove(rom_code);
        }

        for &rom_code in discovered.iter() {
            if self.thermometers.contains_key(&rom_code) {
                continue;
            }
            let thermometer = match Scratchpad::read(bus, rom_code)
                .and_then(|scratchpad| Thermometer::from_scratchpad(rom_code, &scratchpad))
            {
                Ok(thermometer) => thermometer,
                Err(e) => {
                    error!(
                        "Initializing OneWire thermometer {} failed ({})",
                        rom_code,
                        e.as_str()
                    );
                    continue;
                }
            };
            info!(
                "Found OneWire thermometer {} ({}, {})",
                rom_code,
                thermometer.family(),
                thermometer.resolution()
            );
            if self.thermometers.insert(rom_code, thermometer).is_err() {
                warn!("No room for OneWire thermometer {}", rom_code);
            }
        }

        self.rom_codes = self.thermometers.keys().copied().collect();
        self.rom_codes.sort_unstable();

        debug!("OneWire discovery completed, {} thermometers", self.rom_codes.len());
        self.event_listeners.discovery_completed();
    }

    fn read_power_supply<B: Bus>(&mut self, bus: &mut B) {
        match Self::detect_parasite(bus) {
            Ok(parasite) => self.parasite = parasite,
            Err(e) => warn!("Reading OneWire power supply failed ({})", e.as_str()),
        }
    }

    /// Parasite powered devices pull the line low in the read slot following
    /// READ POWER SUPPLY.
    fn detect_parasite<B: Bus>(bus: &mut B) -> Result<bool, Error<B::Error>> {
        bus.reset()?;
        bus.skip()?;
        bus.write_bytes(&[ThermometerCommand::ReadPowerSupply.op_code()], false)?;
        let parasite = !bus.read_bit()?;
        bus.reset()?;
        Ok(parasite)
    }

    fn begin_conversion<B: Bus>(&mut self, bus: &mut B) -> Result<(), Error<B::Error>> {
        if !bus.reset()? {
            warn!("OneWire conversion not started (bus error)");
            return Err(Error::NoPresence);
        }
        bus.skip()?;
        bus.write_bytes(&[ThermometerCommand::Convert.op_code()], self.parasite)?;
        trace!("OneWire conversion started, parasite: {}", self.parasite);
        Ok(())
    }

    fn conversion_completed<B: Bus>(&mut self, bus: &mut B, deadline: Uptime) {
        self.last_completed_conversion = Some(deadline);
        for rom_code in self.rom_codes.iter() {
            let Some(thermometer) = self.thermometers.get_mut(rom_code) else {
                continue;
            };
            let result = Scratchpad::read(bus, *rom_code)
                .and_then(|scratchpad| thermometer.update(&scratchpad));
            if let Err(e) = result {
                error!(
                    "Reading scratchpad failed for OneWire device {} ({})",
                    rom_code,
                    e.as_str()
                );
            }
        }
        self.event_listeners.conversion_completed();
    }
}
