use crate::{thermometers, Bus, Error, RomCode, Thermometers, Uptime, DEFAULT_CAPACITY};
use heapless::Vec;

/// A OneWire bus together with the thermometers found on it.
///
/// ```ignore
/// let mut onewire: OneWire<_> = OneWire::new(Driver::new((pin,), delay));
/// loop {
///     let now = Uptime::from_millis(clock.millis());
///     onewire.poll(now);
///     if !onewire.thermometers().is_conversion_pending() {
///         for t in onewire.thermometers().iter() {
///             info!("{}", t);
///         }
///         onewire.update(now)?;
///     }
/// }
/// ```
pub struct OneWire<'a, B: Bus, const N: usize = DEFAULT_CAPACITY> {
    bus: B,
    thermometers: Thermometers<'a, N>,
}

impl<'a, B: Bus, const N: usize> OneWire<'a, B, N> {
    pub fn new(bus: B) -> Self {
        OneWire {
            bus,
            thermometers: Thermometers::new(),
        }
    }

    /// Re-discovers devices on the bus, fetches their state, and requests
    /// temperature conversion for thermometers. Succeeds if the conversion
    /// request has been issued or a conversion is in progress already.
    pub fn update(&mut self, now: Uptime) -> Result<(), Error<B::Error>> {
        self.thermometers.update(&mut self.bus, now)
    }

    /// Call from the run loop. Collects the readings once the pending
    /// conversion is due and returns true if it did.
    pub fn poll(&mut self, now: Uptime) -> bool {
        self.thermometers.poll(&mut self.bus, now)
    }

    /// Rom codes of the supported thermometers currently on the bus, without
    /// touching the registry
    pub fn discover_all(&mut self) -> Vec<RomCode, N> {
        thermometers::discover_all(&mut self.bus)
    }

    /// Recently discovered thermometers with their cached readings
    pub fn thermometers(&self) -> &Thermometers<'a, N> {
        &self.thermometers
    }

    pub fn thermometers_mut(&mut self) -> &mut Thermometers<'a, N> {
        &mut self.thermometers
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn release(self) -> B {
        self.bus
    }
}
