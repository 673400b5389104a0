use crate::ListenerError;
use heapless::Vec;

/// How many listeners a registry accepts
pub const MAX_EVENT_LISTENERS: usize = 8;

/// Observer of a [`Thermometers`](crate::Thermometers) registry. Both methods
/// are called synchronously from within `update` and `poll`.
pub trait EventListener {
    /// Called after the discovery protocol finishes. The list of thermometers
    /// may now be different than before.
    fn discovery_completed(&self) {}

    /// Called when new temperature readings are available.
    fn conversion_completed(&self) {}
}

/// Adapts a closure to [`EventListener::conversion_completed`].
pub struct ConversionListener<F: Fn()>(pub F);

impl<F: Fn()> EventListener for ConversionListener<F> {
    fn conversion_completed(&self) {
        (self.0)()
    }
}

/// Adapts a closure to [`EventListener::discovery_completed`].
pub struct DiscoveryListener<F: Fn()>(pub F);

impl<F: Fn()> EventListener for DiscoveryListener<F> {
    fn discovery_completed(&self) {
        (self.0)()
    }
}

fn same_listener(a: &dyn EventListener, b: &dyn EventListener) -> bool {
    core::ptr::eq(
        a as *const dyn EventListener as *const (),
        b as *const dyn EventListener as *const (),
    )
}

/// Listeners in registration order, compared by identity
#[derive(Default)]
pub(crate) struct EventListeners<'a> {
    listeners: Vec<&'a dyn EventListener, MAX_EVENT_LISTENERS>,
}

impl<'a> EventListeners<'a> {
    pub(crate) const fn new() -> Self {
        EventListeners {
            listeners: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, listener: &'a dyn EventListener) -> Result<(), ListenerError> {
        if self.contains(listener) {
            return Err(ListenerError::AlreadyRegistered);
        }
        self.listeners
            .push(listener)
            .map_err(|_| ListenerError::CapacityExceeded)
    }

    pub(crate) fn remove(&mut self, listener: &dyn EventListener) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(*l, listener));
        self.listeners.len() != before
    }

    pub(crate) fn contains(&self, listener: &dyn EventListener) -> bool {
        self.listeners.iter().any(|l| same_listener(*l, listener))
    }

    pub(crate) fn discovery_completed(&self) {
        for listener in self.listeners.iter() {
            listener.discovery_completed();
        }
    }

    pub(crate) fn conversion_completed(&self) {
        for listener in self.listeners.iter() {
            listener.conversion_completed();
        }
    }
}
