use core::fmt::{Debug, Display, Formatter, Result as FmtResult};

/// Error type
#[derive(Debug)]
pub enum Error<E: Sized + Debug> {
    /// Wire not high
    WireFault,
    /// No presence on wire
    NoPresence,
    /// Presence lost after reading from a device (line noise or the device
    /// dropped off mid-transaction)
    ProtocolError,
    /// Computed and received CRC-8
    CrcMismatch(u8, u8),
    /// Scratchpad bytes 4 and 5 that the family datasheet fixes to `0xFF`
    BogusScratchpad(u8, u8),
    UnsupportedFamily(u8),
    PortError(E),
}

impl<E: Sized + Debug> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::PortError(e)
    }
}

impl<E: Sized + Debug> Error<E> {
    /// Short description without the port error payload, usable from any
    /// logging backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Error::WireFault => "wire fault",
            Error::NoPresence => "bus error",
            Error::ProtocolError => "protocol error",
            Error::CrcMismatch(..) => "CRC error",
            Error::BogusScratchpad(..) => "bogus scratchpad",
            Error::UnsupportedFamily(..) => "unsupported family",
            Error::PortError(..) => "port error",
        }
    }
}

impl<E: Sized + Debug> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Error::CrcMismatch(computed, read) => {
                write!(f, "CRC error (computed {computed:#04x}, read {read:#04x})")
            }
            Error::BogusScratchpad(b4, b5) => {
                write!(f, "bogus scratchpad ({b4:#04x}, {b5:#04x})")
            }
            Error::UnsupportedFamily(code) => write!(f, "unrecognized family code {code:#04x}"),
            Error::PortError(e) => write!(f, "port error: {e:?}"),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Error returned when registering an event listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListenerError {
    /// The same listener was registered already
    AlreadyRegistered,
    /// No room for another listener
    CapacityExceeded,
}

impl Display for ListenerError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(match self {
            ListenerError::AlreadyRegistered => "event listener was registered already",
            ListenerError::CapacityExceeded => "too many event listeners",
        })
    }
}
