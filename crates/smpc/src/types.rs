//! Common type definitions for Saturn peripheral handling
//!
//! This module provides the fixed port geometry and payload layout shared by
//! the bus, the port table and the controller profiles.

/// Number of virtual ports exposed after flattening both physical ports
pub const PORT_CAPACITY: usize = 12;

/// Virtual slots reserved per physical port (one multitap holds six devices)
pub const HUB_SLOTS: usize = 6;

/// Size of a device payload buffer in bytes
pub const PAYLOAD_SIZE: usize = 16;

/// Offset of the big-endian button word within a payload
pub const BUTTONS_OFFSET: usize = 0;

/// Offset of the first analog axis byte within a payload
pub const AXIS_OFFSET: usize = 2;

/// Physical controller connector
///
/// The console has exactly two of them. Each hosts either one directly wired
/// device or a multitap with up to [`HUB_SLOTS`] sub-devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhysicalPort {
    /// Connector 1
    One,
    /// Connector 2
    Two,
}

impl PhysicalPort {
    /// Both connectors in polling order
    pub const ALL: [PhysicalPort; 2] = [PhysicalPort::One, PhysicalPort::Two];

    /// Connector number as printed on the console (1 or 2)
    #[inline]
    pub const fn number(self) -> u8 {
        match self {
            PhysicalPort::One => 1,
            PhysicalPort::Two => 2,
        }
    }

    /// Zero-based index, usable for per-port arrays
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PhysicalPort::One => 0,
            PhysicalPort::Two => 1,
        }
    }

    /// Look up a connector by its printed number
    pub const fn from_number(number: u8) -> Option<PhysicalPort> {
        match number {
            1 => Some(PhysicalPort::One),
            2 => Some(PhysicalPort::Two),
            _ => None,
        }
    }
}

impl core::fmt::Display for PhysicalPort {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "port {}", self.number())
    }
}
