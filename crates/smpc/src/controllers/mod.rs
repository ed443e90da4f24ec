//! Controller profiles
//!
//! A profile decides which device types it can drive and answers button
//! queries for them. Button queries are shared through the provided methods
//! of [`Controller`]; profiles with analog axes add their own decoding on top.
//!
//! - [`Gamepad`] - standard control pad
//! - [`AnalogPad`] - 3D control pad, with a digital fallback for standard pads
//!
//! # Example
//!
//! ```
//! use smpc::bus::{DeviceInput, MemoryBus, PortInput};
//! use smpc::controllers::{AnalogPad, Axis, Controller, Gamepad};
//! use smpc::input::Button;
//! use smpc::peripheral::DeviceType;
//! use smpc::ports::PortTable;
//! use smpc::types::PhysicalPort;
//!
//! let mut bus = MemoryBus::new();
//! bus.stage(
//!     PhysicalPort::One,
//!     PortInput::Direct(DeviceInput::new(DeviceType::Gamepad).buttons(Button::LEFT)),
//! );
//! let mut table = PortTable::new(bus);
//! table.poll();
//!
//! assert!(Gamepad::is_pressed_at(&table, 0, Button::LEFT));
//! assert_eq!(AnalogPad::axis_at(&table, 0, Axis::X), 0xFF);
//! ```

mod analog;
mod gamepad;

pub use analog::{AnalogPad, Axis};
pub use gamepad::Gamepad;

use crate::bus::PeripheralBus;
use crate::input::{self, Buttons};
use crate::peripheral::{DeviceType, RawSnapshot, type_of};
use crate::ports::PortTable;

/// Button queries gated by a profile's connectivity rule
pub trait Controller {
    /// Whether `peripheral` is a device this profile can drive
    fn is_connected(peripheral: Option<&RawSnapshot>) -> bool;

    /// Check if the user is holding down any button of `button`
    fn is_held(peripheral: Option<&RawSnapshot>, button: impl Into<Buttons>) -> bool {
        match peripheral {
            Some(peripheral) if Self::is_connected(Some(peripheral)) => {
                input::is_held(peripheral, button)
            }
            _ => false,
        }
    }

    /// Check if the user pressed any button of `button` this frame
    fn is_pressed(peripheral: Option<&RawSnapshot>, button: impl Into<Buttons>) -> bool {
        match peripheral {
            Some(peripheral) if Self::is_connected(Some(peripheral)) => {
                input::is_pressed(peripheral, button)
            }
            _ => false,
        }
    }

    /// Check if the user released any button of `button` this frame
    fn is_released(peripheral: Option<&RawSnapshot>, button: impl Into<Buttons>) -> bool {
        match peripheral {
            Some(peripheral) if Self::is_connected(Some(peripheral)) => {
                input::is_released(peripheral, button)
            }
            _ => false,
        }
    }

    /// Named buttons currently held, empty if the profile does not apply
    fn held(peripheral: Option<&RawSnapshot>) -> Buttons {
        match peripheral {
            Some(peripheral) if Self::is_connected(Some(peripheral)) => {
                input::held(peripheral).masked(Buttons::ALL)
            }
            _ => Buttons::NONE,
        }
    }

    fn is_connected_at<B: PeripheralBus>(table: &PortTable<B>, port: usize) -> bool {
        Self::is_connected(table.peripheral(port))
    }

    fn is_held_at<B: PeripheralBus>(
        table: &PortTable<B>,
        port: usize,
        button: impl Into<Buttons>,
    ) -> bool {
        Self::is_held(table.peripheral(port), button)
    }

    fn is_pressed_at<B: PeripheralBus>(
        table: &PortTable<B>,
        port: usize,
        button: impl Into<Buttons>,
    ) -> bool {
        Self::is_pressed(table.peripheral(port), button)
    }

    fn is_released_at<B: PeripheralBus>(
        table: &PortTable<B>,
        port: usize,
        button: impl Into<Buttons>,
    ) -> bool {
        Self::is_released(table.peripheral(port), button)
    }
}

/// Profile chosen from a device's classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Digital buttons only ([`Gamepad`])
    Standard,
    /// Buttons plus native analog axes ([`AnalogPad`])
    Analog,
}

impl Profile {
    /// Pick the profile that natively matches `peripheral`
    pub fn select(peripheral: Option<&RawSnapshot>) -> Option<Profile> {
        match type_of(peripheral) {
            DeviceType::Gamepad => Some(Profile::Standard),
            DeviceType::Analog3dPad => Some(Profile::Analog),
            _ => None,
        }
    }

    pub fn is_connected(self, peripheral: Option<&RawSnapshot>) -> bool {
        match self {
            Profile::Standard => Gamepad::is_connected(peripheral),
            Profile::Analog => AnalogPad::is_connected(peripheral),
        }
    }

    /// Axis readings (X, Y, R, L) for profiles that have them
    pub fn axes(self, peripheral: Option<&RawSnapshot>) -> Option<[u8; 4]> {
        match self {
            Profile::Standard => None,
            Profile::Analog => Some(AnalogPad::axes(peripheral)),
        }
    }
}
