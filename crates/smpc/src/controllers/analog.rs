//! 3D control pad
//!
//! The 3D pad reports a thumb stick and two analog shoulder triggers after
//! the button word. Flipped to digital mode it identifies as a plain control
//! pad; axes are then synthesized from the d-pad and shoulder buttons so that
//! games can keep reading axes either way.

use super::Controller;
use crate::bus::PeripheralBus;
use crate::input::{self, Button};
use crate::peripheral::{DeviceType, RawSnapshot, type_of};
use crate::ports::PortTable;

/// Stick position at rest
pub const AXIS_CENTER: u8 = 0x7F;

/// Trigger position at rest (fully pressed reads near zero)
pub const TRIGGER_RELEASED: u8 = 0xFF;

/// Analog axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Stick X
    X = 0,
    /// Stick Y
    Y = 1,
    /// Right trigger
    R = 2,
    /// Left trigger
    L = 3,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::R, Axis::L];

    /// Position after the button header
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Reading when nothing is connected
    #[inline]
    pub const fn idle(self) -> u8 {
        match self {
            Axis::X | Axis::Y => AXIS_CENTER,
            Axis::R | Axis::L => TRIGGER_RELEASED,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::R => "r",
            Axis::L => "l",
        }
    }
}

/// 3D control pad, also accepting standard pads in digital mode
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalogPad;

impl Controller for AnalogPad {
    fn is_connected(peripheral: Option<&RawSnapshot>) -> bool {
        matches!(
            type_of(peripheral),
            DeviceType::Analog3dPad | DeviceType::Gamepad
        )
    }
}

impl AnalogPad {
    /// Read one axis in the range 0 to 255
    ///
    /// Unplugged devices read as idle: sticks centered, triggers released.
    pub fn axis(peripheral: Option<&RawSnapshot>, axis: Axis) -> u8 {
        let Some(peripheral) = peripheral.filter(|p| Self::is_connected(Some(*p))) else {
            return axis.idle();
        };

        if peripheral.device_type() == DeviceType::Analog3dPad {
            return peripheral.axis_byte(axis.index()).unwrap_or(axis.idle());
        }

        // Digital mode
        let held = |button: Button| input::is_held(peripheral, button);
        match axis {
            Axis::X if held(Button::LEFT) => 0xFF,
            Axis::X if held(Button::RIGHT) => 0x00,
            Axis::Y if held(Button::UP) => 0xFF,
            Axis::Y if held(Button::DOWN) => 0x00,
            Axis::X | Axis::Y => AXIS_CENTER,
            Axis::R if held(Button::R) => 0x00,
            Axis::L if held(Button::L) => 0x00,
            Axis::R | Axis::L => TRIGGER_RELEASED,
        }
    }

    /// All four axes in X, Y, R, L order
    pub fn axes(peripheral: Option<&RawSnapshot>) -> [u8; 4] {
        Axis::ALL.map(|axis| Self::axis(peripheral, axis))
    }

    pub fn axis_at<B: PeripheralBus>(table: &PortTable<B>, port: usize, axis: Axis) -> u8 {
        Self::axis(table.peripheral(port), axis)
    }
}
