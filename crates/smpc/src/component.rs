//! Per-entity input component
//!
//! Game objects carry an [`InputState`] naming where their input comes from.
//! Once per frame, after [`PortTable::poll`], [`InputState::sync`] copies the
//! held buttons of the pad on that virtual port into the component.
//!
//! AI and network sources are driven elsewhere and never touched by `sync`.

use crate::bus::PeripheralBus;
use crate::controllers::{Controller, Gamepad};
use crate::input::{Button, Buttons};
use crate::ports::PortTable;
use crate::types::PORT_CAPACITY;
use tracing::warn;

/// Where an entity's input comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InputSource {
    /// A virtual port, 0 for P1 up to 11 for P12
    Port(u8),
    /// Driven by game AI
    Ai,
    /// Driven by a network peer
    Network,
    /// No input at all
    #[default]
    NotPresent,
}

impl InputSource {
    const RAW_AI: u8 = PORT_CAPACITY as u8;
    const RAW_NETWORK: u8 = Self::RAW_AI + 1;
    const RAW_NOT_PRESENT: u8 = Self::RAW_NETWORK + 1;

    /// Source for a virtual port, `None` past the last port
    pub const fn port(port: usize) -> Option<InputSource> {
        if port < PORT_CAPACITY {
            Some(InputSource::Port(port as u8))
        } else {
            None
        }
    }

    /// Decode the packed 4-bit representation (P1..P12, AI, network, none)
    pub const fn from_raw(raw: u8) -> Option<InputSource> {
        match raw {
            Self::RAW_AI => Some(InputSource::Ai),
            Self::RAW_NETWORK => Some(InputSource::Network),
            Self::RAW_NOT_PRESENT => Some(InputSource::NotPresent),
            port => Self::port(port as usize),
        }
    }

    pub const fn raw(self) -> u8 {
        match self {
            InputSource::Port(port) => port,
            InputSource::Ai => Self::RAW_AI,
            InputSource::Network => Self::RAW_NETWORK,
            InputSource::NotPresent => Self::RAW_NOT_PRESENT,
        }
    }

    /// Virtual port index, for port sources
    pub const fn virtual_port(self) -> Option<usize> {
        match self {
            InputSource::Port(port) => Some(port as usize),
            _ => None,
        }
    }
}

/// Held buttons of one entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub source: InputSource,
    pub buttons: Buttons,
}

impl InputState {
    pub fn new(source: InputSource) -> Self {
        Self {
            source,
            buttons: Buttons::NONE,
        }
    }

    /// Pull the held state from the pad behind `source`
    ///
    /// Returns `true` when the state was updated. Anything other than a
    /// connected control pad on a valid port leaves the state as it was.
    pub fn sync<B: PeripheralBus>(&mut self, table: &PortTable<B>) -> bool {
        let Some(port) = self.source.virtual_port() else {
            return false;
        };

        let peripheral = match table.try_peripheral(port) {
            Ok(peripheral) => peripheral,
            Err(err) => {
                warn!(%err, "input source points past the port table");
                return false;
            }
        };

        if !Gamepad::is_connected(peripheral) {
            return false;
        }

        self.buttons = Gamepad::held(peripheral);
        true
    }

    #[inline]
    pub const fn is_held(&self, button: Button) -> bool {
        self.buttons.contains(button)
    }

    pub const fn up(&self) -> bool {
        self.buttons.up()
    }

    pub const fn down(&self) -> bool {
        self.buttons.down()
    }

    pub const fn left(&self) -> bool {
        self.buttons.left()
    }

    pub const fn right(&self) -> bool {
        self.buttons.right()
    }

    pub const fn start(&self) -> bool {
        self.is_held(Button::START)
    }

    pub const fn a(&self) -> bool {
        self.is_held(Button::A)
    }

    pub const fn b(&self) -> bool {
        self.is_held(Button::B)
    }

    pub const fn c(&self) -> bool {
        self.is_held(Button::C)
    }

    pub const fn x(&self) -> bool {
        self.is_held(Button::X)
    }

    pub const fn y(&self) -> bool {
        self.is_held(Button::Y)
    }

    pub const fn z(&self) -> bool {
        self.is_held(Button::Z)
    }

    /// Right shoulder
    pub const fn rt(&self) -> bool {
        self.is_held(Button::R)
    }

    /// Left shoulder
    pub const fn lt(&self) -> bool {
        self.is_held(Button::L)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{DeviceInput, MemoryBus, PortInput};
    use crate::peripheral::DeviceType;
    use crate::types::PhysicalPort;
    use pretty_assertions::assert_eq;

    fn table(port1: PortInput) -> PortTable<MemoryBus> {
        let mut bus = MemoryBus::new();
        bus.stage(PhysicalPort::One, port1);
        let mut table = PortTable::new(bus);
        table.poll();
        table
    }

    #[test]
    fn test_raw_encoding() {
        assert_eq!(InputSource::from_raw(0), Some(InputSource::Port(0)));
        assert_eq!(InputSource::from_raw(11), Some(InputSource::Port(11)));
        assert_eq!(InputSource::from_raw(12), Some(InputSource::Ai));
        assert_eq!(InputSource::from_raw(13), Some(InputSource::Network));
        assert_eq!(InputSource::from_raw(14), Some(InputSource::NotPresent));
        assert_eq!(InputSource::from_raw(15), None);

        for raw in 0..15 {
            assert_eq!(InputSource::from_raw(raw).map(InputSource::raw), Some(raw));
        }
        assert_eq!(InputSource::port(12), None);
    }

    #[test]
    fn test_sync_from_gamepad() {
        let table = table(PortInput::Direct(
            DeviceInput::new(DeviceType::Gamepad).buttons(Button::A | Button::LEFT | Button::L),
        ));
        let mut state = InputState::new(InputSource::Port(0));

        assert!(state.sync(&table));
        assert!(state.a());
        assert!(state.left());
        assert!(state.lt());
        assert!(!state.b());
        assert!(!state.rt());
        assert_eq!(state.buttons, Button::A | Button::LEFT | Button::L);
    }

    #[test]
    fn test_sync_skips_other_sources() {
        let table = table(PortInput::Direct(
            DeviceInput::new(DeviceType::Gamepad).buttons(Button::START),
        ));

        for source in [InputSource::Ai, InputSource::Network, InputSource::NotPresent] {
            let mut state = InputState {
                source,
                buttons: Buttons::from(Button::B),
            };
            assert!(!state.sync(&table));
            assert_eq!(state.buttons, Buttons::from(Button::B));
        }
    }

    #[test]
    fn test_sync_keeps_state_without_gamepad() {
        let table = table(PortInput::Direct(
            DeviceInput::new(DeviceType::Analog3dPad).buttons(Button::START),
        ));
        let mut state = InputState {
            source: InputSource::Port(0),
            buttons: Buttons::from(Button::C),
        };

        assert!(!state.sync(&table));
        assert!(state.c());
        assert!(!state.start());

        let mut state = InputState::new(InputSource::Port(20));
        assert!(!state.sync(&table));
    }
}
