//! Peripheral bus seam
//!
//! The bus is whatever performs the actual hardware read. Once per frame it
//! refreshes its device records in place; the [`PortTable`] then walks those
//! records to rebuild the virtual ports.
//!
//! Records are referred to by [`SlotRef`], a handle naming a connector and a
//! position on it, rather than by pointer. A handle is resolved against the
//! bus each time it is read, so a handle kept from an earlier frame sees
//! whatever record now lives at that position.
//!
//! [`MemoryBus`] is an in-memory bus: callers stage what each connector
//! should report and the next [`process`](PeripheralBus::process) applies it.
//!
//! [`PortTable`]: crate::ports::PortTable

use crate::input::Buttons;
use crate::peripheral::{DeviceType, RawSnapshot};
use crate::types::{AXIS_OFFSET, BUTTONS_OFFSET, HUB_SLOTS, PhysicalPort};
use tracing::trace;

/// Raw per-connector read primitive
pub trait PeripheralBus {
    /// Run one bus cycle, refreshing every record in place
    fn process(&mut self);

    /// Record of the device wired directly to `port`, if the bus has one
    ///
    /// A record that is present but not connected means the connector hosts a
    /// multitap (or nothing); its devices are then listed by [`chain`](Self::chain).
    fn primary(&self, port: PhysicalPort) -> Option<&RawSnapshot>;

    /// Records behind a multitap on `port`, in chain order
    fn chain(&self, port: PhysicalPort) -> &[RawSnapshot];
}

/// Position of a record on a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotSource {
    /// The directly wired device
    Primary,
    /// Sub-device at this position of the multitap chain
    Chain(u8),
}

/// Handle to one bus record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub port: PhysicalPort,
    pub source: SlotSource,
}

impl SlotRef {
    pub const fn primary(port: PhysicalPort) -> Self {
        Self {
            port,
            source: SlotSource::Primary,
        }
    }

    pub const fn chain(port: PhysicalPort, position: u8) -> Self {
        Self {
            port,
            source: SlotSource::Chain(position),
        }
    }

    /// Look the record up on `bus`
    ///
    /// `None` when the bus no longer has a record at this position.
    pub fn resolve<B: PeripheralBus + ?Sized>(self, bus: &B) -> Option<&RawSnapshot> {
        match self.source {
            SlotSource::Primary => bus.primary(self.port),
            SlotSource::Chain(position) => bus.chain(self.port).get(position as usize),
        }
    }
}

impl core::fmt::Display for SlotRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.source {
            SlotSource::Primary => write!(f, "{} direct", self.port),
            SlotSource::Chain(position) => write!(f, "{} tap {}", self.port, position + 1),
        }
    }
}

/// Reading staged for one connected device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInput {
    pub type_code: u8,
    pub data: Vec<u8>,
}

impl DeviceInput {
    /// Device of a known type with no buttons active
    pub fn new(device_type: DeviceType) -> Self {
        Self::with_type_code(device_type.code())
    }

    pub fn with_type_code(type_code: u8) -> Self {
        Self {
            type_code,
            data: vec![0; AXIS_OFFSET],
        }
    }

    /// Set the button word
    pub fn buttons(mut self, buttons: impl Into<Buttons>) -> Self {
        let word = buttons.into().raw().to_be_bytes();
        self.ensure_len(BUTTONS_OFFSET + 2);
        self.data[BUTTONS_OFFSET..BUTTONS_OFFSET + 2].copy_from_slice(&word);
        self
    }

    /// Set the four analog axis bytes (X, Y, R, L)
    pub fn axes(mut self, axes: [u8; 4]) -> Self {
        self.ensure_len(AXIS_OFFSET + axes.len());
        self.data[AXIS_OFFSET..AXIS_OFFSET + axes.len()].copy_from_slice(&axes);
        self
    }

    /// Replace the whole payload, button header included
    pub fn payload(mut self, bytes: &[u8]) -> Self {
        self.data = bytes.to_vec();
        self
    }

    fn ensure_len(&mut self, len: usize) {
        if self.data.len() < len {
            self.data.resize(len, 0);
        }
    }
}

/// What a connector reports on the next cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PortInput {
    /// Nothing attached
    #[default]
    Unplugged,
    /// One device wired directly
    Direct(DeviceInput),
    /// Multitap; `None` entries are empty tap positions
    Hub(Vec<Option<DeviceInput>>),
}

#[derive(Debug, Default)]
struct PortRecords {
    primary: RawSnapshot,
    chain: Vec<RawSnapshot>,
}

/// In-memory bus driven by staged [`PortInput`]s
///
/// Staged input persists: a connector keeps reporting the same reading on
/// every cycle until something else is staged.
#[derive(Debug, Default)]
pub struct MemoryBus {
    staged: [PortInput; 2],
    records: [PortRecords; 2],
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set what `port` reports from the next cycle on
    pub fn stage(&mut self, port: PhysicalPort, input: PortInput) {
        self.staged[port.index()] = input;
    }

    pub fn staged(&self, port: PhysicalPort) -> &PortInput {
        &self.staged[port.index()]
    }
}

impl PeripheralBus for MemoryBus {
    fn process(&mut self) {
        for port in PhysicalPort::ALL {
            let records = &mut self.records[port.index()];
            match &self.staged[port.index()] {
                PortInput::Unplugged => {
                    trace!(%port, "unplugged");
                    records.primary.disconnect();
                    records.chain.clear();
                }
                PortInput::Direct(device) => {
                    trace!(%port, type_code = device.type_code, "direct device");
                    records.primary.refresh(true, device.type_code, &device.data);
                    records.chain.clear();
                }
                PortInput::Hub(taps) => {
                    let taps = &taps[..taps.len().min(HUB_SLOTS)];
                    trace!(%port, taps = taps.len(), "multitap");
                    records.primary.disconnect();
                    records.chain.resize_with(taps.len(), RawSnapshot::default);
                    for (record, tap) in records.chain.iter_mut().zip(taps) {
                        match tap {
                            Some(device) => record.refresh(true, device.type_code, &device.data),
                            None => record.disconnect(),
                        }
                    }
                }
            }
        }
    }

    fn primary(&self, port: PhysicalPort) -> Option<&RawSnapshot> {
        Some(&self.records[port.index()].primary)
    }

    fn chain(&self, port: PhysicalPort) -> &[RawSnapshot] {
        &self.records[port.index()].chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_device_input_layout() {
        let device = DeviceInput::new(DeviceType::Analog3dPad)
            .buttons(Button::A | Button::L)
            .axes([0x10, 0x20, 0x30, 0x40]);

        assert_eq!(device.type_code, 0x16);
        assert_eq!(device.data, vec![0x84, 0x00, 0x10, 0x20, 0x30, 0x40]);
    }

    #[test]
    fn test_direct_device() {
        let mut bus = MemoryBus::new();
        bus.stage(
            PhysicalPort::One,
            PortInput::Direct(DeviceInput::new(DeviceType::Gamepad).buttons(Button::START)),
        );
        bus.process();

        let pad = bus.primary(PhysicalPort::One).unwrap();
        assert!(pad.is_connected());
        assert_eq!(pad.current(), 0x0800);
        assert!(bus.chain(PhysicalPort::One).is_empty());
        assert!(!bus.primary(PhysicalPort::Two).unwrap().is_connected());
    }

    #[test]
    fn test_staged_input_persists() {
        let mut bus = MemoryBus::new();
        bus.stage(
            PhysicalPort::Two,
            PortInput::Direct(DeviceInput::new(DeviceType::Gamepad).buttons(Button::B)),
        );
        bus.process();
        bus.process();

        let pad = bus.primary(PhysicalPort::Two).unwrap();
        assert_eq!(pad.current(), 0x0100);
        assert_eq!(pad.previous(), 0x0100);
    }

    #[test]
    fn test_hub_chain() {
        let mut bus = MemoryBus::new();
        bus.stage(
            PhysicalPort::Two,
            PortInput::Hub(vec![
                Some(DeviceInput::new(DeviceType::Gamepad)),
                None,
                Some(DeviceInput::new(DeviceType::Analog3dPad)),
            ]),
        );
        bus.process();

        assert!(!bus.primary(PhysicalPort::Two).unwrap().is_connected());
        let chain = bus.chain(PhysicalPort::Two);
        assert_eq!(chain.len(), 3);
        assert!(chain[0].is_connected());
        assert!(!chain[1].is_connected());
        assert_eq!(chain[2].device_type(), DeviceType::Analog3dPad);
    }

    #[test]
    fn test_hub_truncated_to_six() {
        let mut bus = MemoryBus::new();
        bus.stage(
            PhysicalPort::One,
            PortInput::Hub(vec![Some(DeviceInput::new(DeviceType::Gamepad)); 8]),
        );
        bus.process();

        assert_eq!(bus.chain(PhysicalPort::One).len(), HUB_SLOTS);
    }

    #[test]
    fn test_slot_ref_resolution() {
        let mut bus = MemoryBus::new();
        bus.stage(
            PhysicalPort::One,
            PortInput::Hub(vec![Some(DeviceInput::new(DeviceType::Mouse))]),
        );
        bus.process();

        let tap = SlotRef::chain(PhysicalPort::One, 0);
        assert_eq!(tap.resolve(&bus).unwrap().device_type(), DeviceType::Mouse);
        assert!(SlotRef::chain(PhysicalPort::One, 1).resolve(&bus).is_none());
        assert_eq!(tap.to_string(), "port 1 tap 1");
        assert_eq!(SlotRef::primary(PhysicalPort::Two).to_string(), "port 2 direct");

        bus.stage(PhysicalPort::One, PortInput::Unplugged);
        bus.process();
        assert!(tap.resolve(&bus).is_none());
    }

    #[test]
    fn test_reconnect_carries_stale_previous() {
        let mut bus = MemoryBus::new();
        let pressed = || {
            PortInput::Hub(vec![Some(
                DeviceInput::new(DeviceType::Gamepad).buttons(Button::A),
            )])
        };
        bus.stage(PhysicalPort::One, pressed());
        bus.process();
        bus.stage(PhysicalPort::One, PortInput::Hub(vec![None]));
        bus.process();
        bus.stage(
            PhysicalPort::One,
            PortInput::Hub(vec![Some(DeviceInput::new(DeviceType::Gamepad))]),
        );
        bus.process();

        // The record still remembers A from before the unplug
        let pad = &bus.chain(PhysicalPort::One)[0];
        assert_eq!(pad.current(), 0x0000);
        assert_eq!(pad.previous(), 0x0400);
    }
}
