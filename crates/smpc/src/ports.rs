//! Virtual port table
//!
//! Flattens the two physical connectors into [`PORT_CAPACITY`] virtual
//! ports. Polling walks the connectors in order with a single cursor:
//!
//! - a directly wired device takes the slot under the cursor and the cursor
//!   skips a whole block of [`HUB_SLOTS`];
//! - otherwise every multitap position advances the cursor by one, and only
//!   connected sub-devices are written.
//!
//! Slots are overwritten, never cleared, so a slot that nothing writes this
//! frame keeps the handle it held before. [`PollConfig::clear_stale_slots`]
//! switches to clearing the whole table before each rebuild instead.
//!
//! # Example
//!
//! ```
//! use smpc::bus::{DeviceInput, MemoryBus, PortInput};
//! use smpc::peripheral::DeviceType;
//! use smpc::ports::PortTable;
//! use smpc::types::PhysicalPort;
//!
//! let mut bus = MemoryBus::new();
//! bus.stage(PhysicalPort::One, PortInput::Direct(DeviceInput::new(DeviceType::Gamepad)));
//!
//! let mut table = PortTable::new(bus);
//! table.poll();
//!
//! assert_eq!(table.device_type(0), DeviceType::Gamepad);
//! assert!(table.peripheral(1).is_none());
//! ```

use crate::bus::{PeripheralBus, SlotRef};
use crate::error::{PortError, PortResult};
use crate::peripheral::{DeviceType, Family, RawSnapshot, family_of, type_of};
use crate::types::{HUB_SLOTS, PORT_CAPACITY, PhysicalPort};
use tracing::{debug, trace, warn};

/// Polling options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollConfig {
    /// Empty every slot before repopulating it
    ///
    /// Off by default. Turning it on changes what stale slots report across
    /// hot-plug events.
    pub clear_stale_slots: bool,
}

/// Registry of virtual ports over an injected bus
pub struct PortTable<B> {
    bus: B,
    slots: [Option<SlotRef>; PORT_CAPACITY],
    config: PollConfig,
    frame: u64,
}

impl<B: PeripheralBus> PortTable<B> {
    pub fn new(bus: B) -> Self {
        Self::with_config(bus, PollConfig::default())
    }

    pub fn with_config(bus: B, config: PollConfig) -> Self {
        Self {
            bus,
            slots: [None; PORT_CAPACITY],
            config,
            frame: 0,
        }
    }

    /// Number of virtual ports
    #[inline]
    pub const fn count(&self) -> usize {
        PORT_CAPACITY
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Number of completed polls
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable bus access, for staging input between polls
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Read the bus and rebuild the virtual ports (call once per frame)
    pub fn poll(&mut self) {
        self.bus.process();

        if self.config.clear_stale_slots {
            self.slots = [None; PORT_CAPACITY];
        }

        let mut cursor = 0;
        for port in PhysicalPort::ALL {
            match self.bus.primary(port) {
                Some(primary) if primary.is_connected() => {
                    write_slot(&mut self.slots, cursor, SlotRef::primary(port));
                    cursor += HUB_SLOTS;
                }
                _ => {
                    let chain = self.bus.chain(port);
                    for (position, record) in chain.iter().take(HUB_SLOTS).enumerate() {
                        if record.is_connected() {
                            let slot = SlotRef::chain(port, position as u8);
                            write_slot(&mut self.slots, cursor, slot);
                        }
                        cursor += 1;
                    }
                }
            }
        }

        self.frame += 1;
        debug!(
            frame = self.frame,
            cursor,
            connected = self.connected_count(),
            "polled peripherals"
        );
    }

    /// Connected record at a virtual port
    ///
    /// `Ok(None)` when the slot is empty or its record is not connected.
    pub fn try_peripheral(&self, port: usize) -> PortResult<Option<&RawSnapshot>> {
        let slot = self
            .slots
            .get(port)
            .ok_or_else(|| PortError::port_out_of_range(port, PORT_CAPACITY))?;
        Ok(self.resolve(*slot))
    }

    /// Connected record at a virtual port
    ///
    /// # Panics
    /// If `port` is not below [`PORT_CAPACITY`].
    pub fn peripheral(&self, port: usize) -> Option<&RawSnapshot> {
        match self.try_peripheral(port) {
            Ok(peripheral) => peripheral,
            Err(err) => panic!("{err}"),
        }
    }

    /// The `n`-th connected record, counting slots in ascending order
    ///
    /// `Ok(None)` when fewer than `n + 1` devices are connected.
    pub fn try_nth_connected(&self, n: usize) -> PortResult<Option<&RawSnapshot>> {
        if n >= PORT_CAPACITY {
            return Err(PortError::index_out_of_range(n, PORT_CAPACITY));
        }
        Ok(self.connected().nth(n).map(|(_, peripheral)| peripheral))
    }

    /// The `n`-th connected record, counting slots in ascending order
    ///
    /// # Panics
    /// If `n` is not below [`PORT_CAPACITY`].
    pub fn nth_connected(&self, n: usize) -> Option<&RawSnapshot> {
        match self.try_nth_connected(n) {
            Ok(peripheral) => peripheral,
            Err(err) => panic!("{err}"),
        }
    }

    /// Connected records with their virtual port, ascending
    pub fn connected(&self) -> impl Iterator<Item = (usize, &RawSnapshot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(port, slot)| self.resolve(*slot).map(|peripheral| (port, peripheral)))
    }

    pub fn connected_count(&self) -> usize {
        self.connected().count()
    }

    /// Handle currently stored at a virtual port, stale or not
    ///
    /// # Panics
    /// If `port` is not below [`PORT_CAPACITY`].
    pub fn slot(&self, port: usize) -> Option<SlotRef> {
        assert!(port < PORT_CAPACITY, "{}", PortError::port_out_of_range(port, PORT_CAPACITY));
        self.slots[port]
    }

    /// Device type at a virtual port
    ///
    /// # Panics
    /// If `port` is not below [`PORT_CAPACITY`].
    pub fn device_type(&self, port: usize) -> DeviceType {
        type_of(self.peripheral(port))
    }

    /// Device family at a virtual port
    ///
    /// # Panics
    /// If `port` is not below [`PORT_CAPACITY`].
    pub fn family(&self, port: usize) -> Family {
        family_of(self.peripheral(port))
    }

    fn resolve(&self, slot: Option<SlotRef>) -> Option<&RawSnapshot> {
        slot.and_then(|slot| slot.resolve(&self.bus))
            .filter(|peripheral| peripheral.is_connected())
    }
}

fn write_slot(slots: &mut [Option<SlotRef>; PORT_CAPACITY], cursor: usize, slot: SlotRef) {
    match slots.get_mut(cursor) {
        Some(entry) => {
            trace!(virtual_port = cursor, %slot, "slot written");
            *entry = Some(slot);
        }
        None => warn!(virtual_port = cursor, %slot, "cursor past port capacity"),
    }
}
