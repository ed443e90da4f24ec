//! Trace playback against a port table
//!
//! Each frame of a [`Trace`] is staged on a [`MemoryBus`] and followed by one
//! [`PortTable::poll`]. After every poll the replayer reads back what a game
//! would see through the virtual ports.

use crate::trace::{FrameSpec, Trace};
use smpc::bus::{MemoryBus, SlotRef};
use smpc::controllers::{AnalogPad, Controller, Profile};
use smpc::input::{self, Buttons};
use smpc::peripheral::{DeviceType, RawSnapshot, type_of};
use smpc::ports::{PollConfig, PortTable};
use smpc::types::PhysicalPort;
use std::fmt;
use tracing::{debug, info};

/// Replay options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayConfig {
    pub poll: PollConfig,
    /// Report digital-mode axes for standard pads
    pub synthesize_axes: bool,
    /// Include virtual ports with nothing connected
    pub show_empty: bool,
}

/// What one virtual port reported after a poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortReport {
    pub port: usize,
    pub slot: Option<SlotRef>,
    pub device: DeviceType,
    pub held: Buttons,
    pub pressed: Buttons,
    pub released: Buttons,
    pub axes: Option<[u8; 4]>,
}

impl PortReport {
    fn read(
        port: usize,
        slot: Option<SlotRef>,
        peripheral: Option<&RawSnapshot>,
        config: &ReplayConfig,
    ) -> Self {
        let live = peripheral.filter(|p| p.is_connected());
        let axes = match Profile::select(live) {
            Some(profile @ Profile::Analog) => profile.axes(live),
            _ if config.synthesize_axes && AnalogPad::is_connected(live) => {
                Some(AnalogPad::axes(live))
            }
            _ => None,
        };

        Self {
            port,
            slot,
            device: type_of(peripheral),
            held: live.map(input::held).unwrap_or_default(),
            pressed: live.map(input::pressed).unwrap_or_default(),
            released: live.map(input::released).unwrap_or_default(),
            axes,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.device != DeviceType::NotConnected
    }
}

impl fmt::Display for PortReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:<2} ", self.port + 1)?;
        if !self.is_connected() {
            return write!(f, "empty");
        }
        write!(f, "{:<14} held {}", self.device.to_string(), self.held)?;
        if !self.pressed.is_empty() {
            write!(f, " pressed {}", self.pressed)?;
        }
        if !self.released.is_empty() {
            write!(f, " released {}", self.released)?;
        }
        if let Some([x, y, r, l]) = self.axes {
            write!(f, " axes x={:02X} y={:02X} r={:02X} l={:02X}", x, y, r, l)?;
        }
        if let Some(slot) = self.slot {
            write!(f, " ({})", slot)?;
        }
        Ok(())
    }
}

/// Everything reported by one poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    /// Poll number, starting at 1
    pub frame: u64,
    pub ports: Vec<PortReport>,
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {}", self.frame)?;
        if self.ports.is_empty() {
            return write!(f, ": no devices");
        }
        for port in &self.ports {
            write!(f, "\n  {}", port)?;
        }
        Ok(())
    }
}

/// Plays frames into a port table and collects reports
pub struct Replayer {
    table: PortTable<MemoryBus>,
    config: ReplayConfig,
}

impl Replayer {
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            table: PortTable::with_config(MemoryBus::new(), config.poll),
            config,
        }
    }

    pub fn table(&self) -> &PortTable<MemoryBus> {
        &self.table
    }

    /// Stage one frame, poll once and report
    pub fn step(&mut self, frame: &FrameSpec) -> FrameReport {
        for port in PhysicalPort::ALL {
            self.table.bus_mut().stage(port, frame.port(port).clone());
        }
        self.table.poll();

        let ports: Vec<PortReport> = (0..self.table.count())
            .map(|port| {
                PortReport::read(
                    port,
                    self.table.slot(port),
                    self.table.peripheral(port),
                    &self.config,
                )
            })
            .filter(|report| self.config.show_empty || report.is_connected())
            .collect();

        debug!(
            frame = self.table.frame(),
            connected = self.table.connected_count(),
            "replayed frame"
        );

        FrameReport {
            frame: self.table.frame(),
            ports,
        }
    }

    /// Replay a whole trace, one report per poll
    pub fn run(&mut self, trace: &Trace) -> Vec<FrameReport> {
        let reports: Vec<FrameReport> = trace.polls().map(|frame| self.step(frame)).collect();
        info!(polls = reports.len(), "replay finished");
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;
    use smpc::input::Button;

    fn replay(source: &str, config: ReplayConfig) -> Vec<FrameReport> {
        let trace = parse(source).unwrap();
        Replayer::new(config).run(&trace)
    }

    #[test]
    fn test_press_hold_release() {
        let reports = replay(
            "frame { port 1: device gamepad buttons a }
             frame * 2 { port 1: device gamepad buttons a+b }
             frame { port 1: device gamepad }",
            ReplayConfig::default(),
        );

        assert_eq!(reports.len(), 4);
        let p1: Vec<&PortReport> = reports.iter().map(|r| &r.ports[0]).collect();

        assert_eq!(p1[0].pressed, Buttons::from(Button::A));
        assert_eq!(p1[1].pressed, Buttons::from(Button::B));
        assert_eq!(p1[1].held, Button::A | Button::B);
        assert_eq!(p1[2].pressed, Buttons::NONE);
        assert_eq!(p1[2].held, Button::A | Button::B);
        assert_eq!(p1[3].released, Button::A | Button::B);
        assert_eq!(p1[3].held, Buttons::NONE);
        assert_eq!(reports[3].frame, 4);
    }

    #[test]
    fn test_hub_layout() {
        let reports = replay(
            "frame { port 1: device gamepad  port 2: hub { device 0x16 empty device gamepad } }",
            ReplayConfig::default(),
        );

        let ports: Vec<(usize, DeviceType)> = reports[0]
            .ports
            .iter()
            .map(|report| (report.port, report.device))
            .collect();
        assert_eq!(
            ports,
            vec![(0, DeviceType::Gamepad), (6, DeviceType::Analog3dPad), (8, DeviceType::Gamepad)]
        );
        assert_eq!(
            reports[0].ports[1].slot,
            Some(SlotRef::chain(PhysicalPort::Two, 0))
        );
    }

    #[test]
    fn test_axes_reporting() {
        let source = "frame { port 1: device analog-3d-pad axes 0x10 0x20 0x30 0x40
                              port 2: device gamepad buttons left+r }";

        let reports = replay(source, ReplayConfig::default());
        assert_eq!(reports[0].ports[0].axes, Some([0x10, 0x20, 0x30, 0x40]));
        assert_eq!(reports[0].ports[1].axes, None);

        let config = ReplayConfig {
            synthesize_axes: true,
            ..ReplayConfig::default()
        };
        let reports = replay(source, config);
        assert_eq!(reports[0].ports[1].axes, Some([0xFF, 0x7F, 0x00, 0xFF]));
    }

    #[test]
    fn test_show_empty() {
        let config = ReplayConfig {
            show_empty: true,
            ..ReplayConfig::default()
        };
        let reports = replay("frame { port 2: device gamepad }", config);

        // An empty port 1 takes no virtual ports, so port 2 lands on P1
        assert_eq!(reports[0].ports.len(), 12);
        assert_eq!(reports[0].ports[0].device, DeviceType::Gamepad);
        assert_eq!(reports[0].ports[1].device, DeviceType::NotConnected);
        assert_eq!(reports[0].ports[1].to_string(), "P2  empty");
        assert_eq!(reports[0].ports[6].device, DeviceType::NotConnected);
    }

    #[test]
    fn test_stale_slot_after_unplug() {
        let source = "frame { port 1: hub { device gamepad device gamepad buttons start } }
                      frame { port 1: hub { device gamepad } }";

        // Ports past the shrunken chain keep pointing at the old record,
        // which reads as not connected.
        let reports = replay(source, ReplayConfig::default());
        assert_eq!(reports[1].ports.len(), 1);
        assert_eq!(reports[1].ports[0].port, 0);

        let config = ReplayConfig {
            show_empty: true,
            ..ReplayConfig::default()
        };
        let reports = replay(source, config);
        assert_eq!(reports[1].ports[1].device, DeviceType::NotConnected);
        assert_eq!(
            reports[1].ports[1].slot,
            Some(SlotRef::chain(PhysicalPort::One, 1))
        );
        assert_eq!(reports[1].ports[1].released, Buttons::NONE);

        let config = ReplayConfig {
            poll: PollConfig {
                clear_stale_slots: true,
            },
            show_empty: true,
            ..ReplayConfig::default()
        };
        let reports = replay(source, config);
        assert_eq!(reports[1].ports[1].slot, None);
    }

    #[test]
    fn test_frame_display() {
        let reports = replay(
            "frame { port 1: device gamepad buttons a }
             frame { }",
            ReplayConfig::default(),
        );

        assert_eq!(
            reports[0].to_string(),
            "frame 1\n  P1  gamepad        held [A] pressed [A] (port 1 direct)"
        );
        assert_eq!(reports[1].to_string(), "frame 2: no devices");
    }
}
