//! # SMPC - Sega Saturn peripheral input
//!
//! Controller polling for the two Saturn connectors, multitaps included.
//!
//! ## Features
//!
//! - **Port table**: flattens both connectors into 12 virtual ports
//! - **Classification**: device family and type from the identity byte
//! - **Edges**: held, just pressed and just released per button
//! - **Controllers**: standard pad and 3D pad profiles, analog axes
//! - **Components**: per-entity input state synced from a port
//!
//! ## Quick Start
//!
//! ```
//! use smpc::prelude::*;
//!
//! let mut bus = MemoryBus::new();
//! bus.stage(
//!     PhysicalPort::One,
//!     PortInput::Direct(DeviceInput::new(DeviceType::Gamepad).buttons(Button::A)),
//! );
//!
//! let mut ports = PortTable::new(bus);
//!
//! // Once per frame
//! ports.poll();
//!
//! if Gamepad::is_pressed_at(&ports, 0, Button::A) {
//!     // jump
//! }
//! ```
//!
//! ## Modules
//!
//! - [`ports`] - Virtual port table and polling
//! - [`bus`] - Bus seam and the in-memory bus
//! - [`peripheral`] - Device records and classification
//! - [`input`] - Button masks and edge detection
//! - [`controllers`] - Controller profiles
//! - [`component`] - Per-entity input state
//! - [`types`] - Port geometry and payload layout

pub mod bus;
pub mod component;
pub mod controllers;
pub mod error;
pub mod input;
pub mod peripheral;
pub mod ports;
pub mod types;

pub use error::{PortError, PortResult};

/// Convenient re-exports for common usage
///
/// Import everything you need with:
/// ```
/// use smpc::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bus::{DeviceInput, MemoryBus, PeripheralBus, PortInput, SlotRef};
    pub use crate::component::{InputSource, InputState};
    pub use crate::controllers::{AnalogPad, Axis, Controller, Gamepad, Profile};
    pub use crate::input::{self, Button, Buttons};
    pub use crate::peripheral::{DeviceType, Family, RawSnapshot};
    pub use crate::ports::{PollConfig, PortTable};
    pub use crate::types::*;
}
