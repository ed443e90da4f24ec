//! Peripheral records and device classification
//!
//! Every device seen by the bus, whether wired directly to a connector or
//! sitting behind a multitap, is mirrored by one [`RawSnapshot`]. The record
//! keeps the payload read on the latest bus cycle next to the payload of the
//! cycle before, which is what edge detection compares.
//!
//! The identity byte reported by the hardware is split two ways:
//! [`Family`] from its high nibble and [`DeviceType`] from the full byte.

use crate::types::{AXIS_OFFSET, BUTTONS_OFFSET, PAYLOAD_SIZE};

/// Identity byte reported for an empty record
pub const NOT_CONNECTED_CODE: u8 = 0xFF;

/// Coarse device category, taken from the high nibble of the identity byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Digital controllers (control pad, fighting stick)
    Digital,
    /// Analog controllers (3D pad, racing wheel, mission stick)
    Analog,
    /// Pointing devices (mouse, light gun)
    Pointing,
    /// Keyboards
    Keyboard,
    /// Mega Drive controllers used through an adapter
    MegaDrive,
    /// Not connected or unknown
    Unknown,
    /// A high nibble with no assigned family
    Unrecognized(u8),
}

impl Family {
    /// Decode a family from an identity byte (only the high nibble is used)
    pub const fn from_bits(bits: u8) -> Family {
        match bits & 0xF0 {
            0x00 => Family::Digital,
            0x10 => Family::Analog,
            0x20 => Family::Pointing,
            0x30 => Family::Keyboard,
            0xE0 => Family::MegaDrive,
            0xF0 => Family::Unknown,
            other => Family::Unrecognized(other),
        }
    }

    /// Raw high-nibble value of the family
    pub const fn bits(self) -> u8 {
        match self {
            Family::Digital => 0x00,
            Family::Analog => 0x10,
            Family::Pointing => 0x20,
            Family::Keyboard => 0x30,
            Family::MegaDrive => 0xE0,
            Family::Unknown => 0xF0,
            Family::Unrecognized(bits) => bits & 0xF0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Family::Digital => "digital",
            Family::Analog => "analog",
            Family::Pointing => "pointing",
            Family::Keyboard => "keyboard",
            Family::MegaDrive => "mega-drive",
            Family::Unknown => "unknown",
            Family::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Fine-grained device identity, the full identity byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Standard control pad
    Gamepad,
    /// Racing wheel
    Racing,
    /// Mission stick
    AnalogPad,
    /// 3D control pad
    Analog3dPad,
    /// Saturn mouse
    Mouse,
    /// Light gun
    Gun,
    /// Keyboard
    Keyboard,
    /// 3 button Mega Drive pad
    Md3ButtonPad,
    /// 6 button Mega Drive pad
    Md6ButtonPad,
    /// Mega Drive mouse
    ShuttleMouse,
    /// Nothing connected
    NotConnected,
    /// An identity byte this crate does not know yet
    Unrecognized(u8),
}

impl DeviceType {
    /// Known device types, excluding [`DeviceType::NotConnected`]
    pub const KNOWN: [DeviceType; 10] = [
        DeviceType::Gamepad,
        DeviceType::Racing,
        DeviceType::AnalogPad,
        DeviceType::Analog3dPad,
        DeviceType::Mouse,
        DeviceType::Gun,
        DeviceType::Keyboard,
        DeviceType::Md3ButtonPad,
        DeviceType::Md6ButtonPad,
        DeviceType::ShuttleMouse,
    ];

    pub const fn from_code(code: u8) -> DeviceType {
        match code {
            0x02 => DeviceType::Gamepad,
            0x13 => DeviceType::Racing,
            0x15 => DeviceType::AnalogPad,
            0x16 => DeviceType::Analog3dPad,
            0x23 => DeviceType::Mouse,
            0x25 => DeviceType::Gun,
            0x34 => DeviceType::Keyboard,
            0xE1 => DeviceType::Md3ButtonPad,
            0xE2 => DeviceType::Md6ButtonPad,
            0xE3 => DeviceType::ShuttleMouse,
            NOT_CONNECTED_CODE => DeviceType::NotConnected,
            other => DeviceType::Unrecognized(other),
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            DeviceType::Gamepad => 0x02,
            DeviceType::Racing => 0x13,
            DeviceType::AnalogPad => 0x15,
            DeviceType::Analog3dPad => 0x16,
            DeviceType::Mouse => 0x23,
            DeviceType::Gun => 0x25,
            DeviceType::Keyboard => 0x34,
            DeviceType::Md3ButtonPad => 0xE1,
            DeviceType::Md6ButtonPad => 0xE2,
            DeviceType::ShuttleMouse => 0xE3,
            DeviceType::NotConnected => NOT_CONNECTED_CODE,
            DeviceType::Unrecognized(code) => code,
        }
    }

    /// Family this device type belongs to
    pub const fn family(self) -> Family {
        match self {
            DeviceType::NotConnected => Family::Unknown,
            other => Family::from_bits(other.code()),
        }
    }

    /// Short kebab-case name, as accepted by [`DeviceType::from_name`]
    pub const fn name(self) -> &'static str {
        match self {
            DeviceType::Gamepad => "gamepad",
            DeviceType::Racing => "racing",
            DeviceType::AnalogPad => "analog-pad",
            DeviceType::Analog3dPad => "analog-3d-pad",
            DeviceType::Mouse => "mouse",
            DeviceType::Gun => "gun",
            DeviceType::Keyboard => "keyboard",
            DeviceType::Md3ButtonPad => "md-3button",
            DeviceType::Md6ButtonPad => "md-6button",
            DeviceType::ShuttleMouse => "md-mouse",
            DeviceType::NotConnected => "not-connected",
            DeviceType::Unrecognized(_) => "unrecognized",
        }
    }

    /// Look up a known device type by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<DeviceType> {
        DeviceType::KNOWN
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(name))
    }
}

impl core::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceType::Unrecognized(code) => write!(f, "unrecognized(0x{:02X})", code),
            other => f.write_str(other.name()),
        }
    }
}

/// Classify the family of a device
///
/// Returns [`Family::Unknown`] when the device is not connected.
#[inline]
pub const fn classify_family(type_code: u8, connected: bool) -> Family {
    if connected {
        Family::from_bits(type_code & 0xF0)
    } else {
        Family::Unknown
    }
}

/// Classify the exact type of a device
///
/// Returns [`DeviceType::NotConnected`] when the device is not connected.
#[inline]
pub const fn classify_type(type_code: u8, connected: bool) -> DeviceType {
    if connected {
        DeviceType::from_code(type_code)
    } else {
        DeviceType::NotConnected
    }
}

/// Family of an optional record, `None` counting as not connected
#[inline]
pub fn family_of(peripheral: Option<&RawSnapshot>) -> Family {
    peripheral.map_or(Family::Unknown, RawSnapshot::family)
}

/// Type of an optional record, `None` counting as not connected
#[inline]
pub fn type_of(peripheral: Option<&RawSnapshot>) -> DeviceType {
    peripheral.map_or(DeviceType::NotConnected, RawSnapshot::device_type)
}

/// Double-buffered state of one device record
///
/// The bus refreshes a record in place once per cycle. Refreshing moves the
/// current payload into the previous one, so `previous()` always holds the
/// button word seen on the prior cycle of the same record, even when the
/// device behind it changed in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSnapshot {
    connected: bool,
    type_code: u8,
    data: [u8; PAYLOAD_SIZE],
    previous_data: [u8; PAYLOAD_SIZE],
}

impl RawSnapshot {
    /// Empty record, nothing connected and no history
    pub const fn disconnected() -> Self {
        Self {
            connected: false,
            type_code: NOT_CONNECTED_CODE,
            data: [0; PAYLOAD_SIZE],
            previous_data: [0; PAYLOAD_SIZE],
        }
    }

    /// Connected record holding `data` with an all-zero previous payload
    pub fn new(type_code: u8, data: &[u8]) -> Self {
        let mut snapshot = Self::disconnected();
        snapshot.refresh(true, type_code, data);
        snapshot
    }

    /// Connected record with explicit current and previous button words
    pub fn with_buttons(type_code: u8, current: u16, previous: u16) -> Self {
        let mut snapshot = Self::disconnected();
        snapshot.connected = true;
        snapshot.type_code = type_code;
        write_word(&mut snapshot.data, current);
        write_word(&mut snapshot.previous_data, previous);
        snapshot
    }

    /// Latch a new bus reading
    ///
    /// `data` is truncated or zero-filled to [`PAYLOAD_SIZE`].
    pub fn refresh(&mut self, connected: bool, type_code: u8, data: &[u8]) {
        self.previous_data = self.data;
        self.data = [0; PAYLOAD_SIZE];
        let len = data.len().min(PAYLOAD_SIZE);
        self.data[..len].copy_from_slice(&data[..len]);
        self.connected = connected;
        self.type_code = type_code;
    }

    /// Mark the record as unplugged
    ///
    /// Payloads are left as they are: the stale bits stay readable through
    /// [`current`](Self::current) but every edge query reports nothing.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.type_code = NOT_CONNECTED_CODE;
    }

    #[inline]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Identity byte as reported by the hardware
    #[inline]
    pub const fn type_code(&self) -> u8 {
        self.type_code
    }

    /// Button word of the latest cycle (set bit = active)
    #[inline]
    pub const fn current(&self) -> u16 {
        read_word(&self.data)
    }

    /// Button word of the cycle before
    #[inline]
    pub const fn previous(&self) -> u16 {
        read_word(&self.previous_data)
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn previous_payload(&self) -> &[u8] {
        &self.previous_data
    }

    /// Payload byte at `offset`, if within the buffer
    #[inline]
    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.data.get(offset).copied()
    }

    /// Raw axis byte `index` positions after the button header
    #[inline]
    pub fn axis_byte(&self, index: usize) -> Option<u8> {
        self.byte(AXIS_OFFSET + index)
    }

    #[inline]
    pub const fn family(&self) -> Family {
        classify_family(self.type_code, self.connected)
    }

    #[inline]
    pub const fn device_type(&self) -> DeviceType {
        classify_type(self.type_code, self.connected)
    }
}

impl Default for RawSnapshot {
    fn default() -> Self {
        Self::disconnected()
    }
}

const fn read_word(data: &[u8; PAYLOAD_SIZE]) -> u16 {
    u16::from_be_bytes([data[BUTTONS_OFFSET], data[BUTTONS_OFFSET + 1]])
}

fn write_word(data: &mut [u8; PAYLOAD_SIZE], word: u16) {
    data[BUTTONS_OFFSET..BUTTONS_OFFSET + 2].copy_from_slice(&word.to_be_bytes());
}
