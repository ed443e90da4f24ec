//! Button masks and edge detection
//!
//! Digital buttons arrive as a 16-bit word per device, one bit per button,
//! set while the button is active. Comparing the word of the latest bus cycle
//! with the word of the cycle before gives three answers per button: held,
//! just pressed and just released.
//!
//! # Example
//!
//! ```
//! use smpc::input::{self, Button};
//! use smpc::peripheral::RawSnapshot;
//!
//! // Right went down since the last cycle
//! let pad = RawSnapshot::with_buttons(0x02, 0x0040, 0x0000);
//!
//! assert!(input::is_held(&pad, Button::RIGHT));
//! assert!(input::is_pressed(&pad, Button::RIGHT));
//! assert!(!input::is_released(&pad, Button::RIGHT));
//! ```

use crate::peripheral::RawSnapshot;

/// Button flags
///
/// Bit positions match the word delivered by the bus for Saturn pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Button {
    /// Z button
    Z = 0x0001,
    /// Y button
    Y = 0x0002,
    /// X button
    X = 0x0004,
    /// Right shoulder
    R = 0x0008,
    /// D-pad Up
    UP = 0x0010,
    /// D-pad Down
    DOWN = 0x0020,
    /// D-pad Right
    RIGHT = 0x0040,
    /// D-pad Left
    LEFT = 0x0080,
    /// B button
    B = 0x0100,
    /// C button
    C = 0x0200,
    /// A button
    A = 0x0400,
    /// Start button
    START = 0x0800,
    /// Left shoulder
    L = 0x8000,
}

impl Button {
    /// Every button, lowest bit first
    pub const ALL: [Button; 13] = [
        Button::Z,
        Button::Y,
        Button::X,
        Button::R,
        Button::UP,
        Button::DOWN,
        Button::RIGHT,
        Button::LEFT,
        Button::B,
        Button::C,
        Button::A,
        Button::START,
        Button::L,
    ];

    #[inline]
    pub const fn bits(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            Button::Z => "Z",
            Button::Y => "Y",
            Button::X => "X",
            Button::R => "R",
            Button::UP => "Up",
            Button::DOWN => "Down",
            Button::RIGHT => "Right",
            Button::LEFT => "Left",
            Button::B => "B",
            Button::C => "C",
            Button::A => "A",
            Button::START => "Start",
            Button::L => "L",
        }
    }

    /// Look up a button by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Button> {
        Button::ALL
            .into_iter()
            .find(|button| button.name().eq_ignore_ascii_case(name))
    }
}

/// Container for button state
///
/// Holds any combination of buttons as a bitfield. Bits with no [`Button`]
/// assigned are carried along untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Buttons(pub u16);

impl Buttons {
    /// No buttons
    pub const NONE: Buttons = Buttons(0);

    /// Every named button
    pub const ALL: Buttons = Buttons(0x8FFF);

    /// Check if a specific button is set
    #[inline]
    pub const fn contains(self, button: Button) -> bool {
        (self.0 & button as u16) != 0
    }

    /// Check if any of the specified buttons are set
    #[inline]
    pub const fn contains_any(self, buttons: Buttons) -> bool {
        (self.0 & buttons.0) != 0
    }

    /// Check if all of the specified buttons are set
    #[inline]
    pub const fn contains_all(self, buttons: Buttons) -> bool {
        (self.0 & buttons.0) == buttons.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Keep only the bits also set in `mask`
    #[inline]
    pub const fn masked(self, mask: Buttons) -> Buttons {
        Buttons(self.0 & mask.0)
    }

    /// Check if D-pad up is set
    #[inline]
    pub const fn up(self) -> bool {
        self.contains(Button::UP)
    }

    /// Check if D-pad down is set
    #[inline]
    pub const fn down(self) -> bool {
        self.contains(Button::DOWN)
    }

    /// Check if D-pad left is set
    #[inline]
    pub const fn left(self) -> bool {
        self.contains(Button::LEFT)
    }

    /// Check if D-pad right is set
    #[inline]
    pub const fn right(self) -> bool {
        self.contains(Button::RIGHT)
    }

    /// Get raw button flags
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Named buttons that are set, lowest bit first
    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Buttons {
        Buttons(button as u16)
    }
}

impl core::ops::BitOr for Button {
    type Output = Buttons;
    fn bitor(self, other: Button) -> Buttons {
        Buttons(self as u16 | other as u16)
    }
}

impl core::ops::BitOr<Button> for Buttons {
    type Output = Buttons;
    fn bitor(self, other: Button) -> Buttons {
        Buttons(self.0 | other as u16)
    }
}

impl core::ops::BitOr for Buttons {
    type Output = Buttons;
    fn bitor(self, other: Buttons) -> Buttons {
        Buttons(self.0 | other.0)
    }
}

impl core::fmt::Display for Buttons {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("[")?;
        for (i, button) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(button.name())?;
        }
        f.write_str("]")
    }
}

/// Bits that are set now and were clear on the cycle before
#[inline]
pub const fn pressed_bits(current: u16, previous: u16) -> u16 {
    (current ^ previous) & current
}

/// Bits that are clear now and were set on the cycle before
#[inline]
pub const fn released_bits(current: u16, previous: u16) -> u16 {
    (current ^ previous) & previous
}

/// Check if any button of `mask` is held down
///
/// Always `false` for a disconnected record, whatever stale bits it carries.
#[inline]
pub fn is_held(peripheral: &RawSnapshot, mask: impl Into<Buttons>) -> bool {
    peripheral.is_connected() && (peripheral.current() & mask.into().0) != 0
}

/// Check if any button of `mask` went down on the latest cycle
#[inline]
pub fn is_pressed(peripheral: &RawSnapshot, mask: impl Into<Buttons>) -> bool {
    peripheral.is_connected()
        && (pressed_bits(peripheral.current(), peripheral.previous()) & mask.into().0) != 0
}

/// Check if any button of `mask` went up on the latest cycle
#[inline]
pub fn is_released(peripheral: &RawSnapshot, mask: impl Into<Buttons>) -> bool {
    peripheral.is_connected()
        && (released_bits(peripheral.current(), peripheral.previous()) & mask.into().0) != 0
}

/// All buttons currently held
pub fn held(peripheral: &RawSnapshot) -> Buttons {
    if peripheral.is_connected() {
        Buttons(peripheral.current())
    } else {
        Buttons::NONE
    }
}

/// All buttons that went down on the latest cycle
pub fn pressed(peripheral: &RawSnapshot) -> Buttons {
    if peripheral.is_connected() {
        Buttons(pressed_bits(peripheral.current(), peripheral.previous()))
    } else {
        Buttons::NONE
    }
}

/// All buttons that went up on the latest cycle
pub fn released(peripheral: &RawSnapshot) -> Buttons {
    if peripheral.is_connected() {
        Buttons(released_bits(peripheral.current(), peripheral.previous()))
    } else {
        Buttons::NONE
    }
}
