//! Standard control pad

use super::Controller;
use crate::peripheral::{DeviceType, RawSnapshot, type_of};

/// Standard Saturn control pad
///
/// Only answers for records classified as [`DeviceType::Gamepad`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Gamepad;

impl Controller for Gamepad {
    fn is_connected(peripheral: Option<&RawSnapshot>) -> bool {
        type_of(peripheral) == DeviceType::Gamepad
    }
}
