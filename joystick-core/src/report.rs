//! Received report copy and the decoded joystick state.
//!
//! Only the first three bytes of a report carry meaning:
//!
//! | Byte | Content |
//! |------|---------|
//! | 0    | Horizontal axis, 0-255 |
//! | 1    | Vertical axis, 0-255 |
//! | 2    | Button bitmask, bits 0-3 |

use crate::config::{AXIS_HIGH_THRESHOLD, AXIS_LOW_THRESHOLD, MAX_TRANSFER_LEN, MIN_REPORT_LEN};
use core::fmt;
use core::ops::BitOr;
use heapless::Vec;

/// Three-way position of one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisPosition {
    /// Below the low threshold: up on the vertical axis, left on the horizontal one.
    Low,
    /// Inside the dead zone, thresholds included.
    #[default]
    Centered,
    /// Above the high threshold: down on the vertical axis, right on the horizontal one.
    High,
}

impl AxisPosition {
    /// Classify a raw axis value. 64 and 192 are both centered.
    #[inline]
    #[must_use]
    pub const fn from_raw(value: u8) -> Self {
        if value < AXIS_LOW_THRESHOLD {
            AxisPosition::Low
        } else if value > AXIS_HIGH_THRESHOLD {
            AxisPosition::High
        } else {
            AxisPosition::Centered
        }
    }

    /// Whether the low-side line is active.
    #[inline]
    #[must_use]
    pub const fn is_low(self) -> bool {
        matches!(self, AxisPosition::Low)
    }

    /// Whether the high-side line is active.
    #[inline]
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, AxisPosition::High)
    }
}

/// Fire button bitfield (byte 2 of the report, low nibble).
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FireButtons(pub u8);

impl FireButtons {
    pub const FIRE0: Self = Self(1 << 0);
    pub const FIRE1: Self = Self(1 << 1);
    pub const FIRE2: Self = Self(1 << 2);
    pub const FIRE3: Self = Self(1 << 3);

    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    /// Check if the given button(s) are pressed.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: FireButtons) -> bool {
        (self.0 & button.0) == button.0
    }

    /// Check if button `index` (0-3) is pressed.
    #[inline]
    #[must_use]
    pub const fn is_pressed(self, index: usize) -> bool {
        index < 4 && self.0 & (1 << index) != 0
    }
}

impl BitOr for FireButtons {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Joystick state decoded from one report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickState {
    pub horizontal: AxisPosition,
    pub vertical: AxisPosition,
    pub buttons: FireButtons,
}

impl JoystickState {
    /// Decode the first three bytes of `bytes`.
    ///
    /// Returns `None` for reports too short to carry axes and buttons.
    #[must_use]
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [x, y, buttons, ..] => Some(Self {
                horizontal: AxisPosition::from_raw(x),
                vertical: AxisPosition::from_raw(y),
                buttons: FireButtons(buttons),
            }),
            _ => None,
        }
    }

    /// Button LED follows button 0.
    #[inline]
    #[must_use]
    pub const fn button_led(&self) -> bool {
        self.buttons.is_pressed(0)
    }
}

/// Copy of the bytes received by one interrupt transfer.
///
/// Taken out of the DMA buffer before the transfer is re-armed, so decoding
/// never races the next read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    bytes: Vec<u8, MAX_TRANSFER_LEN>,
}

impl Report {
    /// Copy up to [`MAX_TRANSFER_LEN`] bytes from `data`.
    #[must_use]
    pub fn from_slice(data: &[u8]) -> Self {
        let len = data.len().min(MAX_TRANSFER_LEN);
        let mut bytes = Vec::new();
        // Cannot fail: len is capped at capacity.
        let _ = bytes.extend_from_slice(&data[..len]);
        Self { bytes }
    }

    /// Received bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of received bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the report is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the report is long enough to drive the outputs.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.len() >= MIN_REPORT_LEN
    }

    /// Decoded state, `None` for short reports.
    #[must_use]
    pub fn state(&self) -> Option<JoystickState> {
        JoystickState::decode(&self.bytes)
    }
}

/// Diagnostic dump: `0x1e 0x1e 0x05 nbytes:3`.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "0x{:02x} ", byte)?;
        }
        write!(f, "nbytes:{}", self.len())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Report {
    fn format(&self, fmt: defmt::Formatter) {
        for byte in &self.bytes {
            defmt::write!(fmt, "0x{=u8:02x} ", *byte);
        }
        defmt::write!(fmt, "nbytes:{=usize}", self.len());
    }
}
