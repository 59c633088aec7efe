//! Logical output lines and their physical pin assignment.

use core::fmt;

/// A logical GPIO output driven by the adapter.
///
/// All lines are active-low: the active state is the low pin level.
///
/// | Line        | GPIO |
/// |-------------|------|
/// | `Up`        | 10   |
/// | `Down`      | 11   |
/// | `Left`      | 12   |
/// | `Right`     | 13   |
/// | `Fire0`     | 14   |
/// | `Fire1`     | 15   |
/// | `Fire2`     | 16   |
/// | `Fire3`     | 17   |
/// | `AttachLed` | 27   |
/// | `ButtonLed` | 28   |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Line {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Fire0 = 4,
    Fire1 = 5,
    Fire2 = 6,
    Fire3 = 7,
    /// Lit while the host stack has the joystick bound.
    AttachLed = 8,
    /// Mirrors button 0.
    ButtonLed = 9,
}

impl Line {
    /// Number of lines.
    pub const COUNT: usize = 10;

    /// Every line, in bank order.
    pub const ALL: [Line; Self::COUNT] = [
        Line::Up,
        Line::Down,
        Line::Left,
        Line::Right,
        Line::Fire0,
        Line::Fire1,
        Line::Fire2,
        Line::Fire3,
        Line::AttachLed,
        Line::ButtonLed,
    ];

    /// Fire lines indexed by button bit.
    pub const FIRE: [Line; 4] = [Line::Fire0, Line::Fire1, Line::Fire2, Line::Fire3];

    /// Position of this line in a [`PinBank`](crate::output::PinBank).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Physical GPIO number the line is wired to.
    #[must_use]
    pub const fn gpio(self) -> u8 {
        match self {
            Line::Up => 10,
            Line::Down => 11,
            Line::Left => 12,
            Line::Right => 13,
            Line::Fire0 => 14,
            Line::Fire1 => 15,
            Line::Fire2 => 16,
            Line::Fire3 => 17,
            Line::AttachLed => 27,
            Line::ButtonLed => 28,
        }
    }

    /// Short name used in log output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Line::Up => "up",
            Line::Down => "down",
            Line::Left => "left",
            Line::Right => "right",
            Line::Fire0 => "fire0",
            Line::Fire1 => "fire1",
            Line::Fire2 => "fire2",
            Line::Fire3 => "fire3",
            Line::AttachLed => "attach-led",
            Line::ButtonLed => "button-led",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
