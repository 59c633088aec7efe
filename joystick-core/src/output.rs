//! GPIO sink trait, error type and the active-low pin bank.

use crate::lines::Line;
use core::fmt;
use embedded_hal::digital::{OutputPin, PinState};

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// The GPIO driver rejected a write to this line.
    Pin(Line),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Pin(line) => write!(f, "write to {} (GPIO {}) failed", line, line.gpio()),
        }
    }
}

/// Destination for logical line states.
///
/// This trait abstracts the GPIO driver so the decoder and the lifecycle
/// hooks can be exercised against mock pins on the host.
pub trait LineSink {
    /// Drive `line` to its active (`true`) or inactive (`false`) state.
    fn drive(&mut self, line: Line, active: bool) -> Result<(), OutputError>;
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    #[inline]
    fn drive(&mut self, line: Line, active: bool) -> Result<(), OutputError> {
        (**self).drive(line, active)
    }
}

/// Pin level for a logical state. Lines are active-low.
#[inline]
#[must_use]
pub const fn level(active: bool) -> PinState {
    if active {
        PinState::Low
    } else {
        PinState::High
    }
}

/// Ten output pins, one per [`Line`], indexed by [`Line::index`].
///
/// Writes are not grouped: a reader sampling the raw pins while a report is
/// being applied can observe some lines already updated and others not.
pub struct PinBank<P> {
    pins: [P; Line::COUNT],
}

impl<P: OutputPin> PinBank<P> {
    /// Create a bank from pins given in [`Line::ALL`] order.
    #[must_use]
    pub fn new(pins: [P; Line::COUNT]) -> Self {
        Self { pins }
    }

    /// Drive every line to its inactive level.
    pub fn release_all(&mut self) -> Result<(), OutputError> {
        for line in Line::ALL {
            self.drive(line, false)?;
        }
        Ok(())
    }

    /// Get a reference to the pin behind `line`.
    pub fn pin(&self, line: Line) -> &P {
        &self.pins[line.index()]
    }
}

impl<P: OutputPin> LineSink for PinBank<P> {
    fn drive(&mut self, line: Line, active: bool) -> Result<(), OutputError> {
        self.pins[line.index()]
            .set_state(level(active))
            .map_err(|_| OutputError::Pin(line))
    }
}

#[cfg(test)]
pub(crate) mod mock {
    extern crate std;

    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use std::vec::Vec;

    /// Pin that records its level and every write.
    #[derive(Default)]
    pub struct MockPin {
        pub level: Option<PinState>,
        pub writes: usize,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.level = Some(PinState::Low);
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.level = Some(PinState::High);
            self.writes += 1;
            Ok(())
        }
    }

    /// Pin whose writes always fail.
    pub struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    pub fn mock_bank() -> PinBank<MockPin> {
        PinBank::new(core::array::from_fn(|_| MockPin::default()))
    }

    /// Sink recording logical writes in order.
    #[derive(Default)]
    pub struct RecordingSink {
        pub writes: Vec<(Line, bool)>,
    }

    impl LineSink for RecordingSink {
        fn drive(&mut self, line: Line, active: bool) -> Result<(), OutputError> {
            self.writes.push((line, active));
            Ok(())
        }
    }

    /// Logical state of `line`, `None` if never driven.
    pub fn active(bank: &PinBank<MockPin>, line: Line) -> Option<bool> {
        bank.pin(line).level.map(|l| l == PinState::Low)
    }
}
