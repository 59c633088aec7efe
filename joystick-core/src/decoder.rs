//! HID report decoder: maps one report onto the output lines.

use crate::lines::Line;
use crate::output::{LineSink, OutputError};
use crate::report::{AxisPosition, JoystickState};

/// Applies joystick reports to a [`LineSink`].
///
/// The outputs are a pure function of the last report of three or more
/// bytes. Shorter reports leave every line untouched.
pub struct ReportDecoder<S> {
    sink: S,
    last: Option<JoystickState>,
}

impl<S: LineSink> ReportDecoder<S> {
    /// Create a new decoder driving `sink`.
    pub fn new(sink: S) -> Self {
        Self { sink, last: None }
    }

    /// Decode `report` and drive the lines.
    ///
    /// Returns the applied state, or `None` if the report was too short.
    pub fn apply(&mut self, report: &[u8]) -> Result<Option<JoystickState>, OutputError> {
        let Some(state) = JoystickState::decode(report) else {
            return Ok(None);
        };
        self.apply_state(state)?;
        Ok(Some(state))
    }

    /// Drive the lines from an already decoded state.
    pub fn apply_state(&mut self, state: JoystickState) -> Result<(), OutputError> {
        drive_state(&mut self.sink, &state)?;
        self.last = Some(state);
        Ok(())
    }

    /// Last state successfully applied.
    pub fn last_state(&self) -> Option<JoystickState> {
        self.last
    }

    /// Get a reference to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Decompose the decoder into its sink.
    pub fn into_inner(self) -> S {
        self.sink
    }
}

/// Drive every decoder-owned line from `state`.
///
/// Order: button LED, vertical pair, horizontal pair, fire 0-3.
pub fn drive_state<S: LineSink + ?Sized>(
    sink: &mut S,
    state: &JoystickState,
) -> Result<(), OutputError> {
    sink.drive(Line::ButtonLed, state.button_led())?;
    drive_axis(sink, state.vertical, Line::Up, Line::Down)?;
    drive_axis(sink, state.horizontal, Line::Left, Line::Right)?;
    for (index, line) in Line::FIRE.into_iter().enumerate() {
        sink.drive(line, state.buttons.is_pressed(index))?;
    }
    Ok(())
}

/// Dead zone de-asserts both lines.
fn drive_axis<S: LineSink + ?Sized>(
    sink: &mut S,
    position: AxisPosition,
    low: Line,
    high: Line,
) -> Result<(), OutputError> {
    sink.drive(low, position.is_low())?;
    sink.drive(high, position.is_high())
}
