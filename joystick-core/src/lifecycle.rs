//! Attach/detach hooks. The host stack invokes these when it binds or
//! unbinds the HID class instance; the adapter never calls them itself.

use crate::lines::Line;
use crate::output::{LineSink, OutputError};

/// Light the attach LED.
pub fn on_attach<S: LineSink + ?Sized>(sink: &mut S) -> Result<(), OutputError> {
    info!("joystick bound");
    sink.drive(Line::AttachLed, true)
}

/// Turn the attach LED off.
pub fn on_detach<S: LineSink + ?Sized>(sink: &mut S) -> Result<(), OutputError> {
    info!("joystick unbound");
    sink.drive(Line::AttachLed, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::mock::{active, mock_bank};

    #[test]
    fn test_attach_led_follows_hooks() {
        let mut bank = mock_bank();
        on_attach(&mut bank).unwrap();
        assert_eq!(active(&bank, Line::AttachLed), Some(true));
        on_detach(&mut bank).unwrap();
        assert_eq!(active(&bank, Line::AttachLed), Some(false));
    }

    #[test]
    fn test_hooks_leave_button_led_alone() {
        let mut bank = mock_bank();
        on_attach(&mut bank).unwrap();
        assert_eq!(active(&bank, Line::ButtonLed), None);
    }
}
