//! Platform-agnostic USB HID joystick to GPIO adapter logic.
//!
//! This crate holds everything the firmware does apart from talking to real
//! hardware. It can be used both in embedded `no_std` environments and on
//! host for testing.
//!
//! # Overview
//!
//! - [`config`]: compile-time constants and [`AdapterConfig`]
//! - [`lines`]: logical output lines and their GPIO numbers ([`Line`])
//! - [`output`]: GPIO sink trait ([`LineSink`]) and active-low [`PinBank`]
//! - [`report`]: received report copy and decoded state ([`Report`], [`JoystickState`])
//! - [`decoder`]: maps reports onto lines ([`ReportDecoder`])
//! - [`transfer`]: interrupt transfer slot and completion path ([`complete`])
//! - [`host`]: USB host stack trait ([`HostStack`])
//! - [`discovery`]: attach/supervise loop ([`Discovery`])
//! - [`lifecycle`]: attach LED hooks ([`on_attach`], [`on_detach`])
//!
//! # Report layout
//!
//! ```text
//! byte 0: horizontal axis   < 64 left,  > 192 right, else centered
//! byte 1: vertical axis     < 64 up,    > 192 down,  else centered
//! byte 2: buttons           bit k -> fire k (k = 0..3), bit 0 -> button LED
//! ```
//!
//! # Example
//!
//! ```rust
//! use joystick_core::{Line, LineSink, OutputError, ReportDecoder};
//!
//! #[derive(Default)]
//! struct Lines([bool; Line::COUNT]);
//!
//! impl LineSink for Lines {
//!     fn drive(&mut self, line: Line, active: bool) -> Result<(), OutputError> {
//!         self.0[line.index()] = active;
//!         Ok(())
//!     }
//! }
//!
//! let mut decoder = ReportDecoder::new(Lines::default());
//! decoder.apply(&[30, 30, 0b0101]).unwrap();
//!
//! let lines = decoder.sink();
//! assert!(lines.0[Line::Left.index()] && lines.0[Line::Up.index()]);
//! assert!(lines.0[Line::Fire0.index()] && lines.0[Line::Fire2.index()]);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Log through defmt and derive `defmt::Format` (for embedded logging)
//! - **`log`**: Log through the `log` facade instead
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations,
//! making it suitable for embedded systems with limited resources.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the logging macros are visible to every module.
mod fmt;

pub mod config;
pub mod decoder;
pub mod discovery;
pub mod host;
pub mod lifecycle;
pub mod lines;
pub mod output;
pub mod report;
pub mod transfer;

// Re-export main types at crate root
pub use config::{AdapterConfig, DEVICE_PATH, REPORT_BUFFER_SIZE, RETRY_DELAY_MS};
pub use decoder::{drive_state, ReportDecoder};
pub use discovery::{Discovery, DiscoveryStats, LinkState, Step};
pub use host::{HostError, HostStack};
pub use lifecycle::{on_attach, on_detach};
pub use lines::Line;
pub use output::{LineSink, OutputError, PinBank};
pub use report::{AxisPosition, FireButtons, JoystickState, Report};
pub use transfer::{complete, complete_state, TransferConfig, TransferSlot};
