//! Compile-time configuration.
//!
//! Device path, timing and transfer parameters live here so they can be
//! tuned in one place. The adapter has no runtime configuration; the
//! [`AdapterConfig`] value only exists so tests can shorten the delays.

use core::ffi::CStr;

/// Logical path under which the host stack registers the bound HID device.
pub const DEVICE_PATH: &CStr = c"/dev/input0";

/// Delay between lookups, and after a failed submission (ms).
pub const RETRY_DELAY_MS: u32 = 1500;

/// Size of the DMA region the host stack writes reports into.
pub const REPORT_BUFFER_SIZE: usize = 128;

/// Maximum number of bytes requested per interrupt-IN transfer.
pub const MAX_TRANSFER_LEN: usize = 8;

/// Polling interval override for the interrupt endpoint. 0 = endpoint default.
pub const TRANSFER_INTERVAL: u32 = 0;

/// Shortest report that carries both axes and the button byte.
pub const MIN_REPORT_LEN: usize = 3;

/// Axis values strictly below this are "low" (up / left).
pub const AXIS_LOW_THRESHOLD: u8 = 64;

/// Axis values strictly above this are "high" (down / right).
pub const AXIS_HIGH_THRESHOLD: u8 = 192;

/// Runtime view of the adapter constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Path looked up in the host stack's class registry.
    pub device_path: &'static CStr,
    /// Fixed retry / supervision period in milliseconds.
    pub retry_delay_ms: u32,
    /// Interrupt transfer parameters.
    pub transfer: crate::transfer::TransferConfig,
}

impl AdapterConfig {
    /// Configuration built from the compile-time constants.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            device_path: DEVICE_PATH,
            retry_delay_ms: RETRY_DELAY_MS,
            transfer: crate::transfer::TransferConfig::new(),
        }
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self::new()
    }
}
