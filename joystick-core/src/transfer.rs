//! Interrupt-IN transfer parameters, the single transfer slot, and the
//! completion path that copies each report and re-arms the transfer.

use crate::config::{MAX_TRANSFER_LEN, TRANSFER_INTERVAL};
use crate::host::HostError;
use crate::report::{JoystickState, Report};
use portable_atomic::{AtomicBool, Ordering};

/// Parameters of the interrupt-IN transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferConfig {
    /// Bytes requested per transfer.
    pub max_len: usize,
    /// Polling interval override, 0 = endpoint default.
    pub interval: u32,
}

impl TransferConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_len: MAX_TRANSFER_LEN,
            interval: TRANSFER_INTERVAL,
        }
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks the one transfer allowed in flight.
///
/// Shared between the worker that first submits the transfer and the host
/// stack's completion context that re-arms it.
pub struct TransferSlot {
    armed: AtomicBool,
}

impl TransferSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
        }
    }

    /// Claim the slot. Fails with [`HostError::Busy`] if a transfer is in flight.
    pub fn try_arm(&self) -> Result<(), HostError> {
        self.armed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| HostError::Busy)
    }

    /// Mark the slot free.
    pub fn release(&self) {
        self.armed.store(false, Ordering::Release);
    }

    /// Whether a transfer is in flight.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Claim the slot and run `submit`; the slot is freed again if it fails.
    pub fn submit_with<F>(&self, submit: F) -> Result<(), HostError>
    where
        F: FnOnce() -> Result<(), HostError>,
    {
        self.try_arm()?;
        submit().inspect_err(|_| self.release())
    }
}

impl Default for TransferSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Completion path of the interrupt-IN transfer.
///
/// `nbytes` is the host stack's raw result: the received length, or zero /
/// negative when the transfer ended without data. With data, the bytes are
/// copied out of `buffer` first, then the transfer is re-armed through
/// `resubmit`, then the copy is returned for decoding; `buffer` is not read
/// again after resubmission. A failed re-arm leaves the slot free for the
/// discovery loop to recover.
pub fn complete<F>(slot: &TransferSlot, buffer: &[u8], nbytes: i32, resubmit: F) -> Option<Report>
where
    F: FnOnce() -> Result<(), HostError>,
{
    slot.release();

    let len = match usize::try_from(nbytes) {
        Ok(len) if len > 0 => len.min(buffer.len()),
        _ => {
            debug!("interrupt-in ended without data ({})", nbytes);
            return None;
        }
    };

    let report = Report::from_slice(&buffer[..len]);
    debug!("{}", report);

    if let Err(e) = slot.submit_with(resubmit) {
        warn!("failed to re-arm interrupt-in: {}", e);
    }

    Some(report)
}

/// [`complete`] for a latest-value hand-off to a decoder running elsewhere.
///
/// Only reports that decode to a full state are returned, so a short report
/// can never displace the last full one before it has been applied. The
/// transfer is re-armed either way.
pub fn complete_state<F>(
    slot: &TransferSlot,
    buffer: &[u8],
    nbytes: i32,
    resubmit: F,
) -> Option<JoystickState>
where
    F: FnOnce() -> Result<(), HostError>,
{
    complete(slot, buffer, nbytes, resubmit)
        .as_ref()
        .and_then(Report::state)
}
