//! Host-stack seam: class-instance lookup and interrupt transfer submission.

use crate::transfer::TransferConfig;
use core::ffi::CStr;
use core::fmt;

/// Error type for host-stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostError {
    /// The host stack failed to start (raw negative return code).
    Init(i32),
    /// No class instance is registered under the looked-up path.
    NotFound,
    /// A transfer is already in flight.
    Busy,
    /// The host stack refused the submission (raw negative return code).
    Submit(i32),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::Init(code) => write!(f, "host stack init failed ({})", code),
            HostError::NotFound => f.write_str("class instance not found"),
            HostError::Busy => f.write_str("transfer already in flight"),
            HostError::Submit(code) => write!(f, "submit failed ({})", code),
        }
    }
}

/// The external USB host stack, as seen by the discovery loop.
///
/// Enumeration, class binding and transfer scheduling all happen on the
/// other side of this trait. Implementations must keep at most one
/// interrupt-IN transfer in flight (see [`TransferSlot`](crate::transfer::TransferSlot)).
pub trait HostStack {
    /// Non-owning reference to a bound class instance. The host stack may
    /// invalidate it at any time; it is re-acquired by path on every check.
    type Handle: Copy;

    /// Look up the class instance registered under `path`.
    fn find_class_instance(&mut self, path: &CStr) -> Option<Self::Handle>;

    /// Fill and submit the interrupt-IN transfer for `handle`.
    ///
    /// Completion is asynchronous; the completion path re-arms the transfer.
    fn submit_interrupt_in(
        &mut self,
        handle: Self::Handle,
        transfer: &TransferConfig,
    ) -> Result<(), HostError>;

    /// Drop the interrupt-IN transfer after the class instance went away.
    ///
    /// Host stacks may discard a transfer on unplug without completing it;
    /// this must leave the transfer slot free for the next submission.
    fn cancel_interrupt_in(&mut self);
}

impl<H: HostStack + ?Sized> HostStack for &mut H {
    type Handle = H::Handle;

    fn find_class_instance(&mut self, path: &CStr) -> Option<Self::Handle> {
        (**self).find_class_instance(path)
    }

    fn submit_interrupt_in(
        &mut self,
        handle: Self::Handle,
        transfer: &TransferConfig,
    ) -> Result<(), HostError> {
        (**self).submit_interrupt_in(handle, transfer)
    }

    fn cancel_interrupt_in(&mut self) {
        (**self).cancel_interrupt_in()
    }
}
