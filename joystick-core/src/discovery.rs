//! Discovery / attachment / supervision loop.
//!
//! ```text
//!            miss (wait)            submit failed (wait)
//!           ┌────────┐          ┌──────────────────────────┐
//!           ▼        │          ▼                          │
//!       Searching ───┴─ hit ─▶ Attached ── submitted ──▶ Supervising ─┐
//!           ▲                                                │  ▲     │ hit (wait)
//!           └──────────────── miss (detached) ───────────────┘  └─────┘
//! ```
//!
//! The loop has no terminal state and no retry limit.

use crate::config::AdapterConfig;
use crate::host::HostStack;
use core::ffi::CStr;
use core::fmt;
use embedded_hal_async::delay::DelayNs;

/// Attachment state of the worker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Looking up the class instance by path.
    #[default]
    Searching,
    /// Class instance found, interrupt transfer not yet submitted.
    Attached,
    /// Transfer running; the class instance is re-checked periodically.
    Supervising,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkState::Searching => "searching",
            LinkState::Attached => "attached",
            LinkState::Supervising => "supervising",
        })
    }
}

/// Result of one transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// State after the transition.
    pub state: LinkState,
    /// Delay to wait before the next transition, if any.
    pub delay_ms: Option<u32>,
}

/// Counters kept for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiscoveryStats {
    pub lookups_missed: u32,
    pub submit_failures: u32,
    pub attachments: u32,
    pub detachments: u32,
}

/// Single-worker state machine that keeps the interrupt transfer alive for
/// whichever instance is bound under the configured path.
pub struct Discovery<H: HostStack> {
    host: H,
    config: AdapterConfig,
    state: LinkState,
    handle: Option<H::Handle>,
    stats: DiscoveryStats,
}

impl<H: HostStack> Discovery<H> {
    /// Create a loop with the compile-time configuration.
    pub fn new(host: H) -> Self {
        Self::with_config(host, AdapterConfig::new())
    }

    pub fn with_config(host: H, config: AdapterConfig) -> Self {
        Self {
            host,
            config,
            state: LinkState::Searching,
            handle: None,
            stats: DiscoveryStats::default(),
        }
    }

    /// Run forever.
    pub async fn run<D: DelayNs>(&mut self, delay: &mut D) -> ! {
        info!("waiting for {}", path_str(self.config.device_path));
        loop {
            self.poll_once(delay).await;
        }
    }

    /// Perform one transition, then wait for its delay.
    pub async fn poll_once<D: DelayNs>(&mut self, delay: &mut D) -> Step {
        let step = self.step();
        if let Some(ms) = step.delay_ms {
            delay.delay_ms(ms).await;
        }
        step
    }

    /// Perform one transition without waiting.
    pub fn step(&mut self) -> Step {
        let path = self.config.device_path;
        match self.state {
            LinkState::Searching => match self.host.find_class_instance(path) {
                Some(handle) => {
                    debug!("found {}", path_str(path));
                    self.handle = Some(handle);
                    self.enter(LinkState::Attached)
                }
                None => {
                    self.stats.lookups_missed = self.stats.lookups_missed.wrapping_add(1);
                    warn!("do not find {}", path_str(path));
                    self.wait(LinkState::Searching)
                }
            },
            LinkState::Attached => {
                let Some(handle) = self.handle else {
                    return self.enter(LinkState::Searching);
                };
                match self.host.submit_interrupt_in(handle, &self.config.transfer) {
                    Ok(()) => {
                        self.stats.attachments = self.stats.attachments.wrapping_add(1);
                        info!("receiving reports from {}", path_str(path));
                        self.enter(LinkState::Supervising)
                    }
                    Err(e) => {
                        self.stats.submit_failures = self.stats.submit_failures.wrapping_add(1);
                        warn!("interrupt-in submit failed: {}", e);
                        self.handle = None;
                        self.wait(LinkState::Searching)
                    }
                }
            }
            LinkState::Supervising => match self.host.find_class_instance(path) {
                Some(handle) => {
                    self.handle = Some(handle);
                    self.wait(LinkState::Supervising)
                }
                None => {
                    self.stats.detachments = self.stats.detachments.wrapping_add(1);
                    info!("{} detached", path_str(path));
                    self.handle = None;
                    self.host.cancel_interrupt_in();
                    self.enter(LinkState::Searching)
                }
            },
        }
    }

    /// Current state.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Diagnostic counters.
    pub fn stats(&self) -> DiscoveryStats {
        self.stats
    }

    /// Get a reference to the host stack.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Get a mutable reference to the host stack.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Decompose the loop into its host stack.
    pub fn into_inner(self) -> H {
        self.host
    }

    fn enter(&mut self, state: LinkState) -> Step {
        self.transition(state, None)
    }

    fn wait(&mut self, state: LinkState) -> Step {
        self.transition(state, Some(self.config.retry_delay_ms))
    }

    fn transition(&mut self, state: LinkState, delay_ms: Option<u32>) -> Step {
        if state != self.state {
            trace!("{} -> {}", self.state, state);
        }
        self.state = state;
        Step { state, delay_ms }
    }
}

fn path_str(path: &CStr) -> &str {
    path.to_str().unwrap_or("<device>")
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::host::mock::MockHost;
    use crate::host::HostError;
    use crate::lifecycle::{on_attach, on_detach};
    use crate::lines::Line;
    use crate::output::mock::{active, mock_bank};
    use crate::transfer::{complete, TransferConfig};
    use embassy_futures::block_on;
    use std::vec;
    use std::vec::Vec;

    /// Delay that returns immediately and records what was asked for.
    #[derive(Default)]
    struct MockDelay {
        waits_ms: Vec<u32>,
    }

    impl DelayNs for MockDelay {
        async fn delay_ns(&mut self, _ns: u32) {}

        async fn delay_ms(&mut self, ms: u32) {
            self.waits_ms.push(ms);
        }
    }

    fn poll(discovery: &mut Discovery<MockHost>, delay: &mut MockDelay, times: usize) {
        for _ in 0..times {
            block_on(discovery.poll_once(delay));
        }
    }

    #[test]
    fn test_lookup_miss_retries_every_interval() {
        let mut discovery = Discovery::new(MockHost::new(false));
        let mut delay = MockDelay::default();

        poll(&mut discovery, &mut delay, 50);

        assert_eq!(discovery.state(), LinkState::Searching);
        assert_eq!(delay.waits_ms, vec![1500; 50]);
        assert_eq!(discovery.stats().lookups_missed, 50);
        assert!(discovery.host().lookups.iter().all(|p| p == "/dev/input0"));
        assert!(discovery.host().submissions.is_empty());
    }

    #[test]
    fn test_attach_sequence() {
        let mut discovery = Discovery::new(MockHost::new(true));

        assert_eq!(
            discovery.step(),
            Step { state: LinkState::Attached, delay_ms: None }
        );
        assert_eq!(
            discovery.step(),
            Step { state: LinkState::Supervising, delay_ms: None }
        );
        assert_eq!(
            discovery.step(),
            Step { state: LinkState::Supervising, delay_ms: Some(1500) }
        );

        let host = discovery.host();
        assert_eq!(host.submissions, vec![(1, TransferConfig { max_len: 8, interval: 0 })]);
        assert!(host.slot.is_armed());
        assert_eq!(discovery.stats().attachments, 1);
    }

    #[test]
    fn test_supervising_does_not_resubmit() {
        let mut discovery = Discovery::new(MockHost::new(true));
        let mut delay = MockDelay::default();

        poll(&mut discovery, &mut delay, 10);

        assert_eq!(discovery.host().submissions.len(), 1);
        assert_eq!(delay.waits_ms, vec![1500; 8]);
    }

    #[test]
    fn test_submit_failure_waits_and_searches_again() {
        let mut host = MockHost::new(true);
        host.submit_results.push_back(Err(HostError::Submit(-12)));
        let mut discovery = Discovery::new(host);

        discovery.step();
        assert_eq!(
            discovery.step(),
            Step { state: LinkState::Searching, delay_ms: Some(1500) }
        );
        assert_eq!(discovery.stats().submit_failures, 1);
        assert!(!discovery.host().slot.is_armed());

        discovery.step();
        assert_eq!(discovery.step().state, LinkState::Supervising);
        assert_eq!(discovery.host().submissions.len(), 1);
    }

    #[test]
    fn test_detach_and_reattach() {
        let mut bank = mock_bank();
        let mut discovery = Discovery::new(MockHost::new(true));
        let mut delay = MockDelay::default();

        on_attach(&mut bank).unwrap();
        poll(&mut discovery, &mut delay, 3);
        assert_eq!(discovery.state(), LinkState::Supervising);
        assert_eq!(active(&bank, Line::AttachLed), Some(true));

        // Unplugged: the host stack unbinds, the next check notices.
        discovery.host_mut().unplug();
        on_detach(&mut bank).unwrap();
        assert_eq!(
            discovery.step(),
            Step { state: LinkState::Searching, delay_ms: None }
        );
        assert_eq!(active(&bank, Line::AttachLed), Some(false));

        poll(&mut discovery, &mut delay, 3);
        assert_eq!(discovery.state(), LinkState::Searching);

        // Plugged back in.
        discovery.host_mut().present = true;
        on_attach(&mut bank).unwrap();
        poll(&mut discovery, &mut delay, 2);

        assert_eq!(discovery.state(), LinkState::Supervising);
        assert_eq!(active(&bank, Line::AttachLed), Some(true));
        let stats = discovery.stats();
        assert_eq!(stats.attachments, 2);
        assert_eq!(stats.detachments, 1);
        let handles: Vec<u32> = discovery.host().submissions.iter().map(|s| s.0).collect();
        assert_eq!(handles, vec![1, 2]);
    }

    #[test]
    fn test_rearm_failure_recovered_after_detach() {
        let mut discovery = Discovery::new(MockHost::new(true));
        discovery.step();
        discovery.step();

        // Completion whose re-arm fails frees the slot.
        let slot = &discovery.host().slot;
        complete(slot, &[1, 2, 3], 3, || Err(HostError::Submit(-1)));
        assert!(!slot.is_armed());

        discovery.host_mut().unplug();
        discovery.step();
        discovery.host_mut().present = true;
        discovery.step();
        discovery.step();
        assert!(discovery.host().slot.is_armed());
    }

    #[test]
    fn test_reattach_after_uncompleted_transfer() {
        let mut discovery = Discovery::new(MockHost::new(true));
        discovery.step();
        discovery.step();
        assert_eq!(discovery.state(), LinkState::Supervising);

        // Unplugged without the host stack ever completing the transfer.
        discovery.host_mut().unplug();
        assert!(discovery.host().slot.is_armed());
        assert_eq!(discovery.step().state, LinkState::Searching);
        assert_eq!(discovery.host().cancellations, 1);
        assert!(!discovery.host().slot.is_armed());

        discovery.host_mut().present = true;
        let states: Vec<LinkState> = (0..20).map(|_| discovery.step().state).collect();

        assert_eq!(&states[..2], &[LinkState::Attached, LinkState::Supervising]);
        assert!(states[2..].iter().all(|s| *s == LinkState::Supervising));
        assert_eq!(discovery.stats().submit_failures, 0);
        assert_eq!(discovery.stats().attachments, 2);
    }

    #[test]
    fn test_busy_slot_counts_as_submit_failure() {
        let mut host = MockHost::new(true);
        host.slot.try_arm().unwrap();
        let mut discovery = Discovery::new(host);

        discovery.step();
        assert_eq!(
            discovery.step(),
            Step { state: LinkState::Searching, delay_ms: Some(1500) }
        );
        assert_eq!(discovery.stats().submit_failures, 1);
    }

    #[test]
    fn test_custom_delay() {
        let config = AdapterConfig {
            retry_delay_ms: 10,
            ..AdapterConfig::new()
        };
        let mut discovery = Discovery::with_config(MockHost::new(false), config);
        assert_eq!(discovery.step().delay_ms, Some(10));
    }
}
