//! Process-wide address family options and the dual-stack capability.
//!
//! The expansion code only needs to know whether both families are
//! enabled, so it reads that through [`DualStack`]. [`Options`] is the
//! process store an embedding program writes at startup (and may change
//! later); the flag is re-read on every expansion.

use std::sync::atomic::{AtomicBool, Ordering};

/// Reports whether IPv4 and IPv6 are both active.
pub trait DualStack: Send + Sync {
    fn is_dual_stack(&self) -> bool;
}

/// Address family switches. Defaults to IPv4 only.
#[derive(Debug)]
pub struct Options {
    enable_ipv4: AtomicBool,
    enable_ipv6: AtomicBool,
}

static CONFIG: Options = Options::new();

/// The process-wide options.
pub fn config() -> &'static Options {
    &CONFIG
}

impl Options {
    pub const fn new() -> Self {
        Self {
            enable_ipv4: AtomicBool::new(true),
            enable_ipv6: AtomicBool::new(false),
        }
    }

    pub fn enable_ipv4(&self) -> bool {
        self.enable_ipv4.load(Ordering::Relaxed)
    }

    pub fn enable_ipv6(&self) -> bool {
        self.enable_ipv6.load(Ordering::Relaxed)
    }

    pub fn set_enable_ipv4(&self, enabled: bool) {
        self.enable_ipv4.store(enabled, Ordering::Relaxed);
    }

    pub fn set_enable_ipv6(&self, enabled: bool) {
        self.enable_ipv6.store(enabled, Ordering::Relaxed);
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl DualStack for Options {
    fn is_dual_stack(&self) -> bool {
        self.enable_ipv4() && self.enable_ipv6()
    }
}

/// Reads the dual-stack flag from [`config()`] on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions;

impl DualStack for ProcessOptions {
    fn is_dual_stack(&self) -> bool {
        config().is_dual_stack()
    }
}

/// A dual-stack answer that never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDualStack(pub bool);

impl DualStack for FixedDualStack {
    fn is_dual_stack(&self) -> bool {
        self.0
    }
}
