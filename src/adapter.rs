//! Status source adapters.
//!
//! An adapter bridges the monitor to the outside world: it answers the two
//! raw connectivity queries and receives state-change notifications.
//! Neither side may fail; a missing driver simply reports `false`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Bridge between the monitor and the link driver / protocol client.
///
/// Only the two raw queries are required. The notification hooks default to
/// a debug trace.
///
/// # Example
///
/// ```rust
/// use conn_monitor::adapter::StatusSource;
///
/// struct AlwaysUp;
///
/// impl StatusSource for AlwaysUp {
///     fn link_connected_raw(&self) -> bool {
///         true
///     }
///
///     fn app_protocol_connected_raw(&self) -> bool {
///         false
///     }
/// }
///
/// assert!(AlwaysUp.link_connected_raw());
/// ```
pub trait StatusSource {
    /// Current raw link-layer connectivity. No side effects.
    fn link_connected_raw(&self) -> bool;

    /// Current raw application-protocol connectivity. No side effects.
    fn app_protocol_connected_raw(&self) -> bool;

    /// Called when the monitor enters a state that reports link status.
    fn notify_link_connected(&mut self, connected: bool) {
        debug!(connected, "link status notification");
    }

    /// Called when the monitor enters a state that reports app-protocol status.
    fn notify_app_protocol_connected(&mut self, connected: bool) {
        debug!(connected, "app protocol status notification");
    }
}

impl<T: StatusSource + ?Sized> StatusSource for Box<T> {
    fn link_connected_raw(&self) -> bool {
        (**self).link_connected_raw()
    }

    fn app_protocol_connected_raw(&self) -> bool {
        (**self).app_protocol_connected_raw()
    }

    fn notify_link_connected(&mut self, connected: bool) {
        (**self).notify_link_connected(connected)
    }

    fn notify_app_protocol_connected(&mut self, connected: bool) {
        (**self).notify_app_protocol_connected(connected)
    }
}

/// Adapter used when no driver is present: everything is disconnected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStatusSource;

impl StatusSource for NullStatusSource {
    fn link_connected_raw(&self) -> bool {
        false
    }

    fn app_protocol_connected_raw(&self) -> bool {
        false
    }
}

/// Shared raw connectivity flags.
///
/// Cloning yields another handle to the same flags, so driver callbacks on
/// other threads can update what a [`FlagStatusSource`] reports.
#[derive(Clone, Debug, Default)]
pub struct StatusFlags {
    link: Arc<AtomicBool>,
    app_protocol: Arc<AtomicBool>,
}

impl StatusFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_link(&self, connected: bool) {
        self.link.store(connected, Ordering::Release);
    }

    pub fn set_app_protocol(&self, connected: bool) {
        self.app_protocol.store(connected, Ordering::Release);
    }

    pub fn link(&self) -> bool {
        self.link.load(Ordering::Acquire)
    }

    pub fn app_protocol(&self) -> bool {
        self.app_protocol.load(Ordering::Acquire)
    }
}

/// Which status a notification refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notification {
    Link(bool),
    AppProtocol(bool),
}

type NotifyHook = Box<dyn FnMut(Notification) + Send>;

/// Adapter reading raw status from [`StatusFlags`].
///
/// Notifications are forwarded to an optional hook, e.g. to drive an
/// indicator LED or publish downstream.
pub struct FlagStatusSource {
    flags: StatusFlags,
    on_notify: Option<NotifyHook>,
}

impl FlagStatusSource {
    pub fn new(flags: StatusFlags) -> Self {
        Self {
            flags,
            on_notify: None,
        }
    }

    /// Forward every notification to `hook`.
    pub fn on_notify<F>(mut self, hook: F) -> Self
    where
        F: FnMut(Notification) + Send + 'static,
    {
        self.on_notify = Some(Box::new(hook));
        self
    }

    /// Handle to the flags this adapter reads.
    pub fn flags(&self) -> &StatusFlags {
        &self.flags
    }

    fn forward(&mut self, notification: Notification) {
        if let Some(hook) = self.on_notify.as_mut() {
            hook(notification);
        }
    }
}

impl fmt::Debug for FlagStatusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagStatusSource")
            .field("flags", &self.flags)
            .field("on_notify", &self.on_notify.is_some())
            .finish()
    }
}

impl StatusSource for FlagStatusSource {
    fn link_connected_raw(&self) -> bool {
        let connected = self.flags.link();
        debug!(
            "link device is {}connected",
            if connected { "" } else { "dis" }
        );
        connected
    }

    fn app_protocol_connected_raw(&self) -> bool {
        self.flags.app_protocol()
    }

    fn notify_link_connected(&mut self, connected: bool) {
        debug!(connected, "link status notification");
        self.forward(Notification::Link(connected));
    }

    fn notify_app_protocol_connected(&mut self, connected: bool) {
        debug!(connected, "app protocol status notification");
        self.forward(Notification::AppProtocol(connected));
    }
}
