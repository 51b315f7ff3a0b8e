//! Shared helpers for integration tests.

#![allow(dead_code)]

use conn_monitor::adapter::{Notification, StatusSource};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Adapter with directly settable raw signals that records notifications.
#[derive(Debug, Default)]
pub struct Recorder {
    pub link: bool,
    pub app: bool,
    pub notifications: Vec<Notification>,
}

impl StatusSource for Recorder {
    fn link_connected_raw(&self) -> bool {
        self.link
    }

    fn app_protocol_connected_raw(&self) -> bool {
        self.app
    }

    fn notify_link_connected(&mut self, connected: bool) {
        self.notifications.push(Notification::Link(connected));
    }

    fn notify_app_protocol_connected(&mut self, connected: bool) {
        self.notifications.push(Notification::AppProtocol(connected));
    }
}

/// Notification log shared with a hook running inside the monitor task.
pub fn notification_log() -> (
    Arc<Mutex<Vec<Notification>>>,
    impl FnMut(Notification) + Send + 'static,
) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    (log, move |n| sink.lock().unwrap().push(n))
}
