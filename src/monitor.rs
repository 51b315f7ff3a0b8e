//! The connection monitor: owns the FSM state, the adapter and both timers.
//!
//! The monitor never branches on connectivity itself. Every trigger is handed
//! to [`core::evaluate`](crate::core::evaluate) together with the current
//! state, and the resulting step is applied through [`ConnectionMonitor::change_state`].

use crate::adapter::{NullStatusSource, StatusSource};
use crate::config::{
    as_millis_u64, MonitorConfig, DEFAULT_POLL_INTERVAL, DEFAULT_STABILITY_INTERVAL,
};
use crate::core::{
    entry_actions, evaluate, Action, ConnectionState, Probe, TransitionHistory, TransitionRecord,
    Trigger,
};
use crate::timer::Timer;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, trace, warn};

/// Externally meaningful status of a monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub state: ConnectionState,
    pub previous_state: ConnectionState,
    /// True only in `StableLinkConnection`.
    pub link_stable: bool,
    /// True only in `AppProtocolConnected`.
    pub app_protocol_connected: bool,
}

impl MonitorStatus {
    fn new(state: ConnectionState, previous_state: ConnectionState) -> Self {
        Self {
            state,
            previous_state,
            link_stable: state.is_link_stable(),
            app_protocol_connected: state.is_app_protocol_connected(),
        }
    }
}

/// Reads raw signals through the adapter for the transition rules.
struct AdapterProbe<'a, A: ?Sized>(&'a A);

impl<A: StatusSource + ?Sized> Probe for AdapterProbe<'_, A> {
    fn link_connected(&self) -> bool {
        self.0.link_connected_raw()
    }

    fn app_protocol_connected(&self) -> bool {
        self.0.app_protocol_connected_raw()
    }
}

/// Debounced connection-status supervisor.
///
/// Drive it either by calling [`tick`](Self::tick) from a cooperative
/// scheduler, or hand it to [`spawn_monitor`](crate::runtime::spawn_monitor)
/// to run on a tokio task.
///
/// # Example
///
/// ```rust
/// use conn_monitor::adapter::{FlagStatusSource, StatusFlags};
/// use conn_monitor::builder::MonitorBuilder;
/// use conn_monitor::core::ConnectionState;
///
/// let flags = StatusFlags::new();
/// let mut monitor = MonitorBuilder::new()
///     .adapter(FlagStatusSource::new(flags.clone()))
///     .build()
///     .unwrap();
///
/// flags.set_link(true);
/// let poll = monitor.next_deadline().unwrap();
/// monitor.tick(poll);
/// assert_eq!(monitor.state(), ConnectionState::LinkConnected);
///
/// // The link has to survive the stability interval before it counts.
/// while monitor.state() == ConnectionState::LinkConnected {
///     let next = monitor.next_deadline().unwrap();
///     monitor.tick(next);
/// }
/// assert!(monitor.is_link_connected());
/// ```
#[derive(Debug)]
pub struct ConnectionMonitor<A: StatusSource = NullStatusSource> {
    adapter: A,
    state: ConnectionState,
    previous: ConnectionState,
    poll_timer: Timer,
    stability_timer: Timer,
    history: TransitionHistory,
    /// Scheduler time while `tick` is servicing timers.
    tick_time: Option<Instant>,
}

impl<A: StatusSource> ConnectionMonitor<A> {
    /// Create a monitor in `Unconnected` and start the status poll timer.
    ///
    /// Zero intervals fall back to the defaults; use
    /// [`MonitorBuilder`](crate::builder::MonitorBuilder) to reject them instead.
    pub fn new(adapter: A, config: &MonitorConfig) -> Self {
        let poll_interval = non_zero_or(config.poll_interval, DEFAULT_POLL_INTERVAL, "poll");
        let stability_interval =
            non_zero_or(config.stability_interval, DEFAULT_STABILITY_INTERVAL, "stability");

        let mut poll_timer = Timer::recurring(poll_interval);
        poll_timer.start(Instant::now());

        Self {
            adapter,
            state: ConnectionState::Unconnected,
            previous: ConnectionState::Unconnected,
            poll_timer,
            stability_timer: Timer::one_shot(stability_interval),
            history: TransitionHistory::with_capacity(config.history_capacity),
            tick_time: None,
        }
    }

    /// Poll tick: re-evaluate the current state against the raw signals.
    pub fn evaluate_state(&mut self) {
        self.dispatch(Trigger::PollTick);
    }

    /// Edge-triggered application-protocol input.
    ///
    /// Ignored by states other than `StableLinkConnection` and
    /// `AppProtocolConnected`.
    pub fn set_app_protocol_state(&mut self, connected: bool) {
        self.dispatch(Trigger::AppProtocolEvent { connected });
    }

    /// Stability timer callback.
    ///
    /// A stale expiry, arriving after the monitor already left
    /// `LinkConnected`, does nothing.
    pub fn stability_timer_expired(&mut self) {
        if !self.state.awaits_stability() {
            trace!(state = %self.state, "ignoring stale stability timer expiry");
            return;
        }
        self.dispatch(Trigger::StabilityTimerExpired);
    }

    /// Service all timers expired at `now`.
    ///
    /// The poll timer is serviced before the stability timer when both are
    /// due. Each callback runs to completion before the next one starts.
    pub fn tick(&mut self, now: Instant) {
        self.tick_time = Some(now);
        if self.poll_timer.poll_expired(now) {
            self.evaluate_state();
        }
        if self.stability_timer.poll_expired(now) {
            self.stability_timer_expired();
        }
        self.tick_time = None;
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.poll_timer.deadline(), self.stability_timer.deadline()) {
            (Some(poll), Some(stable)) => Some(poll.min(stable)),
            (poll, stable) => poll.or(stable),
        }
    }

    /// Record the current state as previous, switch to `new_state` and run
    /// its entry action.
    ///
    /// This is the only mutator of the FSM state. Callers outside the
    /// transition rules bypass them and should know why.
    pub fn change_state(&mut self, new_state: ConnectionState) {
        self.apply(new_state, None);
    }

    /// (Re)arm the one-shot stability timer.
    pub fn start_stability_timer(&mut self) {
        let now = self.now();
        self.stability_timer.start(now);
        trace!(
            interval_ms = as_millis_u64(self.stability_timer.interval()),
            "stability timer armed"
        );
    }

    /// Raw link status from the adapter.
    pub fn is_link_device_connected(&self) -> bool {
        self.adapter.link_connected_raw()
    }

    /// Raw application-protocol status from the adapter.
    pub fn is_app_protocol_lib_connected(&self) -> bool {
        self.adapter.app_protocol_connected_raw()
    }

    /// Debounced link status: true only in `StableLinkConnection`.
    pub fn is_link_stable(&self) -> bool {
        self.state.is_link_stable()
    }

    /// Same as [`is_link_stable`](Self::is_link_stable).
    pub fn is_link_connected(&self) -> bool {
        self.is_link_stable()
    }

    /// True only in `AppProtocolConnected`.
    pub fn is_app_protocol_connected(&self) -> bool {
        self.state.is_app_protocol_connected()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn previous_state(&self) -> ConnectionState {
        self.previous
    }

    pub fn status(&self) -> MonitorStatus {
        MonitorStatus::new(self.state, self.previous)
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_timer.interval()
    }

    pub fn stability_interval(&self) -> Duration {
        self.stability_timer.interval()
    }

    /// Whether a stability check is armed and has not fired yet.
    pub fn stability_check_pending(&self) -> bool {
        self.stability_timer.is_running()
    }

    fn dispatch(&mut self, trigger: Trigger) {
        let Some(step) = evaluate(self.state, trigger, &AdapterProbe(&self.adapter)) else {
            return;
        };
        self.apply(step.to, Some(trigger));
        if let Some(action) = step.then {
            self.perform(action);
        }
    }

    fn apply(&mut self, new_state: ConnectionState, cause: Option<Trigger>) {
        self.previous = self.state;
        self.state = new_state;
        self.history.record(TransitionRecord {
            from: self.previous,
            to: new_state,
            cause,
            timestamp: Utc::now(),
        });
        info!(state = %new_state, from = %self.previous, "FSM, entering state");

        for action in entry_actions(new_state) {
            self.perform(*action);
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::NotifyLinkConnected(connected) => self.adapter.notify_link_connected(connected),
            Action::NotifyAppProtocolConnected(connected) => {
                self.adapter.notify_app_protocol_connected(connected)
            }
            Action::StartStabilityTimer => self.start_stability_timer(),
        }
    }

    fn now(&self) -> Instant {
        self.tick_time.unwrap_or_else(Instant::now)
    }
}

fn non_zero_or(interval: Duration, default: Duration, timer: &str) -> Duration {
    if interval.is_zero() {
        warn!(
            timer,
            default_ms = as_millis_u64(default),
            "zero timer interval, using default"
        );
        default
    } else {
        interval
    }
}

impl ConnectionMonitor<NullStatusSource> {
    /// Monitor without a real driver; it stays `Unconnected`.
    pub fn with_config(config: &MonitorConfig) -> Self {
        Self::new(NullStatusSource, config)
    }
}

impl Default for ConnectionMonitor<NullStatusSource> {
    fn default() -> Self {
        Self::with_config(&MonitorConfig::default())
    }
}
