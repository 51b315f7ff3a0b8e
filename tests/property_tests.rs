//! Property-based tests for the connection FSM.
//!
//! These tests use proptest to drive monitors with random signal and event
//! sequences and check the debounce and notification guarantees.

mod common;

use common::Recorder;
use conn_monitor::adapter::Notification;
use conn_monitor::core::{ConnectionState, Trigger};
use conn_monitor::{ConnectionMonitor, MonitorConfig};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Event {
    /// Set raw signals, then run a poll evaluation.
    Poll { link: bool, app: bool },
    /// Stability timer callback, possibly stale.
    StabilityExpiry,
    /// Application-protocol edge.
    AppEdge(bool),
}

prop_compose! {
    fn arbitrary_state()(variant in 0..4usize) -> ConnectionState {
        ConnectionState::ALL[variant]
    }
}

fn arbitrary_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => (any::<bool>(), any::<bool>()).prop_map(|(link, app)| Event::Poll { link, app }),
        1 => Just(Event::StabilityExpiry),
        1 => any::<bool>().prop_map(Event::AppEdge),
    ]
}

fn monitor() -> ConnectionMonitor<Recorder> {
    let config = MonitorConfig {
        history_capacity: 1024,
        ..MonitorConfig::default()
    };
    ConnectionMonitor::new(Recorder::default(), &config)
}

fn apply(monitor: &mut ConnectionMonitor<Recorder>, event: &Event) {
    match *event {
        Event::Poll { link, app } => {
            monitor.adapter_mut().link = link;
            monitor.adapter_mut().app = app;
            monitor.evaluate_state();
        }
        Event::StabilityExpiry => monitor.stability_timer_expired(),
        Event::AppEdge(connected) => monitor.set_app_protocol_state(connected),
    }
}

fn expected_for_run(run: usize) -> ConnectionState {
    match run {
        0 => ConnectionState::Unconnected,
        1 | 2 => ConnectionState::LinkConnected,
        _ => ConnectionState::StableLinkConnection,
    }
}

proptest! {
    #[test]
    fn stable_link_requires_confirmed_link(
        events in prop::collection::vec(arbitrary_event(), 1..64)
    ) {
        let mut monitor = monitor();
        for event in &events {
            apply(&mut monitor, event);
        }

        for record in monitor.history().transitions() {
            if record.to == ConnectionState::StableLinkConnection
                && record.from != ConnectionState::AppProtocolConnected
            {
                prop_assert_eq!(record.from, ConnectionState::LinkConnected);
                prop_assert_eq!(record.cause, Some(Trigger::StabilityTimerExpired));
            }
            if record.to == ConnectionState::AppProtocolConnected {
                prop_assert_eq!(record.from, ConnectionState::StableLinkConnection);
            }
        }
    }

    #[test]
    fn previous_state_tracks_last_transition(
        events in prop::collection::vec(arbitrary_event(), 1..64)
    ) {
        let mut monitor = monitor();
        for event in &events {
            apply(&mut monitor, event);
            match monitor.history().last() {
                Some(last) => {
                    prop_assert_eq!(monitor.previous_state(), last.from);
                    prop_assert_eq!(monitor.state(), last.to);
                }
                None => {
                    prop_assert_eq!(monitor.state(), ConnectionState::Unconnected);
                    prop_assert_eq!(monitor.previous_state(), ConnectionState::Unconnected);
                }
            }
        }
    }

    #[test]
    fn link_loss_poll_always_ends_unconnected(
        events in prop::collection::vec(arbitrary_event(), 0..32),
        app in any::<bool>()
    ) {
        let mut monitor = monitor();
        for event in &events {
            apply(&mut monitor, event);
        }
        let before = monitor.state();
        let transitions = monitor.history().len();

        apply(&mut monitor, &Event::Poll { link: false, app });

        prop_assert_eq!(monitor.state(), ConnectionState::Unconnected);
        if before == ConnectionState::Unconnected {
            prop_assert_eq!(monitor.history().len(), transitions);
        }
    }

    #[test]
    fn app_connect_edge_only_acts_in_stable_link(
        events in prop::collection::vec(arbitrary_event(), 0..32)
    ) {
        let mut monitor = monitor();
        for event in &events {
            apply(&mut monitor, event);
        }
        let before = monitor.state();

        monitor.set_app_protocol_state(true);

        if before == ConnectionState::StableLinkConnection {
            prop_assert_eq!(monitor.state(), ConnectionState::AppProtocolConnected);
        } else {
            prop_assert_eq!(monitor.state(), before);
        }
    }

    #[test]
    fn notifications_match_state_entries(
        events in prop::collection::vec(arbitrary_event(), 1..64)
    ) {
        let mut monitor = monitor();
        for event in &events {
            apply(&mut monitor, event);
        }

        let entries = |state: ConnectionState| {
            monitor.history().transitions().filter(|t| t.to == state).count()
        };
        let count = |n: Notification| {
            monitor.adapter().notifications.iter().filter(|&&x| x == n).count()
        };

        prop_assert_eq!(count(Notification::Link(true)), entries(ConnectionState::StableLinkConnection));
        prop_assert_eq!(count(Notification::AppProtocol(true)), entries(ConnectionState::AppProtocolConnected));
        prop_assert_eq!(count(Notification::Link(false)), entries(ConnectionState::Unconnected));

        // App-protocol loss is reported on entering Unconnected and on a
        // polled fall back to StableLinkConnection. The loss edge back to
        // LinkConnected reports nothing.
        let polled_fallbacks = monitor
            .history()
            .transitions()
            .filter(|t| {
                t.from == ConnectionState::AppProtocolConnected
                    && t.to == ConnectionState::StableLinkConnection
            })
            .count();
        prop_assert_eq!(
            count(Notification::AppProtocol(false)),
            entries(ConnectionState::Unconnected) + polled_fallbacks
        );
    }

    #[test]
    fn app_protocol_loss_edge_sends_no_notification(
        events in prop::collection::vec(arbitrary_event(), 0..32)
    ) {
        let mut monitor = monitor();
        for event in &events {
            apply(&mut monitor, event);
        }
        let before = monitor.state();
        let sent = monitor.adapter().notifications.len();

        monitor.set_app_protocol_state(false);

        if before == ConnectionState::AppProtocolConnected {
            prop_assert_eq!(monitor.state(), ConnectionState::LinkConnected);
            prop_assert!(monitor.stability_check_pending());
        }
        prop_assert_eq!(monitor.adapter().notifications.len(), sent);
    }

    #[test]
    fn polled_link_is_debounced_over_stability_interval(
        samples in prop::collection::vec(any::<bool>(), 1..40)
    ) {
        // Default tunables: polls every 1000 ms, confirmation after 2000 ms,
        // so the expiry coincides with the second poll after entry.
        let mut monitor = monitor();
        let mut run = 0;

        for link in samples {
            monitor.adapter_mut().link = link;
            let next = monitor.next_deadline().unwrap();
            monitor.tick(next);

            run = if link { run + 1 } else { 0 };
            prop_assert_eq!(monitor.state(), expected_for_run(run));
            prop_assert_eq!(monitor.is_link_connected(), run >= 3);
        }
    }

    #[test]
    fn state_name_is_stable(state in arbitrary_state()) {
        prop_assert_eq!(state.name(), state.name());
        prop_assert_eq!(state.to_string(), state.name());
    }

    #[test]
    fn state_roundtrip_serialization(state in arbitrary_state()) {
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: ConnectionState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(state, deserialized);
    }
}
