//! End-to-end pipeline scenarios against recording doubles.

#[allow(dead_code)]
#[path = "../src/mock.rs"]
mod mock;

use embassy_futures::block_on;
use iot_screen_core::{
    ControlLoop, DropReason, FrameOutcome, PanelConfig, SplashOutcome, SupervisorOutcome,
};
use iot_screen_display::Rotation;
use iot_screen_hal::{Link, StaticAssets};
use iot_screen_protocol::{encode, DecodeError, FRAME_CAPACITY};
use mock::{solid_bmp, Call, MockDelay, MockLink, MockRender, Trace};
use proptest::prelude::*;

fn record(app: &str, payload: &str) -> Vec<u8> {
    let mut buf = [0u8; FRAME_CAPACITY];
    let len = encode(app, payload, &mut buf).unwrap();
    buf[..len].to_vec()
}

fn oled_panel(link: MockLink, trace: &Trace) -> ControlLoop<MockLink, MockRender, MockDelay> {
    ControlLoop::new(
        link,
        MockRender::oled(trace),
        MockDelay::new(trace),
        PanelConfig::default(),
    )
}

fn text(lines: &[&str]) -> Call {
    Call::Text(lines.iter().map(|l| l.to_string()).collect())
}

#[test]
fn status_ok_clears_then_shows_both_lines() {
    let trace = Trace::default();
    let link = MockLink::connected(&trace).with_frame(&record("STATUS", "OK"));
    let mut panel = oled_panel(link, &trace);

    block_on(panel.cycle());

    assert_eq!(trace.render_calls(), vec![Call::Clear, text(&["STATUS", "OK"])]);
}

#[test]
fn repeated_pings_never_touch_the_display() {
    let trace = Trace::default();
    let mut link = MockLink::connected(&trace);
    for _ in 0..10 {
        link = link.with_frame(&record("PING", ""));
    }
    let mut panel = oled_panel(link, &trace);

    for _ in 0..10 {
        let report = block_on(panel.cycle());
        assert!(matches!(report.frame, FrameOutcome::Keepalive { .. }));
    }

    assert!(trace.render_calls().is_empty());
    assert_eq!(panel.dispatcher().keepalives(), 10);
}

#[test]
fn three_failures_then_success_makes_exactly_four_attempts() {
    let trace = Trace::default();
    let link = MockLink::new(&trace).with_connects(&[false, false, false, true]);
    let mut panel = oled_panel(link, &trace);

    let outcomes: Vec<SupervisorOutcome> = (0..6).map(|_| block_on(panel.cycle()).link).collect();

    assert_eq!(trace.connects(), 4);
    assert_eq!(outcomes[3], SupervisorOutcome::Reconnected { attempts: 4 });
    assert_eq!(outcomes[4], SupervisorOutcome::Healthy);
    assert_eq!(outcomes[5], SupervisorOutcome::Healthy);
    assert!(panel.link().is_connected());

    // Backoff after each failure, idle delay every cycle
    assert_eq!(
        trace.delays(),
        vec![1000, 500, 1000, 500, 1000, 500, 500, 500, 500]
    );
}

#[test]
fn zero_byte_reads_never_render() {
    let trace = Trace::default();
    let mut panel = oled_panel(MockLink::connected(&trace), &trace);

    for _ in 0..5 {
        assert_eq!(block_on(panel.cycle()).frame, FrameOutcome::Idle);
    }

    assert!(trace.render_calls().is_empty());
    assert_eq!(panel.dispatcher().rendered(), 0);
}

#[test]
fn boot_completes_without_splash_asset() {
    let trace = Trace::default();
    let link = MockLink::new(&trace).with_connects(&[true]);
    let mut panel = ControlLoop::new(
        link,
        MockRender::tft(&trace),
        MockDelay::new(&trace),
        PanelConfig::default(),
    );

    let report = block_on(panel.startup(&StaticAssets::empty())).unwrap();

    assert_eq!(report.boot.splash, SplashOutcome::Missing);
    assert!(trace.calls().contains(&text(&["Welcome to the", "IoT Screen"])));
    assert_eq!(report.connect, Ok(()));
}

#[test]
fn tft_boots_with_splash_then_sweeps() {
    let trace = Trace::default();
    let logo = solid_bmp(64, 64);
    let table = [("/logo.bmp", logo.as_slice())];
    let link = MockLink::new(&trace)
        .with_connects(&[true])
        .with_frame(&record("Spotify", "Artist - Title"));
    let mut panel = ControlLoop::new(
        link,
        MockRender::tft(&trace),
        MockDelay::new(&trace),
        PanelConfig::default(),
    );

    let startup = block_on(panel.startup(&StaticAssets::new(&table))).unwrap();
    assert_eq!(startup.boot.splash, SplashOutcome::Shown { tiles: 16 });
    trace.take();

    let report = block_on(panel.cycle());

    assert_eq!(report.rotation, Some(Rotation::Deg270));
    assert!(matches!(report.frame, FrameOutcome::Rendered { .. }));
    assert_eq!(
        trace.calls(),
        vec![
            Call::Rotate(Rotation::Deg0),
            Call::Delay(1000),
            Call::Rotate(Rotation::Deg90),
            Call::Delay(1000),
            Call::Rotate(Rotation::Deg180),
            Call::Delay(1000),
            Call::Rotate(Rotation::Deg270),
            Call::Delay(1000),
            Call::Marker,
            Call::Read(56),
            Call::Clear,
            text(&["Spotify", "Artist - Title"]),
            Call::Delay(500),
        ]
    );
}

#[test]
fn split_record_is_not_reassembled() {
    let trace = Trace::default();
    let full = record("STATUS", "a longer payload that spans reads");
    let (head, tail) = full.split_at(20);
    let link = MockLink::connected(&trace).with_frame(head).with_frame(tail);
    let mut panel = oled_panel(link, &trace);

    let first = block_on(panel.cycle());
    let second = block_on(panel.cycle());

    assert!(matches!(first.frame, FrameOutcome::Dropped { len: 20, .. }));
    assert!(matches!(
        second.frame,
        FrameOutcome::Dropped { reason: DropReason::Malformed(_), .. }
    ));
    assert!(trace.render_calls().is_empty());
}

#[test]
fn trailing_bytes_after_a_record_are_ignored() {
    let trace = Trace::default();
    let mut bytes = record("STATUS", "OK");
    bytes.extend_from_slice(&record("OTHER", "IGNORED"));
    let link = MockLink::connected(&trace).with_frame(&bytes);
    let mut panel = oled_panel(link, &trace);

    block_on(panel.cycle());

    assert_eq!(trace.render_calls(), vec![Call::Clear, text(&["STATUS", "OK"])]);
}

#[test]
fn short_frame_is_dropped_as_too_short() {
    let trace = Trace::default();
    let link = MockLink::connected(&trace).with_frame(&[0u8; 11]);
    let mut panel = oled_panel(link, &trace);

    let report = block_on(panel.cycle());

    assert_eq!(
        report.frame,
        FrameOutcome::Dropped {
            len: 11,
            reason: DropReason::Malformed(DecodeError::TooShort),
        }
    );
}

proptest! {
    #[test]
    fn n_failures_take_n_plus_one_attempts(failures in 0usize..12) {
        let trace = Trace::default();
        let mut outcomes = vec![false; failures];
        outcomes.push(true);
        let link = MockLink::new(&trace).with_connects(&outcomes);
        let mut panel = oled_panel(link, &trace);

        for _ in 0..failures + 3 {
            block_on(panel.cycle());
        }

        prop_assert_eq!(trace.connects(), failures + 1);
        prop_assert_eq!(trace.count(|c| *c == Call::Delay(1000)), failures);
        prop_assert_eq!(panel.supervisor().total_attempts() as usize, failures + 1);
        prop_assert!(panel.link().is_connected());
    }
}
