//! Integration tests for the PanelService → encoder → validator → link
//! pipeline, driven entirely through mock adapters.

use crate::mock_hw::{DisplayCall, FakeClock, MemConfig, MockHardware, MockSerial, RecordingSink};

use secpanel::app::events::AppEvent;
use secpanel::app::ports::{ConfigError, ConfigPort, Notice};
use secpanel::app::service::PanelService;
use secpanel::config::SystemConfig;
use secpanel::panel::{ArmState, TagId};
use secpanel::protocol::companion::{self, AlarmLevel};
use secpanel::protocol::{self, StatusFrame};

const FIRST_TAG: TagId = TagId(9_804_081);
const SECOND_TAG: TagId = TagId(9_770_265);

struct Rig {
    panel: PanelService,
    hw: MockHardware,
    companion: MockSerial,
    debug: MockSerial,
    sink: RecordingSink,
}

impl Rig {
    fn new() -> Self {
        let mut sink = RecordingSink::new();
        let mut panel = PanelService::new(&SystemConfig::default());
        panel.start(0, &mut sink);
        Self {
            panel,
            hw: MockHardware::new(),
            companion: MockSerial::new(),
            debug: MockSerial::new(),
            sink,
        }
    }

    fn cycle(&mut self) -> Vec<u8> {
        self.panel
            .tick(&mut self.hw, &mut self.companion, &mut self.debug, &mut self.sink);
        self.companion.last().map(<[u8]>::to_vec).unwrap_or_default()
    }
}

// ── Arm / disarm ──────────────────────────────────────────────

#[test]
fn first_known_tag_arms_the_panel() {
    let mut rig = Rig::new();
    assert_eq!(rig.panel.state(), ArmState::Unarmed);

    rig.hw.present_tag(FIRST_TAG);
    let line = rig.cycle();

    assert_eq!(rig.panel.state(), ArmState::Armed);
    assert_eq!(line, b"00001\n");
    assert_eq!(rig.sink.arm_changes(), 1);
}

#[test]
fn same_tag_again_disarms_and_clears_display() {
    let mut rig = Rig::new();
    rig.hw.present_tag(FIRST_TAG);
    rig.cycle();

    rig.hw.present_tag(FIRST_TAG);
    let line = rig.cycle();

    assert_eq!(rig.panel.state(), ArmState::Unarmed);
    assert_eq!(line[4], b'0');
    assert_eq!(rig.hw.clears(), 1);
}

#[test]
fn either_known_tag_toggles() {
    let mut rig = Rig::new();
    rig.hw.present_tag(SECOND_TAG);
    rig.cycle();
    assert_eq!(rig.panel.state(), ArmState::Armed);

    rig.hw.present_tag(FIRST_TAG);
    rig.cycle();
    assert_eq!(rig.panel.state(), ArmState::Unarmed);
}

#[test]
fn unknown_tag_is_ignored_but_reported() {
    let mut rig = Rig::new();
    rig.hw.present_tag(TagId(1234));
    let line = rig.cycle();

    assert_eq!(rig.panel.state(), ArmState::Unarmed);
    assert_eq!(line, b"00000\n");
    assert_eq!(rig.sink.unknown_tags(), vec![TagId(1234)]);
    assert_eq!(rig.hw.clears(), 0);
}

#[test]
fn tag_absent_keeps_state_across_cycles() {
    let mut rig = Rig::new();
    rig.hw.present_tag(FIRST_TAG);
    rig.cycle();
    for _ in 0..5 {
        rig.cycle();
    }
    assert_eq!(rig.panel.state(), ArmState::Armed);
    assert_eq!(rig.sink.arm_changes(), 1);
}

// ── Door / motion gating ──────────────────────────────────────

#[test]
fn door_open_while_armed_sets_door_bit() {
    let mut rig = Rig::new();
    rig.hw.present_tag(FIRST_TAG);
    rig.cycle();

    rig.hw.open_door();
    let line = rig.cycle();

    assert_eq!(line, b"00101\n");
    assert_eq!(rig.hw.shown(), vec![Notice::DoorOpened]);
}

#[test]
fn door_open_while_unarmed_is_suppressed() {
    let mut rig = Rig::new();
    rig.hw.open_door();
    let line = rig.cycle();

    assert_eq!(line[protocol::record::DOOR_POS], b'0');
    assert!(rig.hw.shown().is_empty());
}

#[test]
fn motion_is_gated_like_the_door() {
    let mut rig = Rig::new();
    rig.hw.raw.motion_level = true;
    assert_eq!(rig.cycle(), b"00000\n");

    rig.hw.present_tag(FIRST_TAG);
    assert_eq!(rig.cycle(), b"00011\n");
}

#[test]
fn arming_and_door_open_in_same_cycle_reports_door() {
    let mut rig = Rig::new();
    rig.hw.open_door();
    rig.hw.present_tag(FIRST_TAG);

    assert_eq!(rig.cycle(), b"00101\n");
}

// ── Environmental alarms ──────────────────────────────────────

#[test]
fn smoke_above_threshold_without_humidity() {
    let mut rig = Rig::new();
    rig.hw.raw.smoke_ppm = 1500;
    let line = rig.cycle();

    assert_eq!(line[0], b'0');
    assert_eq!(line[1], b'1');
    assert_eq!(rig.hw.shown(), vec![Notice::SmokeDetected]);
}

#[test]
fn humidity_and_smoke_report_regardless_of_arm_state() {
    let mut rig = Rig::new();
    rig.hw.raw.humidity_percent = 90;
    rig.hw.raw.smoke_ppm = 4000;
    assert_eq!(rig.cycle(), b"11000\n");
}

#[test]
fn identical_inputs_give_identical_frames() {
    let mut rig = Rig::new();
    rig.hw.present_tag(FIRST_TAG);
    rig.cycle();
    rig.companion.writes.clear();

    rig.hw.raw.humidity_percent = 90;
    rig.hw.raw.smoke_ppm = 4000;
    rig.hw.open_door();
    rig.hw.raw.motion_level = true;
    for _ in 0..10 {
        rig.cycle();
    }

    assert_eq!(rig.companion.writes.len(), 10);
    assert!(rig.companion.writes.iter().all(|w| w.as_slice() == b"11111\n"));
}

#[test]
fn values_at_threshold_do_not_alarm() {
    let mut rig = Rig::new();
    rig.hw.raw.humidity_percent = 60;
    rig.hw.raw.smoke_ppm = 1000;
    assert_eq!(rig.cycle(), b"00000\n");
}

#[test]
fn notices_fire_once_per_alarm_onset() {
    let mut rig = Rig::new();
    rig.hw.raw.smoke_ppm = 2000;
    rig.cycle();
    rig.cycle();
    rig.cycle();
    assert_eq!(rig.hw.shown(), vec![Notice::SmokeDetected]);

    rig.hw.raw.smoke_ppm = 50;
    rig.cycle();
    rig.hw.raw.smoke_ppm = 2000;
    rig.cycle();
    assert_eq!(rig.hw.shown().len(), 2);
}

#[test]
fn notices_follow_lcd_order() {
    let mut rig = Rig::new();
    rig.hw.present_tag(FIRST_TAG);
    rig.cycle();

    rig.hw.raw.humidity_percent = 99;
    rig.hw.raw.smoke_ppm = 3000;
    rig.hw.raw.motion_level = true;
    rig.hw.open_door();
    assert_eq!(rig.cycle(), b"11111\n");
    assert_eq!(
        rig.hw.shown(),
        vec![
            Notice::DoorOpened,
            Notice::SmokeDetected,
            Notice::WaterDetected,
            Notice::MotionDetected,
        ]
    );
}

#[test]
fn disarming_clears_before_any_new_notice() {
    let mut rig = Rig::new();
    rig.hw.present_tag(FIRST_TAG);
    rig.cycle();

    rig.hw.present_tag(FIRST_TAG);
    rig.hw.raw.smoke_ppm = 3000;
    rig.cycle();

    let tail: Vec<DisplayCall> = rig.hw.calls.iter().rev().take(2).rev().copied().collect();
    assert_eq!(
        tail,
        vec![DisplayCall::Clear, DisplayCall::Show(Notice::SmokeDetected)]
    );
}

// ── Transmission ──────────────────────────────────────────────

#[test]
fn every_valid_cycle_goes_to_both_links() {
    let mut rig = Rig::new();
    for _ in 0..3 {
        rig.cycle();
    }
    assert_eq!(rig.companion.writes.len(), 3);
    assert_eq!(rig.debug.writes.len(), 3);
    assert_eq!(rig.panel.frames_sent(), 3);
    assert_eq!(rig.panel.frames_dropped(), 0);
    assert_eq!(rig.panel.cycle_count(), 3);
}

#[test]
fn corrupted_frame_is_dropped_silently() {
    let mut companion = MockSerial::new();
    let mut debug = MockSerial::new();

    for pos in 0..protocol::record::CONTENT_LEN {
        let mut frame = StatusFrame::from_bytes(*b"01010\n");
        frame.content_mut()[pos] = b'x';

        assert!(!protocol::is_valid(&frame));
        assert!(!protocol::publish(&frame, &mut companion, &mut debug));
    }

    assert!(companion.writes.is_empty());
    // The debug mirror still sees every attempt.
    assert_eq!(debug.writes.len(), protocol::record::CONTENT_LEN);
}

#[test]
fn status_event_matches_transmitted_frame() {
    let mut rig = Rig::new();
    rig.hw.raw.humidity_percent = 80;
    let line = rig.cycle();

    let last_status = rig.sink.events.iter().rev().find_map(|e| match e {
        AppEvent::Status(r) => Some(*r),
        _ => None,
    });
    let record = last_status.expect("a status event per cycle");
    assert_eq!(record.to_frame().as_bytes().as_slice(), line.as_slice());
    assert_eq!(rig.panel.last_record(), record);
    assert_eq!(rig.panel.frame().as_bytes().as_slice(), line.as_slice());
}

#[test]
fn companion_can_decode_what_the_panel_sends() {
    let mut rig = Rig::new();
    rig.hw.present_tag(FIRST_TAG);
    rig.cycle();
    rig.hw.raw.smoke_ppm = 5000;
    let line = rig.cycle();

    let status = companion::decode_line(&line).expect("panel output decodes");
    assert_eq!(status.smoke, AlarmLevel::Alarm);
    assert_eq!(status.flood, AlarmLevel::Normal);
    assert_eq!(status.armed, ArmState::Armed);
}

// ── Scheduling ────────────────────────────────────────────────

#[test]
fn wait_and_tick_sleeps_one_interval_per_cycle() {
    let config = SystemConfig::default();
    let mut clock = FakeClock::at(1_000);
    let mut hw = MockHardware::new();
    let mut companion = MockSerial::new();
    let mut debug = MockSerial::new();
    let mut sink = RecordingSink::new();

    let mut panel = PanelService::new(&config);
    panel.start(clock.now, &mut sink);
    assert_eq!(sink.events.first(), Some(&AppEvent::Started(ArmState::Unarmed)));

    panel.wait_and_tick(&mut clock, &mut hw, &mut companion, &mut debug, &mut sink);
    assert_eq!(clock.now, 1_000 + u64::from(config.cycle_interval_ms));
    assert_eq!(hw.reads, 1);

    panel.wait_and_tick(&mut clock, &mut hw, &mut companion, &mut debug, &mut sink);
    assert_eq!(clock.now, 1_000 + 2 * u64::from(config.cycle_interval_ms));
    assert_eq!(hw.reads, 2);
    assert_eq!(companion.writes.len(), 2);
}

#[test]
fn wait_and_tick_does_not_drift_with_slow_cycles() {
    let config = SystemConfig::default();
    let interval = u64::from(config.cycle_interval_ms);
    let mut clock = FakeClock::at(0);
    let mut hw = MockHardware::new();
    let mut companion = MockSerial::new();
    let mut debug = MockSerial::new();
    let mut sink = RecordingSink::new();

    let mut panel = PanelService::new(&config);
    panel.start(0, &mut sink);

    panel.wait_and_tick(&mut clock, &mut hw, &mut companion, &mut debug, &mut sink);
    // Cycle body took 300 ms; the next one still lands on the grid.
    clock.advance(300);
    panel.wait_and_tick(&mut clock, &mut hw, &mut companion, &mut debug, &mut sink);

    assert_eq!(clock.now, 2 * interval);
}

// ── Config round-trip through the port ────────────────────────

#[test]
fn config_port_rejects_invalid_and_keeps_previous() {
    let store = MemConfig::default();
    assert_eq!(store.load().ok(), Some(SystemConfig::default()));

    let tuned = SystemConfig {
        smoke_high_ppm: 700,
        ..SystemConfig::default()
    };
    store.save(&tuned).expect("valid config saves");

    let broken = SystemConfig {
        known_tags: [5, 5],
        ..SystemConfig::default()
    };
    assert!(matches!(
        store.save(&broken),
        Err(ConfigError::ValidationFailed(_))
    ));
    assert_eq!(store.load().ok(), Some(tuned.clone()));

    // A panel built from the stored config uses its thresholds.
    let mut panel = PanelService::new(&tuned);
    let mut hw = MockHardware::new();
    hw.raw.smoke_ppm = 800;
    let mut companion = MockSerial::new();
    let mut debug = MockSerial::new();
    let mut sink = RecordingSink::new();
    let report = panel.tick(&mut hw, &mut companion, &mut debug, &mut sink);
    assert!(report.record.smoke);
    assert!(report.sent);
}
