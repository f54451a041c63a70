//! Fuzz target: status-line validation and companion decoding
//!
//! Any line the companion accepts must be one the panel could have sent:
//! re-encoding the decoded record reproduces the input content.
//!
//! cargo fuzz run fuzz_status_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use secpanel::protocol::companion::{AlarmLevel, decode_line};
use secpanel::protocol::record::{CONTENT_LEN, FRAME_LEN};
use secpanel::protocol::{StatusFrame, StatusRecord, is_valid};

fuzz_target!(|data: &[u8]| {
    if data.len() == FRAME_LEN {
        let mut bytes = [0u8; FRAME_LEN];
        bytes.copy_from_slice(data);
        let frame = StatusFrame::from_bytes(bytes);
        let binary = data[..CONTENT_LEN].iter().all(|b| *b == b'0' || *b == b'1');
        assert_eq!(is_valid(&frame), binary);
    }

    if let Ok(status) = decode_line(data) {
        let record = StatusRecord {
            humidity: status.flood == AlarmLevel::Alarm,
            smoke: status.smoke == AlarmLevel::Alarm,
            door: status.door == AlarmLevel::Alarm,
            motion: status.motion == AlarmLevel::Alarm,
            armed: status.armed.is_armed(),
        };
        assert_eq!(record.to_frame().content(), &data[..CONTENT_LEN]);
    }
});
