//! Fuzz target: `TagDecoder::feed`
//!
//! Drives arbitrary reader output into the streaming tag decoder. It must
//! never panic, and a clean frame fed after the noise must still decode.
//!
//! cargo fuzz run fuzz_tag_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use secpanel::panel::TagId;
use secpanel::sensors::rfid::{TagDecoder, encode_frame};

fuzz_target!(|data: &[u8]| {
    let mut decoder = TagDecoder::new();
    let _ = decoder.feed_all(data);

    let probe = TagId(0x0095_9931);
    assert_eq!(decoder.feed_all(&encode_frame(probe)), Some(probe));

    // Byte-at-a-time and burst feeding agree.
    let mut a = TagDecoder::new();
    let mut b = TagDecoder::new();
    let single = data.iter().fold(None, |last, &byte| a.feed(byte).or(last));
    assert_eq!(single, b.feed_all(data));
});
