#![no_main]
use libfuzzer_sys::fuzz_target;
use radar_hardware::frame::{FrameParser, Reading};

fuzz_target!(|data: &[u8]| {
    // Arbitrary UART noise must never panic the parser, and any reading it
    // does produce must have come from a well-formed frame.
    let mut parser = FrameParser::new();
    for &byte in data {
        if let Some(reading) = parser.push(byte) {
            match reading {
                Reading::Distance(_) | Reading::Speed(_) => {}
            }
        }
    }
});
