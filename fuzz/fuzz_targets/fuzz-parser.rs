#![no_main]
use sqlriver_syntax::{parse, ParseOptions};

#[macro_use]
extern crate libfuzzer_sys;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse(s, ParseOptions::default());
    }
});
