#![no_main]

use libfuzzer_sys::fuzz_target;
use szamla_agent::agent::codec;
use szamla_agent::xml::parse;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = parse(s) {
            let _ = codec::embedded_error(&doc);
            let _ = codec::decode_taxpayer(doc);
        }
    }
});
