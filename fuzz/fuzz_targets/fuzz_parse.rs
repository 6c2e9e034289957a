#![no_main]

use libfuzzer_sys::fuzz_target;
use szamla_agent::xml::{parse, project, strip_namespaces};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(doc) = parse(s) {
            let doc = strip_namespaces(doc);
            let _ = project(&doc, &[("a.b.c", "c"), ("xmlszamlavalasz.pdf", "pdf")]);
        }
    }
});
