#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Default-Optionen; das Ergebnis wird iterativ freigegeben.
    let _ = rxdr::decode(data);
});
