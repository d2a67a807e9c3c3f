#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = rxdr::xdr::XdrReader::new(data);
    if rxdr::header::read_header(&mut reader).is_err() {
        return;
    }
    while let Ok(len) = reader.read_length() {
        if reader.read_bytes(len).is_err() {
            break;
        }
    }
});
