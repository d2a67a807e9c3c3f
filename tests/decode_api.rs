//! End-to-End-Tests ueber die oeffentliche API.

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use rxdr::{
    decode, decode_reader, decode_with_header, decode_with_options, read_stream_header,
    DecodeOptions, Error, Format, PairKind, Value,
};

include!("common/stream.rs");

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// `data.frame(x = 1:2, y = c("a", NA))` wie von `serialize()` geschrieben.
fn data_frame() -> Vec<u8> {
    Stream::xdr()
        .list_header(wire::ATTR | wire::OBJECT, 2)
        .ints(&[1, 2])
        .strs_with(0, &[Some("a"), None])
        // Attribute: names, class, row.names (kompakt)
        .tagged_cell("names")
        .strs(&["x", "y"])
        .tagged_cell("class")
        .strs(&["data.frame"])
        .tagged_cell("row.names")
        .ints(&[wire::NA_INT, -2])
        .nil()
        .finish()
}

#[test]
fn data_frame_round_trip() {
    let value = decode(&data_frame()).unwrap();
    let df = value.as_list().unwrap();
    assert!(df.is_object());

    let attrs = df.attributes();
    assert!(attrs.inherits("data.frame"));
    assert_eq!(attrs.row_count(), Some(2));

    let x = df.get_named("x").and_then(Value::as_integers).unwrap();
    assert_eq!(x.as_slice(), &[1, 2]);
    assert!(x.is_complete());

    let y = df.get_named("y").and_then(Value::as_strings).unwrap();
    assert!(!y.is_complete());
    assert!(y.get(1).unwrap().is_na());
}

#[test]
fn header_is_reported() {
    let (header, value) = decode_with_header(&data_frame(), DecodeOptions::default()).unwrap();
    assert_eq!(header.format, Format::Xdr);
    assert!(!header.workspace);
    assert_eq!(header.version, 2);
    assert_eq!(header.writer_version.to_string(), "4.3.1");
    assert_eq!(header.min_reader_version.to_string(), "2.3.0");
    assert_eq!(value.len(), 2);
}

#[test]
fn gzip_envelope_is_transparent() {
    let plain = decode(&data_frame()).unwrap();
    let packed = decode(&gzip(&data_frame())).unwrap();
    assert_eq!(plain, packed);
}

#[test]
fn gzip_without_decompress_is_rejected() {
    let options = DecodeOptions::default().with_decompress(false);
    let err = decode_with_options(&gzip(&data_frame()), options).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)), "{err}");
}

#[test]
fn workspace_magic_is_skipped() {
    let bytes = Stream::raw().bytes(b"RDX2\n").bytes(&data_frame()).finish();
    let header = read_stream_header(&bytes, DecodeOptions::default()).unwrap();
    assert!(header.workspace);
    assert!(decode(&bytes).unwrap().as_list().is_some());
}

#[test]
fn other_markers_are_unsupported() {
    let markers: [&[u8]; 3] = [b"A\n", b"B\n", b"\n\n"];
    for marker in markers {
        let bytes = Stream::raw().bytes(marker).int(2).int(0).int(0).nil().finish();
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)), "{err}");
    }
    let err = decode(b"RDA2\nA\n").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)), "{err}");
}

#[test]
fn version_three_is_unsupported() {
    let bytes = Stream::raw().bytes(b"X\n").int(3).int(0x0004_0301).int(0x0003_0500).nil().finish();
    let err = decode(&bytes).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(ref m) if m.contains('3')), "{err}");
}

#[test]
fn empty_input_is_truncated() {
    assert!(matches!(decode(&[]), Err(Error::TruncatedStream { .. })));
    // Header ohne Item.
    let bytes = Stream::xdr().finish();
    assert!(matches!(decode(&bytes), Err(Error::TruncatedStream { .. })));
}

#[test]
fn decode_from_reader() {
    let bytes = gzip(&data_frame());
    let value = decode_reader(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(value.len(), 2);
}

/// Funktionsaufruf `f(x, n = 1L)` als LANGSXP-Kette.
#[test]
fn language_object() {
    let bytes = Stream::xdr()
        .int(wire::LANG)
        .sym("f")
        .int(wire::LIST)
        .sym("x")
        .tagged_cell("n")
        .ints(&[1])
        .nil()
        .finish();
    let value = decode(&bytes).unwrap();
    assert_eq!(value.type_name(), "language");

    let call = value.as_pairlist().unwrap();
    assert_eq!(call.kind, PairKind::Language);
    assert_eq!(call.car.symbol_name(), Some("f"));
    let args: Vec<_> = call.iter().skip(1).collect();
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].tag_str(), None);
    assert_eq!(args[0].car.symbol_name(), Some("x"));
    assert_eq!(args[1].tag_str(), Some("n"));
    assert_eq!(args[1].kind, PairKind::List);
}

/// Matrix mit `dim` und `dimnames` (Spaltennamen fehlen).
#[test]
fn matrix_with_dimnames() {
    let bytes = Stream::xdr()
        .reals_with(wire::ATTR, &[1.0, 2.0, 3.0, 4.0])
        .tagged_cell("dim")
        .ints(&[2, 2])
        .tagged_cell("dimnames")
        .list_header(0, 2)
        .strs(&["r1", "r2"])
        .nil()
        .nil()
        .finish();
    let value = decode(&bytes).unwrap();
    let attrs = value.attributes().unwrap();
    assert_eq!(attrs.dim().unwrap().as_slice(), &[2, 2]);
    let dimnames = attrs.dimnames().and_then(Value::as_list).unwrap();
    assert_eq!(dimnames.len(), 2);
    assert!(dimnames.get(1).unwrap().is_null());
}

#[test]
fn strict_mode_rejects_trailing_bytes() {
    let bytes = Stream::xdr().nil().bytes(&[0, 0]).finish();
    assert_eq!(decode(&bytes).unwrap(), Value::Null);
    let strict = DecodeOptions::default().with_trailing_bytes(false);
    assert!(matches!(decode_with_options(&bytes, strict), Err(Error::TrailingBytes(2))));
}

#[test]
fn decoding_is_deterministic() {
    let bytes = data_frame();
    assert_eq!(decode(&bytes).unwrap(), decode(&bytes).unwrap());
}
