//! Verschachtelungstiefe mit Default-Optionen auf einem normalen Test-Thread.

use rxdr::options::DEFAULT_MAX_DEPTH;
use rxdr::{decode, Error, PairKind, Value};

include!("common/stream.rs");

/// `levels` ineinander geschachtelte Listen der Laenge 1, innen NULL.
fn nested_lists(levels: usize) -> Vec<u8> {
    let mut stream = Stream::xdr();
    for _ in 0..levels {
        stream = stream.list_header(0, 1);
    }
    stream.nil().finish()
}

/// Aufruf `f(f(...f()))`: jede LANGSXP-Zelle steckt im car der vorigen.
fn nested_calls(levels: usize) -> Vec<u8> {
    let mut stream = Stream::xdr();
    for _ in 0..levels {
        stream = stream.int(wire::LANG);
    }
    stream = stream.nil();
    for _ in 0..levels {
        stream = stream.nil();
    }
    stream.finish()
}

#[test]
fn lists_just_below_default_limit_decode() {
    let levels = DEFAULT_MAX_DEPTH - 1;
    let value = decode(&nested_lists(levels)).unwrap();

    // Iterativ absteigen; PartialEq und Debug waeren rekursiv.
    let mut seen = 0;
    let mut current = &value;
    while let Value::List(list) = current {
        assert_eq!(list.len(), 1);
        seen += 1;
        current = list.get(0).unwrap();
    }
    assert!(current.is_null());
    assert_eq!(seen, levels);
}

#[test]
fn calls_just_below_default_limit_decode() {
    let levels = DEFAULT_MAX_DEPTH - 1;
    let value = decode(&nested_calls(levels)).unwrap();

    let mut seen = 0;
    let mut current = &value;
    while let Value::PairList(cell) = current {
        assert_eq!(cell.kind, PairKind::Language);
        assert!(cell.cdr.is_null());
        seen += 1;
        current = &cell.car;
    }
    assert!(current.is_null());
    assert_eq!(seen, levels);
}

#[test]
fn lists_above_default_limit_fail() {
    let result = decode(&nested_lists(DEFAULT_MAX_DEPTH + 1));
    assert!(matches!(result, Err(Error::DepthLimitExceeded(DEFAULT_MAX_DEPTH))));
}

#[test]
fn calls_above_default_limit_fail() {
    let result = decode(&nested_calls(DEFAULT_MAX_DEPTH + 1));
    assert!(matches!(result, Err(Error::DepthLimitExceeded(DEFAULT_MAX_DEPTH))));
}

/// Weit ueber dem Default: mit angehobenem Limit kein Stack-Ueberlauf.
#[test]
fn raised_limit_is_not_bound_by_call_stack() {
    let levels = 200_000;
    let options = rxdr::DecodeOptions::default().with_max_depth(levels + 1);
    let value = rxdr::decode_with_options(&nested_lists(levels), options).unwrap();
    assert_eq!(value.len(), 1);
}
