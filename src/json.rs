//! JSON rendering of a decoded object graph (inspection tooling).
//!
//! Abbildung:
//! - `NULL` -> `null`, NA-Elemente -> `null`
//! - atomare Vektoren und Listen ohne Attribute -> JSON-Array
//! - mit Attributen -> `{"type", "values", "attributes"}`
//! - Pairlists -> `{"type", "cells": [{"tag", "value"}], "tail"?}`
//!
//! Nicht-endliche Doubles (NaN, Inf) haben keine JSON-Zahl und werden als
//! String `"NaN"`, `"Inf"`, `"-Inf"` geschrieben; NA bleibt `null`.

use serde_json::{json, Map, Number, Value as Json};

use crate::attributes::Attributes;
use crate::value::{CharString, Complex, Element, Logical, PairList, Value, Vector};

/// Renders `value` as a JSON tree.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Symbol(name) => json!({ "symbol": char_json(name) }),
        Value::Char(s) => char_json(s),
        Value::Logical(v) => vector_json(value, v, |x: &Logical| match x.to_bool() {
            Some(b) => Json::Bool(b),
            None => Json::Null,
        }),
        Value::Integer(v) => vector_json(value, v, |x: &i32| {
            if x.is_na() { Json::Null } else { Json::from(*x) }
        }),
        Value::Real(v) => vector_json(value, v, |x: &f64| real_json(*x)),
        Value::Complex(v) => vector_json(value, v, |c: &Complex| {
            if c.is_na() {
                Json::Null
            } else {
                json!({ "re": real_json(c.re), "im": real_json(c.im) })
            }
        }),
        Value::String(v) => vector_json(value, v, char_json),
        Value::Raw(v) => vector_json(value, v, |b: &u8| Json::from(*b)),
        Value::List(list) => {
            let values: Vec<Json> = list.iter().map(to_json).collect();
            wrap(value, Json::Array(values), list.attributes())
        }
        Value::PairList(head) => pairlist_json(value, head),
    }
}

fn char_json(s: &CharString) -> Json {
    match s.as_str() {
        Some(text) => Json::String(text.to_owned()),
        None => Json::Null,
    }
}

fn real_json(x: f64) -> Json {
    if x.is_na() {
        return Json::Null;
    }
    match Number::from_f64(x) {
        Some(n) => Json::Number(n),
        None if x.is_nan() => Json::String("NaN".into()),
        None if x > 0.0 => Json::String("Inf".into()),
        None => Json::String("-Inf".into()),
    }
}

fn vector_json<T: Element>(value: &Value, v: &Vector<T>, element: impl Fn(&T) -> Json) -> Json {
    let values = Json::Array(v.iter().map(element).collect());
    wrap(value, values, v.attributes())
}

/// Ohne Attribute bleibt es beim nackten Array.
fn wrap(value: &Value, values: Json, attributes: &Attributes) -> Json {
    if attributes.is_empty() {
        return values;
    }
    json!({
        "type": value.type_name(),
        "values": values,
        "attributes": attributes_json(attributes),
    })
}

fn attributes_json(attributes: &Attributes) -> Json {
    let mut map = Map::with_capacity(attributes.len());
    for (name, value) in attributes.iter() {
        map.insert(name.to_owned(), to_json(&value));
    }
    Json::Object(map)
}

/// cdr-Kette iterativ; nur car-Werte werden rekursiv gerendert.
fn pairlist_json(value: &Value, head: &PairList) -> Json {
    let mut cells = Vec::new();
    let mut tail = &Value::Null;
    for cell in head.iter() {
        let mut entry = Map::new();
        if let Some(tag) = &cell.tag {
            entry.insert("tag".into(), char_json(tag));
        }
        entry.insert("value".into(), to_json(&cell.car));
        if !cell.attributes().is_empty() {
            entry.insert("attributes".into(), attributes_json(cell.attributes()));
        }
        cells.push(Json::Object(entry));
        tail = &cell.cdr;
    }

    let mut out = Map::new();
    out.insert("type".into(), Json::String(value.type_name().into()));
    out.insert("cells".into(), Json::Array(cells));
    // Dotted pair: nicht-Pairlist-Ende mitgeben.
    if !tail.is_null() && tail.as_pairlist().is_none() {
        out.insert("tail".into(), to_json(tail));
    }
    Json::Object(out)
}
