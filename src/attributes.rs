//! Attribute binding.
//!
//! Attribute werden auf dem Draht als Pairlist codiert (Tag = Attributname,
//! car = Wert). Der Binder liest die Pairlist vollstaendig in ein
//! `Attributes`-Objekt, bevor der Container konstruiert wird. Es gibt keinen
//! halb attributierten Zwischenzustand.
//!
//! Erkannte Schluessel bekommen eigene Slots: `names`, `dim`, `dimnames`,
//! `row.names`, `class`. Alles andere landet in einer geordneten Map.

use std::rc::Rc;

use crate::value::{release, CharString, PairList, Value, Vector, NA_INTEGER};
use crate::{Error, FastIndexMap, Result};

pub const NAMES: &str = "names";
pub const DIM: &str = "dim";
pub const DIMNAMES: &str = "dimnames";
pub const ROW_NAMES: &str = "row.names";
pub const CLASS: &str = "class";

/// Attribute set of a container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    names: Option<Rc<Vector<CharString>>>,
    dim: Option<Rc<Vector<i32>>>,
    dimnames: Option<Value>,
    row_names: Option<Value>,
    class: Option<Rc<Vector<CharString>>>,
    other: FastIndexMap<Rc<str>, Value>,
}

impl Attributes {
    /// Element names (`names`).
    pub fn names(&self) -> Option<&Vector<CharString>> {
        self.names.as_deref()
    }

    /// Shape (`dim`).
    pub fn dim(&self) -> Option<&Vector<i32>> {
        self.dim.as_deref()
    }

    /// Dimension names (`dimnames`): a list, one entry per dimension.
    pub fn dimnames(&self) -> Option<&Value> {
        self.dimnames.as_ref()
    }

    /// Row labels (`row.names`): integer or character vector.
    pub fn row_names(&self) -> Option<&Value> {
        self.row_names.as_ref()
    }

    /// Dispatch classes (`class`).
    pub fn class(&self) -> Option<&Vector<CharString>> {
        self.class.as_deref()
    }

    /// `true` if `class` contains `name`.
    pub fn inherits(&self, name: &str) -> bool {
        self.class().is_some_and(|c| c.iter().any(|s| s.as_str() == Some(name)))
    }

    /// Number of rows described by `row.names`.
    ///
    /// Kompakte Form `c(NA_integer_, -n)` bzw. `c(NA_integer_, n)` wird aufgeloest.
    pub fn row_count(&self) -> Option<usize> {
        match self.row_names.as_ref()? {
            Value::Integer(v) => match v.as_slice() {
                [NA_INTEGER, n] => Some(n.unsigned_abs() as usize),
                other => Some(other.len()),
            },
            Value::String(v) => Some(v.len()),
            _ => None,
        }
    }

    /// Attribute by name, recognised or generic.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            NAMES => self.names.clone().map(Value::String),
            DIM => self.dim.clone().map(Value::Integer),
            DIMNAMES => self.dimnames.clone(),
            ROW_NAMES => self.row_names.clone(),
            CLASS => self.class.clone().map(Value::String),
            _ => self.other.get(name).cloned(),
        }
    }

    /// Attributes without a dedicated slot, in stream order.
    pub fn other(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.other.iter().map(|(k, v)| (&**k, v))
    }

    /// All attributes in canonical order: dedicated slots first, then the rest.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Value)> {
        let mut out: Vec<(&str, Value)> = Vec::with_capacity(self.len());
        for name in [NAMES, DIM, DIMNAMES, ROW_NAMES, CLASS] {
            if let Some(v) = self.get(name) {
                out.push((name, v));
            }
        }
        out.extend(self.other.iter().map(|(k, v)| (&**k, v.clone())));
        out.into_iter()
    }

    /// Number of attributes present.
    pub fn len(&self) -> usize {
        [
            self.names.is_some(),
            self.dim.is_some(),
            self.dimnames.is_some(),
            self.row_names.is_some(),
            self.class.is_some(),
        ]
        .into_iter()
        .filter(|&b| b)
        .count()
            + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves every attribute value into `out` and leaves the set empty.
    pub(crate) fn drain_into(&mut self, out: &mut Vec<Value>) {
        out.extend(self.names.take().map(Value::String));
        out.extend(self.dim.take().map(Value::Integer));
        out.extend(self.dimnames.take());
        out.extend(self.row_names.take());
        out.extend(self.class.take().map(Value::String));
        out.extend(self.other.drain(..).map(|(_, v)| v));
    }

    /// Binds one tag/value pair. Recognised tags check the value's shape.
    fn insert(&mut self, tag: &str, value: Value) -> Result<()> {
        match tag {
            NAMES => self.names = Some(expect_strings(tag, value)?),
            DIM => match value {
                Value::Integer(v) => self.dim = Some(v),
                other => return Err(shape_error(tag, "an integer vector", &other)),
            },
            DIMNAMES => match value {
                Value::List(_) | Value::Null => self.dimnames = Some(value),
                other => return Err(shape_error(tag, "a list", &other)),
            },
            ROW_NAMES => match value {
                Value::Integer(_) | Value::String(_) => self.row_names = Some(value),
                other => {
                    return Err(shape_error(tag, "an integer or character vector", &other));
                }
            },
            CLASS => self.class = Some(expect_strings(tag, value)?),
            _ => {
                self.other.insert(tag.into(), value);
            }
        }
        Ok(())
    }
}

// Attribut-Werte koennen selbst attributierte Container sein; Abbau iterativ.
impl Drop for Attributes {
    fn drop(&mut self) {
        if self.is_empty() {
            return;
        }
        let mut pending = Vec::new();
        self.drain_into(&mut pending);
        release(pending);
    }
}

fn expect_strings(tag: &str, value: Value) -> Result<Rc<Vector<CharString>>> {
    match value {
        Value::String(v) => Ok(v),
        other => Err(shape_error(tag, "a character vector", &other)),
    }
}

fn shape_error(tag: &str, expected: &str, found: &Value) -> Error {
    Error::malformed_attribute(format!(
        "'{tag}' must be {expected}, found {}",
        found.type_name()
    ))
}

/// Interprets a decoded attribute pairlist as an attribute set.
///
/// Walks the `cdr` chain until `Null`. Every cell needs a non-NA tag.
pub fn bind(attributes: &Value) -> Result<Attributes> {
    let head: &PairList = match attributes {
        Value::PairList(p) => p,
        other => {
            return Err(Error::malformed_attribute(format!(
                "attribute set must be a pairlist, found {}",
                other.type_name()
            )));
        }
    };

    let mut bound = Attributes::default();
    let mut cell = head;
    loop {
        let tag = cell
            .tag_str()
            .ok_or_else(|| Error::malformed_attribute("attribute without a tag"))?;
        bound.insert(tag, cell.car.clone())?;
        match &cell.cdr {
            Value::Null => break,
            Value::PairList(next) => cell = next,
            other => {
                return Err(Error::malformed_attribute(format!(
                    "attribute pairlist terminated by {}",
                    other.type_name()
                )));
            }
        }
    }
    Ok(bound)
}
