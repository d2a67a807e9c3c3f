//! Decoded object graph.
//!
//! Container werden erst nach dem Lesen ihrer Attribute konstruiert und sind
//! danach unveraenderlich. Geteilte Teilstrukturen (Referenzen) zeigen auf
//! dieselbe `Rc`-Allokation.

use std::fmt;
use std::rc::Rc;

use crate::attributes::Attributes;

/// Integer NA sentinel (`NA_integer_`). Logical NA uses the same bit pattern.
pub const NA_INTEGER: i32 = i32::MIN;

/// Bit pattern of the real NA (`NA_real_`): a NaN whose low word is 1954.
pub const NA_REAL_BITS: u64 = 0x7FF0_0000_0000_07A2;

/// Low word that distinguishes `NA_real_` from other NaNs.
const NA_REAL_LOW_WORD: u64 = 1954;

/// Returns the real NA value.
pub fn na_real() -> f64 {
    f64::from_bits(NA_REAL_BITS)
}

/// `true` for `NA_real_`, `false` for every other value including ordinary NaN.
pub fn is_na_real(x: f64) -> bool {
    x.is_nan() && (x.to_bits() & 0xFFFF_FFFF) == NA_REAL_LOW_WORD
}

/// Scalar types that can be stored in an atomic [`Vector`].
pub trait Element: Clone + fmt::Debug {
    /// `true` if this scalar is the type's NA sentinel.
    fn is_na(&self) -> bool;

    /// Structural equality. Doubles compare by bit pattern so NA positions survive comparison.
    fn same(&self, other: &Self) -> bool;
}

impl Element for i32 {
    fn is_na(&self) -> bool {
        *self == NA_INTEGER
    }

    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

impl Element for f64 {
    fn is_na(&self) -> bool {
        is_na_real(*self)
    }

    fn same(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Element for u8 {
    fn is_na(&self) -> bool {
        false
    }

    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

/// Tri-state logical scalar, packed into a 32-bit integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Logical {
    False,
    True,
    Na,
}

impl Logical {
    /// Maps a wire integer: `0` is false, the NA pattern is NA, anything else is true.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::False,
            NA_INTEGER => Self::Na,
            _ => Self::True,
        }
    }

    /// `Some(bool)` for true/false, `None` for NA.
    pub fn to_bool(self) -> Option<bool> {
        match self {
            Self::False => Some(false),
            Self::True => Some(true),
            Self::Na => None,
        }
    }
}

impl From<bool> for Logical {
    fn from(b: bool) -> Self {
        if b { Self::True } else { Self::False }
    }
}

impl Element for Logical {
    fn is_na(&self) -> bool {
        *self == Self::Na
    }

    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

/// Complex scalar: two doubles.
#[derive(Debug, Clone, Copy)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Element for Complex {
    fn is_na(&self) -> bool {
        is_na_real(self.re) || is_na_real(self.im)
    }

    fn same(&self, other: &Self) -> bool {
        self.re.same(&other.re) && self.im.same(&other.im)
    }
}

/// Single string scalar (CHARSXP role). Either a text payload or the NA string.
///
/// Klonen teilt den Payload (`Rc<str>`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum CharString {
    Na,
    Text(Rc<str>),
}

impl CharString {
    /// Text payload, `None` for NA.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Na => None,
            Self::Text(s) => Some(s),
        }
    }

    /// `true` for the NA string.
    pub fn is_na(&self) -> bool {
        matches!(self, Self::Na)
    }

    /// `true` if both are NA or both share the same payload allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Na, Self::Na) => true,
            (Self::Text(a), Self::Text(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for CharString {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl fmt::Debug for CharString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Na => write!(f, "NA"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl fmt::Display for CharString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Na => write!(f, "NA"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Element for CharString {
    fn is_na(&self) -> bool {
        CharString::is_na(self)
    }

    fn same(&self, other: &Self) -> bool {
        self == other
    }
}

/// Atomic vector with its completeness flag and attributes.
#[derive(Debug, Clone)]
pub struct Vector<T: Element> {
    data: Vec<T>,
    /// false gdw. mindestens ein Element NA ist.
    complete: bool,
    attributes: Attributes,
    object: bool,
}

impl<T: Element> Vector<T> {
    /// Builds a vector without attributes. Completeness is derived from the data.
    pub fn new(data: Vec<T>) -> Self {
        Self::with_attributes(data, Attributes::default(), false)
    }

    /// Builds a vector with its final attribute set.
    pub fn with_attributes(data: Vec<T>, attributes: Attributes, object: bool) -> Self {
        let complete = !data.iter().any(Element::is_na);
        Self { data, complete, attributes, object }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// `false` iff at least one element is NA.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Value of the is-object bit of the item header.
    pub fn is_object(&self) -> bool {
        self.object
    }
}

impl<T: Element> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data.len() == other.data.len()
            && self.data.iter().zip(&other.data).all(|(a, b)| a.same(b))
            && self.attributes == other.attributes
            && self.object == other.object
    }
}

/// Generic vector (VECSXP): ordered values of arbitrary type.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    elements: Vec<Value>,
    attributes: Attributes,
    object: bool,
}

impl List {
    pub fn new(elements: Vec<Value>) -> Self {
        Self::with_attributes(elements, Attributes::default(), false)
    }

    pub fn with_attributes(elements: Vec<Value>, attributes: Attributes, object: bool) -> Self {
        Self { elements, attributes, object }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn is_object(&self) -> bool {
        self.object
    }

    /// Looks up an element by its `names` attribute.
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        let names = self.attributes.names()?;
        let pos = names.iter().position(|n| n.as_str() == Some(name))?;
        self.elements.get(pos)
    }
}

/// Which pairlist-family type a cons cell was encoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairKind {
    /// Dotted pair list (LISTSXP).
    List,
    /// Language construct / call (LANGSXP).
    Language,
    /// Closure (CLOSXP): car = formals, cdr = body, tag = environment slot.
    Closure,
    /// Promise (PROMSXP).
    Promise,
    /// `...` argument list (DOTSXP).
    Dots,
}

/// Cons cell: `car`, `cdr`, optional tag.
#[derive(Debug, Clone, PartialEq)]
pub struct PairList {
    pub kind: PairKind,
    pub tag: Option<CharString>,
    pub car: Value,
    pub cdr: Value,
    attributes: Attributes,
    object: bool,
}

impl PairList {
    pub fn new(kind: PairKind, tag: Option<CharString>, car: Value, cdr: Value) -> Self {
        Self::with_attributes(kind, tag, car, cdr, Attributes::default(), false)
    }

    pub fn with_attributes(
        kind: PairKind,
        tag: Option<CharString>,
        car: Value,
        cdr: Value,
        attributes: Attributes,
        object: bool,
    ) -> Self {
        Self { kind, tag, car, cdr, attributes, object }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn is_object(&self) -> bool {
        self.object
    }

    /// Tag text, `None` for untagged cells or an NA tag.
    pub fn tag_str(&self) -> Option<&str> {
        self.tag.as_ref().and_then(CharString::as_str)
    }

    /// Iterates this cell and every cell reachable through `cdr`.
    ///
    /// Stoppt am ersten `cdr`, der keine PairList ist (normalerweise `Null`).
    pub fn iter(&self) -> PairListIter<'_> {
        PairListIter { next: Some(self) }
    }

    /// Number of cells in the chain.
    pub fn len(&self) -> usize {
        self.iter().count()
    }
}

/// Iterator over a `cdr` chain.
pub struct PairListIter<'a> {
    next: Option<&'a PairList>,
}

impl<'a> Iterator for PairListIter<'a> {
    type Item = &'a PairList;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = match &current.cdr {
            Value::PairList(next) => Some(next),
            _ => None,
        };
        Some(current)
    }
}

// Rekursives Drop tiefer oder langer Ketten wuerde den Stack sprengen.
impl Drop for PairList {
    fn drop(&mut self) {
        if !self.car.is_container() && !self.cdr.is_container() {
            return;
        }
        let mut pending = vec![
            std::mem::replace(&mut self.car, Value::Null),
            std::mem::replace(&mut self.cdr, Value::Null),
        ];
        self.attributes.drain_into(&mut pending);
        release(pending);
    }
}

impl Drop for List {
    fn drop(&mut self) {
        if !self.elements.iter().any(Value::is_container) {
            return;
        }
        let mut pending = std::mem::take(&mut self.elements);
        self.attributes.drain_into(&mut pending);
        release(pending);
    }
}

/// Gibt Werte ohne Rekursion frei.
///
/// Container, deren `Rc` hier als letzter Besitzer endet, werden geleert und
/// ihre Kinder auf die Arbeitsliste gelegt. Geteilte Container bleiben
/// unangetastet.
pub(crate) fn release(mut pending: Vec<Value>) {
    while let Some(value) = pending.pop() {
        match value {
            Value::List(rc) => {
                if let Ok(mut list) = Rc::try_unwrap(rc) {
                    pending.append(&mut list.elements);
                    list.attributes.drain_into(&mut pending);
                }
            }
            Value::PairList(rc) => {
                if let Ok(mut cell) = Rc::try_unwrap(rc) {
                    pending.push(std::mem::replace(&mut cell.car, Value::Null));
                    pending.push(std::mem::replace(&mut cell.cdr, Value::Null));
                    cell.attributes.drain_into(&mut pending);
                }
            }
            Value::Logical(rc) => detach(rc, &mut pending),
            Value::Integer(rc) => detach(rc, &mut pending),
            Value::Real(rc) => detach(rc, &mut pending),
            Value::Complex(rc) => detach(rc, &mut pending),
            Value::String(rc) => detach(rc, &mut pending),
            Value::Raw(rc) => detach(rc, &mut pending),
            Value::Null | Value::Symbol(_) | Value::Char(_) => {}
        }
    }
}

fn detach<T: Element>(rc: Rc<Vector<T>>, pending: &mut Vec<Value>) {
    if let Ok(mut vector) = Rc::try_unwrap(rc) {
        vector.attributes.drain_into(pending);
    }
}

/// A decoded item.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `NULL` (NILVALUE_SXP).
    Null,
    /// Symbol; carries its name. Shared via the reference table.
    Symbol(CharString),
    /// Bare CHARSXP scalar.
    Char(CharString),
    Logical(Rc<Vector<Logical>>),
    Integer(Rc<Vector<i32>>),
    Real(Rc<Vector<f64>>),
    Complex(Rc<Vector<Complex>>),
    String(Rc<Vector<CharString>>),
    Raw(Rc<Vector<u8>>),
    List(Rc<List>),
    PairList(Rc<PairList>),
}

impl Value {
    /// Short type name for messages (`"integer"`, `"list"`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Symbol(_) => "symbol",
            Self::Char(_) => "char",
            Self::Logical(_) => "logical",
            Self::Integer(_) => "integer",
            Self::Real(_) => "double",
            Self::Complex(_) => "complex",
            Self::String(_) => "character",
            Self::Raw(_) => "raw",
            Self::List(_) => "list",
            Self::PairList(p) => match p.kind {
                PairKind::List => "pairlist",
                PairKind::Language => "language",
                PairKind::Closure => "closure",
                PairKind::Promise => "promise",
                PairKind::Dots => "...",
            },
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `true` for every `Rc`-backed variant.
    pub(crate) fn is_container(&self) -> bool {
        !matches!(self, Self::Null | Self::Symbol(_) | Self::Char(_))
    }

    /// Attribute set of containers; `None` for `Null`, symbols and CHARSXP scalars.
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Self::Null | Self::Symbol(_) | Self::Char(_) => None,
            Self::Logical(v) => Some(v.attributes()),
            Self::Integer(v) => Some(v.attributes()),
            Self::Real(v) => Some(v.attributes()),
            Self::Complex(v) => Some(v.attributes()),
            Self::String(v) => Some(v.attributes()),
            Self::Raw(v) => Some(v.attributes()),
            Self::List(l) => Some(l.attributes()),
            Self::PairList(p) => Some(p.attributes()),
        }
    }

    /// Completeness of atomic vectors; `None` for every other variant.
    pub fn is_complete(&self) -> Option<bool> {
        match self {
            Self::Logical(v) => Some(v.is_complete()),
            Self::Integer(v) => Some(v.is_complete()),
            Self::Real(v) => Some(v.is_complete()),
            Self::Complex(v) => Some(v.is_complete()),
            Self::String(v) => Some(v.is_complete()),
            Self::Raw(v) => Some(v.is_complete()),
            _ => None,
        }
    }

    /// Number of elements (cells for pairlists, 1 for scalars, 0 for `Null`).
    pub fn len(&self) -> usize {
        match self {
            Self::Null => 0,
            Self::Symbol(_) | Self::Char(_) => 1,
            Self::Logical(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Real(v) => v.len(),
            Self::Complex(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Raw(v) => v.len(),
            Self::List(l) => l.len(),
            Self::PairList(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if both values share the same allocation (aliased sub-structure).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Symbol(a), Self::Symbol(b)) | (Self::Char(a), Self::Char(b)) => a.ptr_eq(b),
            (Self::Logical(a), Self::Logical(b)) => Rc::ptr_eq(a, b),
            (Self::Integer(a), Self::Integer(b)) => Rc::ptr_eq(a, b),
            (Self::Real(a), Self::Real(b)) => Rc::ptr_eq(a, b),
            (Self::Complex(a), Self::Complex(b)) => Rc::ptr_eq(a, b),
            (Self::String(a), Self::String(b)) => Rc::ptr_eq(a, b),
            (Self::Raw(a), Self::Raw(b)) => Rc::ptr_eq(a, b),
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::PairList(a), Self::PairList(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_strings(&self) -> Option<&Vector<CharString>> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integers(&self) -> Option<&Vector<i32>> {
        match self {
            Self::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_reals(&self) -> Option<&Vector<f64>> {
        match self {
            Self::Real(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_pairlist(&self) -> Option<&PairList> {
        match self {
            Self::PairList(p) => Some(p),
            _ => None,
        }
    }

    /// Symbol name, if this is a symbol.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => name.as_str(),
            _ => None,
        }
    }
}
