use std::rc::Rc;

use crate::attributes::Attributes;
use crate::flags::Flags;
use crate::sexptype::SexpType;
use crate::value::{CharString, Complex, List, Logical, PairKind, PairList, Value, Vector};

/// What the driver loop has to do next.
pub(super) enum Next {
    /// Read a flag word and open the item behind it.
    Item,
    /// Open an item whose flag word was already consumed.
    ItemWith(Flags),
    /// An item is complete; hand it to the enclosing frame.
    Done(Value),
}

/// Offener Container auf dem Heap-Stack des Decoders.
///
/// Jede Verschachtelungsebene ist genau ein Frame. Die Tiefe eines Items ist
/// damit die Stack-Laenge und nicht die Tiefe des Aufruf-Stacks.
pub(super) enum Frame {
    /// VECSXP: `remaining` Elemente stehen noch aus.
    List { flags: Flags, elements: Vec<Value>, remaining: usize },
    /// STRSXP: jedes Element muss eine CHARSXP sein.
    Strings { flags: Flags, data: Vec<CharString>, remaining: usize },
    /// Nutzdaten komplett, das naechste Item ist die Attribut-Pairlist.
    Attributes { flags: Flags, payload: Payload },
    /// CHARSXP mit Attribut-Bit: das naechste Item wird verworfen.
    CharAttributes(CharString),
    /// SYMSXP: das naechste Item ist der Name.
    SymbolName,
    /// Pairlist-Kette; ihre cdr-Zellen teilen sich einen Frame.
    Pairs(PairChain),
}

/// Fertig gelesene Vektordaten, die noch auf ihre Attribute warten.
pub(super) enum Payload {
    Logical(Vec<Logical>),
    Integer(Vec<i32>),
    Real(Vec<f64>),
    Complex(Vec<Complex>),
    Raw(Vec<u8>),
    String(Vec<CharString>),
    List(Vec<Value>),
}

impl Payload {
    /// Builds the container with its final attribute set.
    pub(super) fn build(self, attributes: Attributes, object: bool) -> Value {
        match self {
            Self::Logical(d) => Value::Logical(Rc::new(Vector::with_attributes(d, attributes, object))),
            Self::Integer(d) => Value::Integer(Rc::new(Vector::with_attributes(d, attributes, object))),
            Self::Real(d) => Value::Real(Rc::new(Vector::with_attributes(d, attributes, object))),
            Self::Complex(d) => Value::Complex(Rc::new(Vector::with_attributes(d, attributes, object))),
            Self::Raw(d) => Value::Raw(Rc::new(Vector::with_attributes(d, attributes, object))),
            Self::String(d) => Value::String(Rc::new(Vector::with_attributes(d, attributes, object))),
            Self::List(e) => Value::List(Rc::new(List::with_attributes(e, attributes, object))),
        }
    }
}

/// Position innerhalb einer Pairlist-Zelle: [Attribute] [Tag] car, dann cdr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CellStep {
    Attributes,
    Tag,
    Car,
    /// car gelesen; das naechste Flag-Wort entscheidet: neue Zelle oder Ende.
    Cdr,
    /// Kettenende ist ein beliebiges Item (meist NULL).
    Tail,
}

/// Zelle, die gerade gelesen wird.
pub(super) struct OpenCell {
    pub(super) kind: PairKind,
    pub(super) flags: Flags,
    pub(super) step: CellStep,
    pub(super) attributes: Attributes,
    pub(super) tag: Option<CharString>,
}

impl OpenCell {
    pub(super) fn new(kind: PairKind, flags: Flags) -> Self {
        let step = if flags.has_attributes {
            CellStep::Attributes
        } else if flags.has_tag {
            CellStep::Tag
        } else {
            CellStep::Car
        };
        Self { kind, flags, step, attributes: Attributes::default(), tag: None }
    }

    /// Step after the attribute pairlist.
    pub(super) fn after_attributes(&self) -> CellStep {
        if self.flags.has_tag { CellStep::Tag } else { CellStep::Car }
    }

    /// Closes the cell with its car. Attributes and tag move into the pending cell.
    pub(super) fn close(&mut self, car: Value) -> PendingCell {
        self.step = CellStep::Cdr;
        PendingCell {
            kind: self.kind,
            attributes: std::mem::take(&mut self.attributes),
            object: self.flags.is_object,
            tag: self.tag.take(),
            car,
        }
    }
}

/// Gelesene Zellen einer cdr-Kette plus die gerade offene Zelle.
pub(super) struct PairChain {
    pub(super) cells: Vec<PendingCell>,
    pub(super) current: OpenCell,
}

impl PairChain {
    pub(super) fn new(kind: PairKind, flags: Flags) -> Self {
        Self { cells: Vec::new(), current: OpenCell::new(kind, flags) }
    }

    /// Verknuepft die Zellen von hinten nach vorne mit dem Kettenende.
    pub(super) fn link(self, tail: Value) -> Value {
        let mut cdr = tail;
        for cell in self.cells.into_iter().rev() {
            cdr = Value::PairList(Rc::new(cell.link(cdr)));
        }
        cdr
    }
}

/// Eine gelesene, aber noch nicht verkettete Pairlist-Zelle.
#[derive(Debug)]
pub(super) struct PendingCell {
    pub(super) kind: PairKind,
    pub(super) attributes: Attributes,
    pub(super) object: bool,
    pub(super) tag: Option<CharString>,
    pub(super) car: Value,
}

impl PendingCell {
    /// Verknuepft die Zelle mit ihrem (bereits fertigen) cdr.
    pub(super) fn link(self, cdr: Value) -> PairList {
        PairList::with_attributes(self.kind, self.tag, self.car, cdr, self.attributes, self.object)
    }
}

/// Pairlist-Art eines Typcodes. `None` fuer Typen ausserhalb der Familie.
pub(super) fn pair_kind(ty: SexpType) -> Option<PairKind> {
    match ty {
        SexpType::PairList => Some(PairKind::List),
        SexpType::Language => Some(PairKind::Language),
        SexpType::Closure => Some(PairKind::Closure),
        SexpType::Promise => Some(PairKind::Promise),
        SexpType::Dots => Some(PairKind::Dots),
        _ => None,
    }
}
