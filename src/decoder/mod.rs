//! Item decoder: walks the serialized object graph with an explicit frame stack.
//!
//! Decodiert genau ein Wurzel-Item nach dem Header. Verschachtelte Items
//! liegen als Frames auf einem Heap-Stack; die Tiefe ist nur durch
//! `max_depth` begrenzt, nicht durch den Aufruf-Stack. `cdr`-Ketten von
//! Pairlists teilen sich einen Frame und zaehlen nicht zur Tiefe.
//!
//! # Beispiel
//!
//! ```
//! use rxdr::decoder::decode;
//! use rxdr::Value;
//!
//! let mut bytes = b"X\n".to_vec();
//! for word in [2i32, 0x0004_0300, 0x0002_0300, 254] {
//!     bytes.extend_from_slice(&word.to_be_bytes());
//! }
//! assert_eq!(decode(&bytes).unwrap(), Value::Null);
//! ```

mod api;
mod context;

pub use api::{
    decode, decode_reader, decode_reader_with_options, decode_with_header, decode_with_options,
    read_stream_header,
};

use std::rc::Rc;

use crate::attributes::{self, Attributes};
use crate::error::{Error, Result};
use crate::flags::Flags;
use crate::header::{read_header, StreamHeader};
use crate::options::DecodeOptions;
use crate::refs::ReferenceTable;
use crate::sexptype::SexpType;
use crate::value::{CharString, Complex, Logical, Value};
use crate::xdr::XdrReader;

use context::{pair_kind, CellStep, Frame, Next, OpenCell, PairChain, Payload};

/// Laenge, die bei CHARSXP den NA-String markiert.
const NA_STRING_LENGTH: i32 = -1;

/// Decode session over one buffered stream.
///
/// Besitzt Cursor und Referenztabelle exklusiv; beide leben nur fuer die
/// Dauer eines Decodings.
pub struct Decoder<'a> {
    /// XdrReader fuer den Input.
    reader: XdrReader<'a>,
    /// Bereits decodierte Symbole (1-basiert).
    refs: ReferenceTable,
    options: DecodeOptions,
    /// Header, sobald gelesen.
    header: Option<StreamHeader>,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder with default options.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Self::with_options(data, DecodeOptions::default())
    }

    /// Creates a decoder with explicit options.
    pub fn with_options(data: &'a [u8], options: DecodeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            reader: XdrReader::new(data),
            refs: ReferenceTable::new(),
            options,
            header: None,
        })
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Header, if already read.
    pub fn header(&self) -> Option<&StreamHeader> {
        self.header.as_ref()
    }

    /// Number of entries registered in the reference table so far.
    pub fn reference_count(&self) -> usize {
        self.refs.len()
    }

    /// Reads the marker and version header. Idempotent.
    pub fn read_header(&mut self) -> Result<&StreamHeader> {
        if self.header.is_none() {
            self.header = Some(read_header(&mut self.reader)?);
        }
        match self.header.as_ref() {
            Some(h) => Ok(h),
            None => Err(Error::malformed_item("header missing after read")),
        }
    }

    /// Reads one item, including all nested structure.
    ///
    /// Verschachtelung laeuft ueber einen Frame-Stack auf dem Heap, nicht
    /// ueber Rekursion. `max_depth` begrenzt dessen Laenge.
    pub fn read_item(&mut self) -> Result<Value> {
        let mut stack: Vec<Frame> = Vec::new();
        let mut next = Next::Item;
        loop {
            next = match next {
                Next::Item => {
                    let flags = self.read_flags()?;
                    self.open(flags, &mut stack)?
                }
                Next::ItemWith(flags) => self.open(flags, &mut stack)?,
                Next::Done(value) => match stack.pop() {
                    None => return Ok(value),
                    Some(frame) => self.feed(frame, value, &mut stack)?,
                },
            };
        }
    }

    /// Checks for unread input after the root item.
    pub fn finish(self) -> Result<()> {
        let remaining = self.reader.remaining();
        if remaining > 0 {
            if !self.options.allow_trailing_bytes {
                return Err(Error::TrailingBytes(remaining));
            }
            log::debug!("decoder: ignoring {remaining} trailing bytes");
        }
        log::debug!("decoder: done, {} references registered", self.refs.len());
        Ok(())
    }

    fn read_flags(&mut self) -> Result<Flags> {
        Ok(Flags::decode(self.reader.read_i32()?))
    }

    /// Opens the item whose flag word has been consumed.
    ///
    /// Blaetter sind sofort fertig; Container legen einen Frame an.
    fn open(&mut self, flags: Flags, stack: &mut Vec<Frame>) -> Result<Next> {
        // Typcode zuerst pruefen: unbekannte Typen verbrauchen keine Payload-Bytes.
        let Some(ty) = SexpType::from_code(flags.type_code) else {
            return Err(Error::unsupported_type(flags.type_code));
        };
        if stack.len() >= self.options.max_depth {
            return Err(Error::DepthLimitExceeded(self.options.max_depth));
        }
        log::trace!(
            "item {} at offset {} depth {}",
            ty.name(),
            self.reader.position(),
            stack.len() + 1
        );

        let payload = match ty {
            SexpType::NilValue | SexpType::Nil => return Ok(Next::Done(Value::Null)),
            SexpType::Reference => return self.read_reference(flags).map(Next::Done),
            SexpType::Char => {
                let value = self.read_char()?;
                // Altformat: Attribute an CHARSXP werden gelesen und verworfen.
                if flags.has_attributes {
                    log::warn!("discarding attributes attached to a CHARSXP");
                    stack.push(Frame::CharAttributes(value));
                    return Ok(Next::Item);
                }
                return Ok(Next::Done(Value::Char(value)));
            }
            SexpType::Symbol => {
                if flags.has_attributes {
                    return Err(Error::malformed_attribute("a symbol cannot carry attributes"));
                }
                stack.push(Frame::SymbolName);
                return Ok(Next::Item);
            }
            SexpType::PairList
            | SexpType::Language
            | SexpType::Closure
            | SexpType::Promise
            | SexpType::Dots => {
                let Some(kind) = pair_kind(ty) else {
                    return Err(Error::unsupported_type(flags.type_code));
                };
                stack.push(Frame::Pairs(PairChain::new(kind, flags)));
                return Ok(Next::Item);
            }
            SexpType::List => {
                let len = self.reader.read_length()?;
                let elements = Vec::with_capacity(len.min(self.reader.remaining() / 4));
                return self.settle(Frame::List { flags, elements, remaining: len }, stack);
            }
            SexpType::String => {
                let len = self.reader.read_length()?;
                let data = Vec::with_capacity(len.min(self.reader.remaining() / 8));
                return self.settle(Frame::Strings { flags, data, remaining: len }, stack);
            }
            SexpType::Integer => Payload::Integer(self.read_fixed(4, |r| r.read_i32())?),
            SexpType::Logical => {
                Payload::Logical(self.read_fixed(4, |r| r.read_i32().map(Logical::from_raw))?)
            }
            SexpType::Real => Payload::Real(self.read_fixed(8, |r| r.read_f64())?),
            SexpType::Complex => Payload::Complex(self.read_fixed(16, |r| {
                let re = r.read_f64()?;
                let im = r.read_f64()?;
                Ok(Complex { re, im })
            })?),
            SexpType::Raw => {
                let len = self.reader.read_length()?;
                Payload::Raw(self.reader.read_bytes(len)?.to_vec())
            }
            SexpType::Environment
            | SexpType::Special
            | SexpType::Builtin
            | SexpType::Any
            | SexpType::Expression
            | SexpType::ByteCode
            | SexpType::ExternalPointer
            | SexpType::WeakReference
            | SexpType::S4
            | SexpType::Persist
            | SexpType::Package
            | SexpType::Namespace
            | SexpType::BaseNamespace
            | SexpType::MissingArg
            | SexpType::UnboundValue
            | SexpType::GlobalEnv => return Err(Error::unsupported_type(flags.type_code)),
        };
        Ok(self.close_vector(flags, payload, stack))
    }

    /// Hands a finished item to the frame it belongs to.
    fn feed(&mut self, frame: Frame, value: Value, stack: &mut Vec<Frame>) -> Result<Next> {
        match frame {
            Frame::List { flags, mut elements, remaining } => {
                elements.push(value);
                self.settle(Frame::List { flags, elements, remaining: remaining - 1 }, stack)
            }
            Frame::Strings { flags, mut data, remaining } => {
                match value {
                    Value::Char(s) => data.push(s),
                    other => {
                        return Err(Error::malformed_item(format!(
                            "string vector element must be a CHARSXP, found {}",
                            other.type_name()
                        )));
                    }
                }
                self.settle(Frame::Strings { flags, data, remaining: remaining - 1 }, stack)
            }
            Frame::Attributes { flags, payload } => {
                let attributes = attributes::bind(&value)?;
                Ok(Next::Done(payload.build(attributes, flags.is_object)))
            }
            Frame::CharAttributes(s) => Ok(Next::Done(Value::Char(s))),
            Frame::SymbolName => self.register_symbol(value).map(Next::Done),
            Frame::Pairs(mut chain) => {
                match chain.current.step {
                    CellStep::Attributes => {
                        chain.current.attributes = attributes::bind(&value)?;
                        chain.current.step = chain.current.after_attributes();
                    }
                    CellStep::Tag => {
                        chain.current.tag = tag_name(value)?;
                        chain.current.step = CellStep::Car;
                    }
                    CellStep::Car => {
                        let cell = chain.current.close(value);
                        chain.cells.push(cell);
                    }
                    CellStep::Tail => return Ok(Next::Done(chain.link(value))),
                    CellStep::Cdr => {
                        return Err(Error::malformed_item("pairlist cell received an item after its car"));
                    }
                }
                self.settle(Frame::Pairs(chain), stack)
            }
        }
    }

    /// Puts `frame` back on the stack if it needs more items, or closes it.
    fn settle(&mut self, frame: Frame, stack: &mut Vec<Frame>) -> Result<Next> {
        match frame {
            Frame::List { flags, elements, remaining: 0 } => {
                Ok(self.close_vector(flags, Payload::List(elements), stack))
            }
            Frame::Strings { flags, data, remaining: 0 } => {
                Ok(self.close_vector(flags, Payload::String(data), stack))
            }
            Frame::Pairs(mut chain) if chain.current.step == CellStep::Cdr => {
                // cdr: weitere Zelle der Familie bleibt im selben Frame.
                let next = self.read_flags()?;
                let kind = SexpType::from_code(next.type_code)
                    .filter(|ty| ty.is_pairlist_family())
                    .and_then(pair_kind);
                let step = match kind {
                    Some(kind) => {
                        chain.current = OpenCell::new(kind, next);
                        Next::Item
                    }
                    None => {
                        chain.current.step = CellStep::Tail;
                        Next::ItemWith(next)
                    }
                };
                stack.push(Frame::Pairs(chain));
                Ok(step)
            }
            other => {
                stack.push(other);
                Ok(Next::Item)
            }
        }
    }

    /// Vektordaten komplett: Attribute folgen oder der Container ist fertig.
    fn close_vector(&mut self, flags: Flags, payload: Payload, stack: &mut Vec<Frame>) -> Next {
        if flags.has_attributes {
            stack.push(Frame::Attributes { flags, payload });
            Next::Item
        } else {
            Next::Done(payload.build(Attributes::default(), flags.is_object))
        }
    }

    /// REFSXP: Index gepackt im Flag-Wort oder, bei 0, als eigenes i32 dahinter.
    fn read_reference(&mut self, flags: Flags) -> Result<Value> {
        let packed = flags.packed_ref_index();
        let index = if packed == 0 { self.reader.read_i32()? } else { packed };
        self.refs.resolve(index)
    }

    /// Liest eine Laenge und danach `len` fest breite Elemente.
    fn read_fixed<T>(
        &mut self,
        width: usize,
        mut read: impl FnMut(&mut XdrReader<'a>) -> Result<T>,
    ) -> Result<Vec<T>> {
        let len = self.reader.read_length()?;
        // Kapazitaet durch die verbleibenden Bytes begrenzen (manipulierte Laengen).
        let mut data = Vec::with_capacity(len.min(self.reader.remaining() / width));
        for _ in 0..len {
            data.push(read(&mut self.reader)?);
        }
        Ok(data)
    }

    /// CHARSXP: Laenge -1 = NA-String, sonst genau `len` Bytes Payload.
    fn read_char(&mut self) -> Result<CharString> {
        let len = self.reader.read_i32()?;
        if len == NA_STRING_LENGTH {
            return Ok(CharString::Na);
        }
        let len = usize::try_from(len).map_err(|_| Error::NegativeLength(len))?;
        let bytes = self.reader.read_bytes(len)?;
        Ok(CharString::Text(decode_text(bytes)))
    }

    fn register_symbol(&mut self, name: Value) -> Result<Value> {
        let name = match name {
            Value::Char(name) => name,
            other => {
                return Err(Error::malformed_item(format!(
                    "symbol name must be a CHARSXP, found {}",
                    other.type_name()
                )));
            }
        };
        let symbol = Value::Symbol(name);
        let index = self.refs.append(symbol.clone());
        log::trace!("registered symbol {symbol:?} as reference {index}");
        Ok(symbol)
    }
}

/// Tag einer Pairlist-Zelle: Symbol (ggf. per Referenz) oder CHARSXP.
fn tag_name(tag: Value) -> Result<Option<CharString>> {
    match tag {
        Value::Symbol(name) | Value::Char(name) => Ok(Some(name)),
        Value::Null => Ok(None),
        other => Err(Error::malformed_item(format!(
            "pairlist tag must be a symbol, found {}",
            other.type_name()
        ))),
    }
}

/// CHARSXP-Payload als Text. Ungueltiges UTF-8 wird ersetzt.
fn decode_text(bytes: &[u8]) -> Rc<str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Rc::from(s),
        Err(e) => {
            log::warn!("invalid UTF-8 in string payload ({e}), replacing");
            Rc::from(String::from_utf8_lossy(bytes).as_ref())
        }
    }
}
