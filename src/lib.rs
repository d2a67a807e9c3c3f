//! rxdr – Decoder fuer R's XDR-Serialisierungsformat (`serialize` / `saveRDS`)
//!
//! Liest genau ein Wurzel-Objekt aus einem `X\n`-Stream (optional in einer
//! gzip-Huelle oder hinter einer `RDX2\n`-Workspace-Kennung) und liefert einen
//! unveraenderlichen Objektgraphen: atomare Vektoren mit NA-Markierung,
//! generische Listen, Pairlists und Attribute.
//!
//! # Beispiel
//!
//! ```
//! use rxdr::{decode, Value};
//!
//! // Header: "X\n", Version 2, Writer R 4.3.0, Reader R 2.3.0
//! let mut bytes = b"X\n".to_vec();
//! for word in [2i32, 0x0004_0300, 0x0002_0300] {
//!     bytes.extend_from_slice(&word.to_be_bytes());
//! }
//! // INTSXP, Laenge 3: 1, 2, NA
//! for word in [13i32, 3, 1, 2, i32::MIN] {
//!     bytes.extend_from_slice(&word.to_be_bytes());
//! }
//!
//! let value = decode(&bytes).unwrap();
//! let ints = value.as_integers().unwrap();
//! assert_eq!(ints.len(), 3);
//! assert!(!ints.is_complete());
//! assert_eq!(value.type_name(), "integer");
//! ```

pub mod attributes;
pub mod decoder;
pub mod error;
pub mod flags;
pub mod header;
pub mod json;
pub mod options;
pub mod refs;
pub mod sexptype;
pub mod source;
pub mod value;
pub mod xdr;

pub use error::{Error, Result};

/// IndexMap mit ahash (deterministische Iteration + schnelles Hashing).
pub(crate) type FastIndexMap<K, V> = indexmap::IndexMap<K, V, ahash::RandomState>;

// Public API: Decoding
pub use decoder::{
    decode, decode_reader, decode_reader_with_options, decode_with_header, decode_with_options,
    read_stream_header, Decoder,
};

// Public API: Options und Header
pub use header::{Format, RVersion, StreamHeader};
pub use options::DecodeOptions;

// Public API: Objektgraph
pub use attributes::Attributes;
pub use sexptype::SexpType;
pub use value::{CharString, Complex, List, Logical, PairKind, PairList, Value, Vector};
