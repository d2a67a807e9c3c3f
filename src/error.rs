//! Central error types for the XDR decoder.
//!
//! Decoding is all-or-nothing: every variant aborts the session and no
//! partially built object graph is handed back to the caller.

use core::fmt;
use std::borrow::Cow;

/// All failure modes of a decode session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Stream uses a format variant, version or type code this decoder does not implement.
    UnsupportedFormat(Cow<'static, str>),
    /// A read was requested beyond the end of the buffered input.
    TruncatedStream {
        /// Bytes the read needed.
        needed: usize,
        /// Bytes that were still available.
        remaining: usize,
    },
    /// A back-reference points outside the populated reference table.
    CorruptReference {
        /// Index as found on the wire (1-based).
        index: i32,
        /// Number of entries in the table when the reference was resolved.
        table_len: usize,
    },
    /// An attribute pairlist has the wrong shape (missing tag, wrong value type).
    MalformedAttribute(Cow<'static, str>),
    /// A length field is negative.
    NegativeLength(i32),
    /// An item is structurally valid but appears in a role it cannot fill.
    ///
    /// Beispiel: ein STRSXP-Element, das kein CHARSXP ist.
    MalformedItem(Cow<'static, str>),
    /// Nesting exceeds the configured `max_depth`.
    DepthLimitExceeded(usize),
    /// Bytes remain after the root item and trailing bytes are not allowed.
    TrailingBytes(usize),
    /// Reading the byte source failed.
    IoError(String),
    /// The gzip envelope could not be inflated.
    DecompressionError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(msg) => write!(f, "unsupported format: {msg}"),
            Self::TruncatedStream { needed, remaining } => write!(
                f,
                "truncated stream: needed {needed} bytes, {remaining} remaining"
            ),
            Self::CorruptReference { index, table_len } => write!(
                f,
                "corrupt reference: index {index} outside table of {table_len} entries"
            ),
            Self::MalformedAttribute(msg) => write!(f, "malformed attribute: {msg}"),
            Self::NegativeLength(len) => write!(f, "negative length {len}"),
            Self::MalformedItem(msg) => write!(f, "malformed item: {msg}"),
            Self::DepthLimitExceeded(max) => {
                write!(f, "nesting depth exceeds limit of {max}")
            }
            Self::TrailingBytes(n) => write!(f, "{n} trailing bytes after root item"),
            Self::IoError(msg) => write!(f, "IO error: {msg}"),
            Self::DecompressionError(msg) => write!(f, "gzip decompression failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

impl Error {
    /// Erstellt einen `UnsupportedFormat` Fehler mit Nachricht.
    pub fn unsupported_format(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// `UnsupportedFormat` fuer einen Typcode ohne Implementierung.
    pub fn unsupported_type(code: u8) -> Self {
        match crate::sexptype::SexpType::from_code(code) {
            Some(ty) => Self::UnsupportedFormat(
                format!("type {} ({code}) is not implemented", ty.name()).into(),
            ),
            None => Self::UnsupportedFormat(format!("unknown type code {code}").into()),
        }
    }

    /// Erstellt einen `MalformedAttribute` Fehler mit Nachricht.
    pub fn malformed_attribute(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedAttribute(msg.into())
    }

    /// Erstellt einen `MalformedItem` Fehler mit Nachricht.
    pub fn malformed_item(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::MalformedItem(msg.into())
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_display() {
        let e = Error::unsupported_format("ASCII format");
        let msg = e.to_string();
        assert!(msg.contains("unsupported"), "{msg}");
        assert!(msg.contains("ASCII"), "{msg}");
    }

    #[test]
    fn unsupported_type_names_known_codes() {
        let msg = Error::unsupported_type(4).to_string();
        assert!(msg.contains("ENVSXP"), "{msg}");
        assert!(msg.contains("(4)"), "{msg}");
    }

    #[test]
    fn unsupported_type_unknown_code() {
        let msg = Error::unsupported_type(77).to_string();
        assert!(msg.contains("unknown type code 77"), "{msg}");
    }

    #[test]
    fn truncated_stream_display() {
        let e = Error::TruncatedStream { needed: 8, remaining: 3 };
        let msg = e.to_string();
        assert!(msg.contains('8'), "{msg}");
        assert!(msg.contains('3'), "{msg}");
    }

    #[test]
    fn corrupt_reference_display() {
        let e = Error::CorruptReference { index: 9, table_len: 2 };
        let msg = e.to_string();
        assert!(msg.contains("index 9"), "{msg}");
        assert!(msg.contains("2 entries"), "{msg}");
    }

    #[test]
    fn malformed_attribute_display() {
        let msg = Error::malformed_attribute("class must be a string vector").to_string();
        assert!(msg.contains("attribute"), "{msg}");
        assert!(msg.contains("class"), "{msg}");
    }

    #[test]
    fn io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let e: Error = io.into();
        assert!(matches!(e, Error::IoError(ref m) if m.contains("eof")));
    }

    #[test]
    fn error_implements_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(Error::NegativeLength(-3));
        assert!(e.to_string().contains("-3"));
    }

    #[test]
    fn error_is_clone_and_eq() {
        let e1 = Error::DepthLimitExceeded(16);
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }
}
