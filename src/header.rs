//! Stream header.
//!
//! Der Header hat folgende Struktur:
//! - [Workspace-Magic] (optional): `RDX2\n` bei Dateien aus `save()`
//! - Format-Marker (2 Bytes): `X\n` = XDR; `A` (ASCII), `B` (binaer) und ein
//!   fuehrendes `\n` (Altformat) werden erkannt und abgelehnt
//! - Format-Version (i32, muss 2 sein)
//! - Writer-Version (i32, informativ)
//! - Minimale Reader-Version (i32, informativ)
//!
//! # Beispiel
//!
//! ```
//! use rxdr::header::{read_header, Format};
//! use rxdr::xdr::XdrReader;
//!
//! let mut bytes = b"X\n".to_vec();
//! for v in [2i32, 0x0003_0402, 0x0002_0300] {
//!     bytes.extend_from_slice(&v.to_be_bytes());
//! }
//! let header = read_header(&mut XdrReader::new(&bytes)).unwrap();
//! assert_eq!(header.format, Format::Xdr);
//! assert_eq!(header.writer_version.to_string(), "3.4.2");
//! ```

use std::fmt;

use crate::xdr::XdrReader;
use crate::{Error, Result};

/// Workspace-Magic fuer XDR-Dateien aus `save()`.
const WORKSPACE_XDR_MAGIC: &[u8] = b"RDX2\n";

/// Workspace-Magics anderer Varianten (werden abgelehnt).
const WORKSPACE_OTHER_MAGICS: [(&[u8], &str); 4] = [
    (b"RDA2\n", "ASCII workspace format"),
    (b"RDB2\n", "binary workspace format"),
    (b"RDX3\n", "workspace format version 3"),
    (b"RDX1\n", "workspace format version 1"),
];

/// The only format version this decoder reads.
pub const SUPPORTED_VERSION: i32 = 2;

/// Wire variant announced by the 2-byte marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `X`: big-endian XDR. The only supported variant.
    Xdr,
    /// `A`: ASCII.
    Ascii,
    /// `B`: native binary.
    Binary,
    /// Leading `\n`: legacy marker.
    Legacy,
}

impl Format {
    /// Maps the first marker byte.
    pub fn from_marker(byte: u8) -> Option<Self> {
        match byte {
            b'X' => Some(Self::Xdr),
            b'A' => Some(Self::Ascii),
            b'B' => Some(Self::Binary),
            b'\n' => Some(Self::Legacy),
            _ => None,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Xdr => "XDR",
            Self::Ascii => "ASCII",
            Self::Binary => "native binary",
            Self::Legacy => "legacy",
        }
    }
}

/// Packed R version number (`major << 16 | minor << 8 | patch`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RVersion(pub i32);

impl RVersion {
    pub fn major(self) -> i32 {
        self.0 >> 16
    }

    pub fn minor(self) -> i32 {
        (self.0 >> 8) & 0xFF
    }

    pub fn patch(self) -> i32 {
        self.0 & 0xFF
    }
}

impl fmt::Display for RVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.patch())
    }
}

/// Parsed stream header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// `true` if a `RDX2\n` workspace magic preceded the marker.
    pub workspace: bool,
    pub format: Format,
    /// Format version, always [`SUPPORTED_VERSION`] after a successful read.
    pub version: i32,
    /// R version that wrote the stream.
    pub writer_version: RVersion,
    /// Oldest R version able to read the stream.
    pub min_reader_version: RVersion,
}

/// Reads and validates the header. The reader is left at the first item.
///
/// # Errors
///
/// - [`Error::UnsupportedFormat`] fuer Nicht-XDR-Marker, unbekannte Marker
///   und Format-Versionen ungleich 2
/// - [`Error::TruncatedStream`] bei unerwartetem Stream-Ende
pub fn read_header(reader: &mut XdrReader<'_>) -> Result<StreamHeader> {
    // 1. Optional: Workspace-Magic
    let workspace = reader.peek_prefix(WORKSPACE_XDR_MAGIC);
    if workspace {
        reader.skip(WORKSPACE_XDR_MAGIC.len())?;
    } else if let Some((_, what)) =
        WORKSPACE_OTHER_MAGICS.iter().find(|(magic, _)| reader.peek_prefix(magic))
    {
        return Err(Error::unsupported_format(*what));
    }

    // 2. Format-Marker (2 Bytes, nur das erste ist massgeblich)
    let marker = reader.read_bytes(2)?;
    let format = match Format::from_marker(marker[0]) {
        Some(Format::Xdr) => Format::Xdr,
        Some(other) => {
            return Err(Error::unsupported_format(format!(
                "{} serialization format",
                other.description()
            )));
        }
        None => {
            return Err(Error::unsupported_format(format!(
                "unknown format marker 0x{:02X}",
                marker[0]
            )));
        }
    };

    // 3. Versionen
    let version = reader.read_i32()?;
    let writer_version = RVersion(reader.read_i32()?);
    let min_reader_version = RVersion(reader.read_i32()?);
    if version != SUPPORTED_VERSION {
        return Err(Error::unsupported_format(format!(
            "format version {version} (only {SUPPORTED_VERSION} is supported)"
        )));
    }

    log::debug!(
        "header: format={} version={version} writer={writer_version} min_reader={min_reader_version}",
        format.description()
    );

    Ok(StreamHeader { workspace, format, version, writer_version, min_reader_version })
}
