use std::borrow::Cow;
use std::io::Read;

use crate::error::Result;
use crate::header::StreamHeader;
use crate::options::DecodeOptions;
use crate::source;
use crate::value::Value;

use super::Decoder;

/// Entfernt ggf. die gzip-Huelle, je nach Options.
fn payload<'a>(data: &'a [u8], options: &DecodeOptions) -> Result<Cow<'a, [u8]>> {
    if options.decompress {
        source::unwrap_envelope(data)
    } else {
        Ok(Cow::Borrowed(data))
    }
}

// ============================================================================
// High-Level API
// ============================================================================

/// Decodiert einen vollstaendig gepufferten Stream zu genau einem Wurzelwert.
pub fn decode(data: &[u8]) -> Result<Value> {
    decode_with_options(data, DecodeOptions::default())
}

/// Decodiert einen Stream mit expliziten Options.
pub fn decode_with_options(data: &[u8], options: DecodeOptions) -> Result<Value> {
    decode_with_header(data, options).map(|(_, value)| value)
}

/// Decodiert einen Stream und liefert zusaetzlich den gelesenen Header.
///
/// Returns: (header, value)
pub fn decode_with_header(data: &[u8], options: DecodeOptions) -> Result<(StreamHeader, Value)> {
    options.validate()?;
    let bytes = payload(data, &options)?;
    let mut decoder = Decoder::with_options(&bytes, options)?;
    let header = decoder.read_header()?.clone();
    let value = decoder.read_item()?;
    decoder.finish()?;
    Ok((header, value))
}

/// Liest eine Byte-Quelle vollstaendig ein und decodiert sie.
pub fn decode_reader<R: Read>(source: R) -> Result<Value> {
    decode_reader_with_options(source, DecodeOptions::default())
}

/// Wie [`decode_reader`], mit expliziten Options.
pub fn decode_reader_with_options<R: Read>(source: R, options: DecodeOptions) -> Result<Value> {
    let data = source::read_all(source)?;
    decode_with_options(&data, options)
}

/// Liest nur den Header (fuer Inspektion ohne vollstaendiges Decoding).
pub fn read_stream_header(data: &[u8], options: DecodeOptions) -> Result<StreamHeader> {
    options.validate()?;
    let bytes = payload(data, &options)?;
    let mut decoder = Decoder::with_options(&bytes, options)?;
    decoder.read_header().cloned()
}
