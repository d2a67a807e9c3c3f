//! Byte source: buffers the whole input before decoding starts.
//!
//! Der Decoder liest nie waehrend des Decodings aus dem IO-Stream. Die
//! Eingabe wird vorab vollstaendig in den Speicher gelesen; eine gzip-Huelle
//! (Default von `saveRDS`) wird dabei erkannt und entpackt.

use std::borrow::Cow;
use std::io::Read;

use flate2::read::MultiGzDecoder;

use crate::{Error, Result};

/// gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
/// bzip2 / xz magic (`saveRDS(compress = "bzip2" | "xz")`), not supported.
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xFD, b'7', b'z', b'X', b'Z', 0x00];

/// Returns `true` if `data` starts with the gzip magic.
pub fn is_gzip(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

/// Reads `source` to the end.
pub fn read_all<R: Read>(mut source: R) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    log::debug!("source: buffered {} bytes", data.len());
    Ok(data)
}

/// Inflates a gzip envelope if present; otherwise returns the input unchanged.
///
/// # Errors
///
/// - [`Error::DecompressionError`] wenn der gzip-Strom defekt ist
/// - [`Error::UnsupportedFormat`] fuer bzip2- und xz-Huellen
pub fn unwrap_envelope(data: &[u8]) -> Result<Cow<'_, [u8]>> {
    if is_gzip(data) {
        let mut inflated = Vec::with_capacity(data.len().saturating_mul(4));
        MultiGzDecoder::new(data)
            .read_to_end(&mut inflated)
            .map_err(|e| Error::DecompressionError(e.to_string()))?;
        log::debug!("source: inflated gzip {} -> {} bytes", data.len(), inflated.len());
        return Ok(Cow::Owned(inflated));
    }
    if data.starts_with(BZIP2_MAGIC) {
        return Err(Error::unsupported_format("bzip2-compressed input"));
    }
    if data.starts_with(XZ_MAGIC) {
        return Err(Error::unsupported_format("xz-compressed input"));
    }
    Ok(Cow::Borrowed(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn read_all_collects_everything() {
        let input = vec![7u8; 20_005];
        let data = read_all(&input[..]).unwrap();
        assert_eq!(data, input);
    }

    /// Unterbrochene Reads werden wiederholt, nicht als Fehler gemeldet.
    #[test]
    fn interrupted_read_is_retried() {
        struct Flaky {
            interrupted: bool,
            inner: &'static [u8],
        }
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(std::io::ErrorKind::Interrupted.into());
                }
                self.inner.read(buf)
            }
        }
        let data = read_all(Flaky { interrupted: false, inner: b"X\n" }).unwrap();
        assert_eq!(data, b"X\n");
    }

    #[test]
    fn plain_input_is_borrowed() {
        let data = b"X\n\0\0\0\x02";
        assert!(matches!(unwrap_envelope(data).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn gzip_is_inflated() {
        let packed = gzip(b"X\nhello");
        assert!(is_gzip(&packed));
        assert_eq!(&*unwrap_envelope(&packed).unwrap(), b"X\nhello");
    }

    #[test]
    fn broken_gzip_reports_decompression_error() {
        let mut packed = gzip(b"X\nhello world");
        packed.truncate(12);
        assert!(matches!(unwrap_envelope(&packed), Err(Error::DecompressionError(_))));
    }

    #[test]
    fn bzip2_rejected() {
        assert!(matches!(
            unwrap_envelope(b"BZh91AY&SY"),
            Err(Error::UnsupportedFormat(ref m)) if m.contains("bzip2")
        ));
    }

    #[test]
    fn io_error_is_mapped() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
        }
        assert!(matches!(read_all(Failing), Err(Error::IoError(ref m)) if m.contains("boom")));
    }
}
