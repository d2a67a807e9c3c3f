//! Big-endian (XDR) primitive reader.
//!
//! Alle Werte sind big-endian und fest breit: 4 Bytes fuer Integer,
//! 8 Bytes fuer Double. Der Reader arbeitet auf dem vollstaendig gepufferten
//! Stream; waehrend des Decodings findet kein IO statt.

use crate::{Error, Result};

/// Reads fixed-width big-endian values from a byte slice.
///
/// Der Cursor bewegt sich nur vorwaerts. Bei einem fehlgeschlagenen Read
/// bleibt die Position unveraendert.
#[derive(Clone, Copy)]
pub struct XdrReader<'a> {
    data: &'a [u8],
    /// Naechstes ungelesenes Byte in data.
    pos: usize,
}

impl<'a> XdrReader<'a> {
    /// Creates a new reader positioned at the first byte of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Consumes `n` bytes and returns them as a slice of the underlying buffer.
    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(Error::TruncatedStream { needed: n, remaining });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads a 4-byte big-endian signed integer.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads an 8-byte big-endian bit pattern and reinterprets it as IEEE-754 double.
    ///
    /// NaN-Payloads (z.B. das R-NA mit Low-Word 1954) bleiben bitgenau erhalten.
    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        let b = self.take(8)?;
        let bits = u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]);
        Ok(f64::from_bits(bits))
    }

    /// Reads exactly `len` raw bytes. No terminator handling, no decoding.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    /// Reads a length field and rejects negative values.
    pub fn read_length(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| Error::NegativeLength(len))
    }

    /// Returns `true` if the next bytes equal `prefix`, without consuming them.
    pub fn peek_prefix(&self, prefix: &[u8]) -> bool {
        self.data[self.pos..].starts_with(prefix)
    }

    /// Skips `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns `true` if every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }
}
