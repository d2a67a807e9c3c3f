//! Decoder configuration.
//!
//! # Beispiel
//!
//! ```
//! use rxdr::options::DecodeOptions;
//!
//! let opts = DecodeOptions::default()
//!     .with_max_depth(64)
//!     .with_trailing_bytes(false);
//!
//! assert_eq!(opts.max_depth(), 64);
//! assert!(!opts.allow_trailing_bytes());
//! assert!(opts.decompress());
//! ```

use crate::{Error, Result};

/// Default nesting limit. `cdr` chains are decoded iteratively and do not count.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Options for one decode session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximale Verschachtelungstiefe (Schutz vor Stack-Ueberlauf).
    pub max_depth: usize,
    /// Bytes nach dem Wurzel-Item ignorieren statt abzulehnen.
    pub allow_trailing_bytes: bool,
    /// gzip-Huelle automatisch erkennen und entpacken.
    pub decompress: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_bytes: true,
            decompress: true,
        }
    }
}

impl DecodeOptions {
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn allow_trailing_bytes(&self) -> bool {
        self.allow_trailing_bytes
    }

    pub fn decompress(&self) -> bool {
        self.decompress
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_trailing_bytes(mut self, allow: bool) -> Self {
        self.allow_trailing_bytes = allow;
        self
    }

    pub fn with_decompress(mut self, decompress: bool) -> Self {
        self.decompress = decompress;
        self
    }

    /// Rejects option combinations that cannot decode anything.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::unsupported_format("max_depth must be > 0"));
        }
        Ok(())
    }
}
