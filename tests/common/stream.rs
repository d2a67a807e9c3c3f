// XDR-Stream-Builder fuer Tests.
//
// Wird per `include!` eingebunden (Integrationstests und Unit-Tests im
// Decoder). Keine Abhaengigkeit auf Crate-Typen: erzeugt nur Bytes.

#[allow(dead_code)]
mod wire {
    pub const NIL: i32 = 0;
    pub const SYM: i32 = 1;
    pub const LIST: i32 = 2;
    pub const CLOS: i32 = 3;
    pub const ENV: i32 = 4;
    pub const PROM: i32 = 5;
    pub const LANG: i32 = 6;
    pub const CHAR: i32 = 9;
    pub const LGL: i32 = 10;
    pub const INT: i32 = 13;
    pub const REAL: i32 = 14;
    pub const CPLX: i32 = 15;
    pub const STR: i32 = 16;
    pub const DOTS: i32 = 17;
    pub const VEC: i32 = 19;
    pub const EXPR: i32 = 20;
    pub const RAW: i32 = 24;
    pub const S4: i32 = 25;
    pub const GLOBALENV: i32 = 253;
    pub const NILVALUE: i32 = 254;
    pub const REF: i32 = 255;

    pub const OBJECT: i32 = 1 << 8;
    pub const ATTR: i32 = 1 << 9;
    pub const TAG: i32 = 1 << 10;
    /// CHARSXP levels wie von R geschrieben (ASCII-Markierung).
    pub const ASCII_LEVELS: i32 = 64 << 12;

    pub const NA_INT: i32 = i32::MIN;
    pub const NA_REAL_BITS: u64 = 0x7FF0_0000_0000_07A2;
}

#[allow(dead_code)]
#[derive(Default)]
struct Stream {
    buf: Vec<u8>,
}

#[allow(dead_code)]
impl Stream {
    /// Leerer Builder ohne Header.
    fn raw() -> Self {
        Self::default()
    }

    /// Builder mit `X\n`-Marker und Version 2 (Writer R 4.3.1, Reader R 2.3.0).
    fn xdr() -> Self {
        Self::raw().bytes(b"X\n").int(2).int(0x0004_0301).int(0x0002_0300)
    }

    fn int(mut self, v: i32) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn real(mut self, v: f64) -> Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn na_real(mut self) -> Self {
        self.buf.extend_from_slice(&wire::NA_REAL_BITS.to_be_bytes());
        self
    }

    fn bytes(mut self, b: &[u8]) -> Self {
        self.buf.extend_from_slice(b);
        self
    }

    /// Flag-Wort: Typcode plus Bits.
    fn flags(self, ty: i32, bits: i32) -> Self {
        self.int(ty | bits)
    }

    fn nil(self) -> Self {
        self.int(wire::NILVALUE)
    }

    fn chars(self, s: &str) -> Self {
        self.flags(wire::CHAR, wire::ASCII_LEVELS).int(s.len() as i32).bytes(s.as_bytes())
    }

    fn na_chars(self) -> Self {
        self.int(wire::CHAR).int(-1)
    }

    fn sym(self, name: &str) -> Self {
        self.int(wire::SYM).chars(name)
    }

    /// REFSXP mit gepacktem Index.
    fn reference(self, index: i32) -> Self {
        self.int((index << 8) | wire::REF)
    }

    /// REFSXP mit explizitem Index nach dem Flag-Wort.
    fn reference_explicit(self, index: i32) -> Self {
        self.int(wire::REF).int(index)
    }

    fn ints_with(self, bits: i32, values: &[i32]) -> Self {
        let mut s = self.flags(wire::INT, bits).int(values.len() as i32);
        for &v in values {
            s = s.int(v);
        }
        s
    }

    fn ints(self, values: &[i32]) -> Self {
        self.ints_with(0, values)
    }

    fn lgls(self, values: &[i32]) -> Self {
        let mut s = self.int(wire::LGL).int(values.len() as i32);
        for &v in values {
            s = s.int(v);
        }
        s
    }

    fn reals_with(self, bits: i32, values: &[f64]) -> Self {
        let mut s = self.flags(wire::REAL, bits).int(values.len() as i32);
        for &v in values {
            s = s.real(v);
        }
        s
    }

    fn reals(self, values: &[f64]) -> Self {
        self.reals_with(0, values)
    }

    fn strs_with(self, bits: i32, values: &[Option<&str>]) -> Self {
        let mut s = self.flags(wire::STR, bits).int(values.len() as i32);
        for v in values {
            s = match v {
                Some(text) => s.chars(text),
                None => s.na_chars(),
            };
        }
        s
    }

    fn strs(self, values: &[&str]) -> Self {
        let opts: Vec<Option<&str>> = values.iter().map(|v| Some(*v)).collect();
        self.strs_with(0, &opts)
    }

    /// VECSXP-Kopf; die Elemente folgen per Builder.
    fn list_header(self, bits: i32, len: i32) -> Self {
        self.flags(wire::VEC, bits).int(len)
    }

    /// Getaggte LISTSXP-Zelle ohne Attribute; car und cdr folgen.
    fn tagged_cell(self, tag: &str) -> Self {
        self.flags(wire::LIST, wire::TAG).sym(tag)
    }

    /// Getaggte Zelle, deren Tag per Referenz auf ein bekanntes Symbol zeigt.
    fn tagged_cell_ref(self, index: i32) -> Self {
        self.flags(wire::LIST, wire::TAG).reference(index)
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}
