//! Type codes (SEXPTYPE) of the serialization format.
//!
//! Jeder Code ist hier definiert, auch wenn der Decoder ihn nicht
//! implementiert. Nicht implementierte Typen werden im Decoder explizit
//! abgelehnt, nie uebersprungen.

/// Structural kind of a serialized item, as carried in bits 0-7 of its flag word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SexpType {
    Nil = 0,
    Symbol = 1,
    PairList = 2,
    Closure = 3,
    Environment = 4,
    Promise = 5,
    Language = 6,
    Special = 7,
    Builtin = 8,
    Char = 9,
    Logical = 10,
    Integer = 13,
    Real = 14,
    Complex = 15,
    String = 16,
    Dots = 17,
    Any = 18,
    List = 19,
    Expression = 20,
    ByteCode = 21,
    ExternalPointer = 22,
    WeakReference = 23,
    Raw = 24,
    S4 = 25,
    Persist = 247,
    Package = 248,
    Namespace = 249,
    BaseNamespace = 250,
    MissingArg = 251,
    UnboundValue = 252,
    GlobalEnv = 253,
    NilValue = 254,
    Reference = 255,
}

impl SexpType {
    /// Maps a raw type code to its variant. Returns `None` for codes outside the enumeration.
    pub fn from_code(code: u8) -> Option<Self> {
        let ty = match code {
            0 => Self::Nil,
            1 => Self::Symbol,
            2 => Self::PairList,
            3 => Self::Closure,
            4 => Self::Environment,
            5 => Self::Promise,
            6 => Self::Language,
            7 => Self::Special,
            8 => Self::Builtin,
            9 => Self::Char,
            10 => Self::Logical,
            13 => Self::Integer,
            14 => Self::Real,
            15 => Self::Complex,
            16 => Self::String,
            17 => Self::Dots,
            18 => Self::Any,
            19 => Self::List,
            20 => Self::Expression,
            21 => Self::ByteCode,
            22 => Self::ExternalPointer,
            23 => Self::WeakReference,
            24 => Self::Raw,
            25 => Self::S4,
            247 => Self::Persist,
            248 => Self::Package,
            249 => Self::Namespace,
            250 => Self::BaseNamespace,
            251 => Self::MissingArg,
            252 => Self::UnboundValue,
            253 => Self::GlobalEnv,
            254 => Self::NilValue,
            255 => Self::Reference,
            _ => return None,
        };
        Some(ty)
    }

    /// Numeric wire code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Conventional upper-case name (`INTSXP`, `REFSXP`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Nil => "NILSXP",
            Self::Symbol => "SYMSXP",
            Self::PairList => "LISTSXP",
            Self::Closure => "CLOSXP",
            Self::Environment => "ENVSXP",
            Self::Promise => "PROMSXP",
            Self::Language => "LANGSXP",
            Self::Special => "SPECIALSXP",
            Self::Builtin => "BUILTINSXP",
            Self::Char => "CHARSXP",
            Self::Logical => "LGLSXP",
            Self::Integer => "INTSXP",
            Self::Real => "REALSXP",
            Self::Complex => "CPLXSXP",
            Self::String => "STRSXP",
            Self::Dots => "DOTSXP",
            Self::Any => "ANYSXP",
            Self::List => "VECSXP",
            Self::Expression => "EXPRSXP",
            Self::ByteCode => "BCODESXP",
            Self::ExternalPointer => "EXTPTRSXP",
            Self::WeakReference => "WEAKREFSXP",
            Self::Raw => "RAWSXP",
            Self::S4 => "S4SXP",
            Self::Persist => "PERSISTSXP",
            Self::Package => "PACKAGESXP",
            Self::Namespace => "NAMESPACESXP",
            Self::BaseNamespace => "BASENAMESPACE_SXP",
            Self::MissingArg => "MISSINGARG_SXP",
            Self::UnboundValue => "UNBOUNDVALUE_SXP",
            Self::GlobalEnv => "GLOBALENV_SXP",
            Self::NilValue => "NILVALUE_SXP",
            Self::Reference => "REFSXP",
        }
    }

    /// Types encoded as a cons cell: optional attributes, optional tag, car, cdr.
    pub fn is_pairlist_family(self) -> bool {
        matches!(
            self,
            Self::PairList | Self::Language | Self::Closure | Self::Promise | Self::Dots
        )
    }
}
