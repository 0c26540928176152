use std::fmt;

/// Classification of a value as seen by the transfer engine.
///
/// Every `Transferable` value reports exactly one kind. Width variants of
/// the numeric kinds are kept apart so writers can honour the declared
/// width of the destination; [`Kind::canonical`] collapses them for
/// dispatch lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    String,

    I8,
    I16,
    I32,
    I64,
    Isize,

    U8,
    U16,
    U32,
    U64,
    Usize,

    F32,
    F64,

    /// Growable sequence (`Vec<T>`).
    Seq,
    /// Fixed-length sequence (`[T; N]`).
    Array,
    /// Key → value mapping, keys unique.
    Map,
    /// Named fields, fixed shape.
    Record,
    /// Optional or owning indirection (`Option<T>`, `Box<T>`, `Arc<T>`).
    Ref,
    /// Open value whose concrete shape is only known at runtime.
    Dynamic,
    /// Wildcard destination. Only used as a dispatch table key.
    Any,
}

impl Kind {
    /// Collapse width variants into one representative kind.
    ///
    /// - signed integers → `I64`
    /// - unsigned integers → `U64`
    /// - floats → `F64`
    ///
    /// Everything else maps to itself.
    pub const fn canonical(self) -> Self {
        match self {
            Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::Isize => Self::I64,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::Usize => Self::U64,
            Self::F32 | Self::F64 => Self::F64,
            other => other,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(self.canonical(), Self::I64)
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(self.canonical(), Self::U64)
    }

    pub const fn is_float(self) -> bool {
        matches!(self.canonical(), Self::F64)
    }

    pub const fn is_numeric(self) -> bool {
        self.is_signed() || self.is_unsigned() || self.is_float()
    }

    /// Scalars: bool, string and every numeric width.
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::Bool | Self::String) || self.is_numeric()
    }

    /// Kinds accepted natively as map keys (rendered without a text hook).
    pub const fn is_native_key(self) -> bool {
        matches!(self.canonical(), Self::String | Self::I64 | Self::U64)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Seq => "seq",
            Self::Array => "array",
            Self::Map => "map",
            Self::Record => "record",
            Self::Ref => "ref",
            Self::Dynamic => "dynamic",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_collapses_widths() {
        for kind in [Kind::I8, Kind::I16, Kind::I32, Kind::I64, Kind::Isize] {
            assert_eq!(kind.canonical(), Kind::I64);
        }
        for kind in [Kind::U8, Kind::U16, Kind::U32, Kind::U64, Kind::Usize] {
            assert_eq!(kind.canonical(), Kind::U64);
        }
        assert_eq!(Kind::F32.canonical(), Kind::F64);
    }

    #[test]
    fn canonical_keeps_composites() {
        for kind in [
            Kind::Bool,
            Kind::String,
            Kind::Seq,
            Kind::Array,
            Kind::Map,
            Kind::Record,
            Kind::Ref,
            Kind::Dynamic,
            Kind::Any,
        ] {
            assert_eq!(kind.canonical(), kind);
        }
    }

    #[test]
    fn predicates() {
        assert!(Kind::U16.is_unsigned());
        assert!(!Kind::U16.is_signed());
        assert!(Kind::F32.is_numeric());
        assert!(Kind::String.is_literal());
        assert!(!Kind::Record.is_literal());
        assert!(Kind::Usize.is_native_key());
        assert!(!Kind::F64.is_native_key());
        assert_eq!(Kind::Isize.to_string(), "isize");
    }
}
