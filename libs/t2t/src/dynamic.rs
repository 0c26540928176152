use std::collections::BTreeMap;
use std::fmt;

use crate::error::TransferError;
use crate::kind::Kind;
use crate::value::{DynamicSlot, Number, Slot, Transferable, View};

/// Open value whose shape is decided by whatever is transferred into it.
///
/// Scalars keep their original width. Records and maps become `Map`,
/// sequences and arrays become `List`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Dynamic {
    #[default]
    Nil,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(String),
    List(Vec<Dynamic>),
    Map(BTreeMap<Key, Dynamic>),
}

impl Dynamic {
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Kind of the held value. `Nil` reports `Dynamic`.
    pub fn held_kind(&self) -> Kind {
        match self.inner() {
            Some(inner) => inner.kind(),
            None => Kind::Dynamic,
        }
    }

    /// Map entry by string key.
    pub fn get(&self, key: &str) -> Option<&Dynamic> {
        match self {
            Self::Map(map) => map.iter().find(|(k, _)| k.as_str() == Some(key)).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn from_number(number: Number) -> Self {
        match number {
            Number::I8(v) => Self::I8(v),
            Number::I16(v) => Self::I16(v),
            Number::I32(v) => Self::I32(v),
            Number::I64(v) => Self::I64(v),
            Number::Isize(v) => Self::Isize(v),
            Number::U8(v) => Self::U8(v),
            Number::U16(v) => Self::U16(v),
            Number::U32(v) => Self::U32(v),
            Number::U64(v) => Self::U64(v),
            Number::Usize(v) => Self::Usize(v),
            Number::F32(v) => Self::F32(v),
            Number::F64(v) => Self::F64(v),
        }
    }

    fn inner(&self) -> Option<&dyn Transferable> {
        let inner: &dyn Transferable = match self {
            Self::Nil => return None,
            Self::Bool(v) => v,
            Self::I8(v) => v,
            Self::I16(v) => v,
            Self::I32(v) => v,
            Self::I64(v) => v,
            Self::Isize(v) => v,
            Self::U8(v) => v,
            Self::U16(v) => v,
            Self::U32(v) => v,
            Self::U64(v) => v,
            Self::Usize(v) => v,
            Self::F32(v) => v,
            Self::F64(v) => v,
            Self::String(v) => v,
            Self::List(v) => v,
            Self::Map(v) => v,
        };
        Some(inner)
    }
}

impl Transferable for Dynamic {
    fn view(&self) -> View<'_> {
        View::Dynamic(self.inner())
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }

    fn is_zero(&self) -> bool {
        self.is_nil()
    }
}

impl DynamicSlot for Dynamic {
    fn store(&mut self, value: Dynamic) -> Result<(), TransferError> {
        *self = value;
        Ok(())
    }
}

macro_rules! dynamic_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Dynamic {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

dynamic_from! {
    bool => Bool,
    i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize,
    f32 => F32, f64 => F64,
    String => String,
    Vec<Dynamic> => List,
    BTreeMap<Key, Dynamic> => Map,
}

impl From<&str> for Dynamic {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

// ════════════════════════════════════════════════════════════════
//  Key
// ════════════════════════════════════════════════════════════════

/// Map key of a [`Dynamic::Map`]. Keys that are neither strings nor
/// integers are rendered to `Str` through their text hook.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Str(String),
    Int(i64),
    Uint(u64),
}

impl Key {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::Str(String::new())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
        }
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for Key {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Key {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl Transferable for Key {
    fn view(&self) -> View<'_> {
        match self {
            Self::Str(s) => View::Str(s),
            Self::Int(i) => View::Number(Number::I64(*i)),
            Self::Uint(u) => View::Number(Number::U64(*u)),
        }
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }

    fn is_zero(&self) -> bool {
        matches!(self, Self::Str(s) if s.is_empty())
    }
}

impl DynamicSlot for Key {
    fn store(&mut self, value: Dynamic) -> Result<(), TransferError> {
        *self = match value {
            Dynamic::String(s) => Self::Str(s),
            Dynamic::I8(v) => Self::Int(v.into()),
            Dynamic::I16(v) => Self::Int(v.into()),
            Dynamic::I32(v) => Self::Int(v.into()),
            Dynamic::I64(v) => Self::Int(v),
            Dynamic::Isize(v) => Self::Int(v as i64),
            Dynamic::U8(v) => Self::Uint(v.into()),
            Dynamic::U16(v) => Self::Uint(v.into()),
            Dynamic::U32(v) => Self::Uint(v.into()),
            Dynamic::U64(v) => Self::Uint(v),
            Dynamic::Usize(v) => Self::Uint(v as u64),
            other => {
                return Err(TransferError::InvalidMapKey {
                    type_name: other.held_kind().name(),
                });
            }
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_kind_keeps_width() {
        assert_eq!(Dynamic::U16(3).held_kind(), Kind::U16);
        assert_eq!(Dynamic::from("x").held_kind(), Kind::String);
        assert_eq!(Dynamic::List(vec![]).held_kind(), Kind::Seq);
        assert_eq!(Dynamic::Nil.held_kind(), Kind::Dynamic);
        assert_eq!(Dynamic::Nil.kind(), Kind::Dynamic);
    }

    #[test]
    fn nil_is_empty_view() {
        assert!(Dynamic::Nil.view().is_nil());
        assert!(!Dynamic::Bool(false).view().is_nil());
        assert!(Dynamic::Nil.is_zero());
    }

    #[test]
    fn key_store_accepts_strings_and_integers() {
        let mut key = Key::default();
        key.store(Dynamic::I32(-4)).unwrap();
        assert_eq!(key, Key::Int(-4));
        key.store(Dynamic::Usize(4)).unwrap();
        assert_eq!(key, Key::Uint(4));
        key.store(Dynamic::from("k")).unwrap();
        assert_eq!(key, Key::from("k"));

        let err = key.store(Dynamic::F64(1.0)).unwrap_err();
        assert!(matches!(err, TransferError::InvalidMapKey { type_name: "f64" }));
    }

    #[test]
    fn map_lookup_by_string_key() {
        let map = Dynamic::Map(BTreeMap::from([(Key::from("a"), Dynamic::I64(1))]));
        assert_eq!(map.get("a"), Some(&Dynamic::I64(1)));
        assert_eq!(map.get("b"), None);
        assert_eq!(Key::Int(-2).to_string(), "-2");
    }
}
