use std::any::TypeId;

use crate::dynamic::Dynamic;
use crate::error::TransferError;
use crate::fields::FieldInfo;
use crate::hooks::{JsonMarshaler, JsonUnmarshaler, Marshaler, TextMarshaler, Unmarshaler};
use crate::kind::Kind;

/// A value the engine can read from and write into.
///
/// Replaces runtime reflection: the type hands out a typed read accessor
/// ([`View`]) and a typed write accessor ([`Slot`]). Hook capabilities are
/// probed through the `as_*` methods; the defaults report "not supported".
///
/// Records implement this through `#[derive(Transfer)]`.
pub trait Transferable {
    /// Read access, classified by kind.
    fn view(&self) -> View<'_>;

    /// Write access, classified by kind.
    fn slot(&mut self) -> Slot<'_>;

    /// Equality with the type's zero value. Drives `omitempty`.
    fn is_zero(&self) -> bool;

    /// Kind of this value as a source.
    fn kind(&self) -> Kind {
        self.view().kind()
    }

    /// Type identity used in error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_marshaler(&self) -> Option<&dyn Marshaler> {
        None
    }

    fn as_unmarshaler(&mut self) -> Option<&mut dyn Unmarshaler> {
        None
    }

    fn as_json_marshaler(&self) -> Option<&dyn JsonMarshaler> {
        None
    }

    fn as_json_unmarshaler(&mut self) -> Option<&mut dyn JsonUnmarshaler> {
        None
    }

    fn as_text_marshaler(&self) -> Option<&dyn TextMarshaler> {
        None
    }
}

// ════════════════════════════════════════════════════════════════
//  Numbers
// ════════════════════════════════════════════════════════════════

/// Numeric scalar with its original width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
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
}

macro_rules! number_cast {
    ($name:ident, $target:ty) => {
        /// Cast to the named width (`as` semantics: wrap, truncate or saturate).
        pub fn $name(self) -> $target {
            match self {
                Self::I8(v) => v as $target,
                Self::I16(v) => v as $target,
                Self::I32(v) => v as $target,
                Self::I64(v) => v as $target,
                Self::Isize(v) => v as $target,
                Self::U8(v) => v as $target,
                Self::U16(v) => v as $target,
                Self::U32(v) => v as $target,
                Self::U64(v) => v as $target,
                Self::Usize(v) => v as $target,
                Self::F32(v) => v as $target,
                Self::F64(v) => v as $target,
            }
        }
    };
}

impl Number {
    number_cast!(as_i64, i64);
    number_cast!(as_u64, u64);
    number_cast!(as_f64, f64);

    pub fn kind(self) -> Kind {
        match self {
            Self::I8(_) => Kind::I8,
            Self::I16(_) => Kind::I16,
            Self::I32(_) => Kind::I32,
            Self::I64(_) => Kind::I64,
            Self::Isize(_) => Kind::Isize,
            Self::U8(_) => Kind::U8,
            Self::U16(_) => Kind::U16,
            Self::U32(_) => Kind::U32,
            Self::U64(_) => Kind::U64,
            Self::Usize(_) => Kind::Usize,
            Self::F32(_) => Kind::F32,
            Self::F64(_) => Kind::F64,
        }
    }

    /// Decimal text: integers in base 10, floats as the shortest
    /// representation that round-trips.
    pub fn to_decimal(self) -> String {
        match self.kind().canonical() {
            Kind::I64 => self.as_i64().to_string(),
            Kind::U64 => self.as_u64().to_string(),
            _ => self.as_f64().to_string(),
        }
    }
}

/// Mutable numeric destination with its declared width.
#[derive(Debug)]
pub enum NumberSlot<'a> {
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
}

macro_rules! number_store {
    ($name:ident, $source:ty) => {
        /// Store into the declared width (`as` semantics).
        pub fn $name(self, value: $source) {
            match self {
                Self::I8(p) => *p = value as i8,
                Self::I16(p) => *p = value as i16,
                Self::I32(p) => *p = value as i32,
                Self::I64(p) => *p = value as i64,
                Self::Isize(p) => *p = value as isize,
                Self::U8(p) => *p = value as u8,
                Self::U16(p) => *p = value as u16,
                Self::U32(p) => *p = value as u32,
                Self::U64(p) => *p = value as u64,
                Self::Usize(p) => *p = value as usize,
                Self::F32(p) => *p = value as f32,
                Self::F64(p) => *p = value as f64,
            }
        }
    };
}

impl NumberSlot<'_> {
    number_store!(set_i64, i64);
    number_store!(set_u64, u64);
    number_store!(set_f64, f64);

    pub fn kind(&self) -> Kind {
        match self {
            Self::I8(_) => Kind::I8,
            Self::I16(_) => Kind::I16,
            Self::I32(_) => Kind::I32,
            Self::I64(_) => Kind::I64,
            Self::Isize(_) => Kind::Isize,
            Self::U8(_) => Kind::U8,
            Self::U16(_) => Kind::U16,
            Self::U32(_) => Kind::U32,
            Self::U64(_) => Kind::U64,
            Self::Usize(_) => Kind::Usize,
            Self::F32(_) => Kind::F32,
            Self::F64(_) => Kind::F64,
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  View / Slot
// ════════════════════════════════════════════════════════════════

/// Read accessor over a value.
#[derive(Clone, Copy)]
pub enum View<'a> {
    Bool(bool),
    Str(&'a str),
    Number(Number),
    Seq(&'a dyn SeqView),
    Array(&'a dyn SeqView),
    Map(&'a dyn MapView),
    Record(&'a dyn RecordView),
    /// `None` is a nil reference.
    Ref(Option<&'a dyn Transferable>),
    /// `None` is an empty dynamic value.
    Dynamic(Option<&'a dyn Transferable>),
}

impl View<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Str(_) => Kind::String,
            Self::Number(n) => n.kind(),
            Self::Seq(_) => Kind::Seq,
            Self::Array(_) => Kind::Array,
            Self::Map(_) => Kind::Map,
            Self::Record(_) => Kind::Record,
            Self::Ref(_) => Kind::Ref,
            Self::Dynamic(_) => Kind::Dynamic,
        }
    }

    /// Nil reference or empty dynamic value.
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Ref(None) | Self::Dynamic(None))
    }
}

/// Write accessor over a value.
pub enum Slot<'a> {
    Bool(&'a mut bool),
    Str(&'a mut String),
    Number(NumberSlot<'a>),
    Seq(&'a mut dyn SeqSlot),
    Array(&'a mut dyn ArraySlot),
    Map(&'a mut dyn MapSlot),
    Record(&'a mut dyn RecordSlot),
    Ref(&'a mut dyn RefSlot),
    Dynamic(&'a mut dyn DynamicSlot),
}

impl Slot<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Str(_) => Kind::String,
            Self::Number(n) => n.kind(),
            Self::Seq(_) => Kind::Seq,
            Self::Array(_) => Kind::Array,
            Self::Map(_) => Kind::Map,
            Self::Record(_) => Kind::Record,
            Self::Ref(_) => Kind::Ref,
            Self::Dynamic(_) => Kind::Dynamic,
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Per-category accessors
// ════════════════════════════════════════════════════════════════

/// Indexed read access to a sequence or array.
pub trait SeqView {
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> Option<&dyn Transferable>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Growable sequence destination.
pub trait SeqSlot {
    fn len(&self) -> usize;
    /// Truncate or grow to `len`; new elements take their default value.
    fn resize(&mut self, len: usize);
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Transferable>;
}

/// Fixed-length sequence destination.
pub trait ArraySlot {
    fn len(&self) -> usize;
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Transferable>;
    /// Reset the element at `index` to its zero value.
    fn reset(&mut self, index: usize);
}

/// Key type of a map, known without reading any entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyShape {
    pub kind: Kind,
    pub type_name: &'static str,
    /// The key type renders itself through [`TextMarshaler`].
    pub text: bool,
}

impl KeyShape {
    /// Shape of `K`, probed on its default value.
    pub fn of<K: Transferable + Default>() -> Self {
        let key = K::default();
        Self {
            kind: key.kind(),
            type_name: key.type_name(),
            text: key.as_text_marshaler().is_some(),
        }
    }
}

/// Iteration over key/value pairs.
pub trait MapView {
    fn key_shape(&self) -> KeyShape;
    fn len(&self) -> usize;
    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Transferable, &dyn Transferable)> + '_>;
}

/// Mapping destination.
pub trait MapSlot {
    /// Kind of the key type as a destination.
    fn key_kind(&self) -> Kind;
    fn key_type(&self) -> &'static str;
    /// Insert one entry. `fill` receives fresh default key and value slots;
    /// the pair is inserted only if `fill` succeeds.
    fn insert_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Transferable, &mut dyn Transferable) -> Result<(), TransferError>,
    ) -> Result<(), TransferError>;
}

/// Named-field read access. Generated by `#[derive(Transfer)]`.
pub trait RecordView {
    /// Identity of the concrete record type. Keys the layout cache.
    fn record_id(&self) -> TypeId;
    /// Declared fields, in declaration order.
    fn fields(&self) -> &'static [FieldInfo];
    fn field(&self, index: usize) -> Option<&dyn Transferable>;
}

/// Named-field write access. Generated by `#[derive(Transfer)]`.
pub trait RecordSlot: RecordView {
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Transferable>;
}

/// Indirection destination.
pub trait RefSlot {
    /// The pointee, allocated with its default value if absent.
    fn target(&mut self) -> Result<&mut dyn Transferable, TransferError>;
}

/// Open destination that takes whatever shape the source has.
pub trait DynamicSlot {
    fn store(&mut self, value: Dynamic) -> Result<(), TransferError>;
}
