//! `serde_json` values as dynamic sources and destinations.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::dynamic::{Dynamic, Key};
use crate::error::TransferError;
use crate::kind::Kind;
use crate::value::{DynamicSlot, KeyShape, MapSlot, MapView, Number, Slot, Transferable, View};

impl Transferable for Value {
    fn view(&self) -> View<'_> {
        let inner: &dyn Transferable = match self {
            Value::Null => return View::Dynamic(None),
            Value::Bool(b) => b,
            Value::Number(n) => n,
            Value::String(s) => s,
            Value::Array(items) => items,
            Value::Object(map) => map,
        };
        View::Dynamic(Some(inner))
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }

    fn is_zero(&self) -> bool {
        self.is_null()
    }
}

impl DynamicSlot for Value {
    fn store(&mut self, value: Dynamic) -> Result<(), TransferError> {
        *self = value.into();
        Ok(())
    }
}

impl Transferable for serde_json::Number {
    fn view(&self) -> View<'_> {
        let number = if let Some(i) = self.as_i64() {
            Number::I64(i)
        } else if let Some(u) = self.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(self.as_f64().unwrap_or(f64::NAN))
        };
        View::Number(number)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }

    fn is_zero(&self) -> bool {
        self.as_f64() == Some(0.0)
    }
}

impl DynamicSlot for serde_json::Number {
    fn store(&mut self, value: Dynamic) -> Result<(), TransferError> {
        let kind = value.held_kind();
        match Value::from(value) {
            Value::Number(n) if kind.is_numeric() => {
                *self = n;
                Ok(())
            }
            _ => Err(TransferError::TypeMismatch {
                input: "t2t::Dynamic",
                output: std::any::type_name::<Self>(),
                input_kind: kind,
                output_kind: Kind::F64,
            }),
        }
    }
}

impl Transferable for Map<String, Value> {
    fn view(&self) -> View<'_> {
        View::Map(self)
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::Map(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl MapView for Map<String, Value> {
    fn key_shape(&self) -> KeyShape {
        KeyShape::of::<String>()
    }

    fn len(&self) -> usize {
        Map::len(self)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&dyn Transferable, &dyn Transferable)> + '_> {
        Box::new(self.iter().map(|(k, v)| (k as &dyn Transferable, v as &dyn Transferable)))
    }
}

impl MapSlot for Map<String, Value> {
    fn key_kind(&self) -> Kind {
        Kind::String
    }

    fn key_type(&self) -> &'static str {
        std::any::type_name::<String>()
    }

    fn insert_with(
        &mut self,
        fill: &mut dyn FnMut(&mut dyn Transferable, &mut dyn Transferable) -> Result<(), TransferError>,
    ) -> Result<(), TransferError> {
        let mut key = String::new();
        let mut value = Value::Null;
        fill(&mut key, &mut value)?;
        self.insert(key, value);
        Ok(())
    }
}

impl From<Dynamic> for Value {
    /// Non-finite floats become `null`.
    fn from(value: Dynamic) -> Self {
        match value {
            Dynamic::Nil => Value::Null,
            Dynamic::Bool(b) => Value::Bool(b),
            Dynamic::I8(v) => v.into(),
            Dynamic::I16(v) => v.into(),
            Dynamic::I32(v) => v.into(),
            Dynamic::I64(v) => v.into(),
            Dynamic::Isize(v) => v.into(),
            Dynamic::U8(v) => v.into(),
            Dynamic::U16(v) => v.into(),
            Dynamic::U32(v) => v.into(),
            Dynamic::U64(v) => v.into(),
            Dynamic::Usize(v) => v.into(),
            Dynamic::F32(v) => float(v.into()),
            Dynamic::F64(v) => float(v),
            Dynamic::String(s) => Value::String(s),
            Dynamic::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Dynamic::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k.to_string(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

fn float(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}

impl From<Value> for Dynamic {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Dynamic::Nil,
            Value::Bool(b) => Dynamic::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Dynamic::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Dynamic::U64(u)
                } else {
                    Dynamic::F64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Dynamic::String(s),
            Value::Array(items) => Dynamic::List(items.into_iter().map(Dynamic::from).collect()),
            Value::Object(map) => Dynamic::Map(
                map.into_iter()
                    .map(|(k, v)| (Key::Str(k), Dynamic::from(v)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }
}
