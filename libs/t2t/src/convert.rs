//! Converters for every legal kind pair.
//!
//! Each converter is reached only through [`dispatch::lookup`](crate::dispatch::lookup),
//! so a view or slot of an unexpected shape means an accessor lies about its
//! kind; that is reported as a type mismatch.

use std::collections::BTreeMap;

use crate::dynamic::{Dynamic, Key};
use crate::error::TransferError;
use crate::fields;
use crate::kind::Kind;
use crate::transformer::Transformer;
use crate::value::{MapView, Number, NumberSlot, Slot, Transferable, View};

/// Names and kinds of both sides, captured before the destination is
/// borrowed for writing.
struct Pair {
    input: &'static str,
    output: &'static str,
    input_kind: Kind,
    output_kind: Kind,
}

impl Pair {
    fn of(input: &dyn Transferable, output: &mut dyn Transferable) -> Self {
        Self {
            input: input.type_name(),
            output: output.type_name(),
            input_kind: input.kind(),
            output_kind: output.slot().kind(),
        }
    }

    fn mismatch(&self) -> TransferError {
        TransferError::TypeMismatch {
            input: self.input,
            output: self.output,
            input_kind: self.input_kind,
            output_kind: self.output_kind,
        }
    }

    fn missing(&self, what: impl std::fmt::Display) -> TransferError {
        TransferError::Internal(format!("{} -> {}: {what}", self.input, self.output))
    }

    fn weak(&self, t: &Transformer) -> Result<(), TransferError> {
        if t.weak_type_transfer {
            Ok(())
        } else {
            Err(TransferError::WeakTypeTransferDisabled {
                input: self.input,
                output: self.output,
            })
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Literals
// ════════════════════════════════════════════════════════════════

fn number_of(input: &dyn Transferable, pair: &Pair) -> Result<Number, TransferError> {
    match input.view() {
        View::Number(n) => Ok(n),
        _ => Err(pair.mismatch()),
    }
}

fn number_slot<'a>(output: &'a mut dyn Transferable, pair: &Pair) -> Result<NumberSlot<'a>, TransferError> {
    match output.slot() {
        Slot::Number(n) => Ok(n),
        _ => Err(pair.mismatch()),
    }
}

fn string_slot<'a>(output: &'a mut dyn Transferable, pair: &Pair) -> Result<&'a mut String, TransferError> {
    match output.slot() {
        Slot::Str(s) => Ok(s),
        _ => Err(pair.mismatch()),
    }
}

fn str_of<'a>(input: &'a dyn Transferable, pair: &Pair) -> Result<&'a str, TransferError> {
    match input.view() {
        View::Str(s) => Ok(s),
        _ => Err(pair.mismatch()),
    }
}

fn store(output: &mut dyn Transferable, value: Dynamic, pair: &Pair) -> Result<(), TransferError> {
    match output.slot() {
        Slot::Dynamic(d) => d.store(value),
        _ => Err(pair.mismatch()),
    }
}

pub(crate) fn literal_to_dynamic(
    _: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let value = match input.view() {
        View::Bool(b) => Dynamic::Bool(b),
        View::Str(s) => Dynamic::String(s.to_owned()),
        View::Number(n) => Dynamic::from_number(n),
        _ => return Err(pair.mismatch()),
    };
    store(output, value, &pair)
}

pub(crate) fn bool_to_bool(
    _: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    match (input.view(), output.slot()) {
        (View::Bool(b), Slot::Bool(out)) => {
            *out = b;
            Ok(())
        }
        _ => Err(pair.mismatch()),
    }
}

pub(crate) fn string_to_string(
    _: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let s = str_of(input, &pair)?;
    *string_slot(output, &pair)? = s.to_owned();
    Ok(())
}

macro_rules! parse_number {
    ($name:ident, $ty:ty, $set:ident) => {
        pub(crate) fn $name(
            t: &Transformer,
            input: &dyn Transferable,
            output: &mut dyn Transferable,
        ) -> Result<(), TransferError> {
            let pair = Pair::of(input, output);
            pair.weak(t)?;
            let s = str_of(input, &pair)?;
            let parsed = s.parse::<$ty>().map_err(|e| TransferError::Parse {
                value: s.to_owned(),
                output: pair.output,
                source: Box::new(e),
            })?;
            number_slot(output, &pair)?.$set(parsed);
            Ok(())
        }
    };
}

parse_number!(string_to_int, i64, set_i64);
parse_number!(string_to_uint, u64, set_u64);
parse_number!(string_to_float, f64, set_f64);

macro_rules! number_to_number {
    ($name:ident, $read:ident, $set:ident, strict) => {
        pub(crate) fn $name(
            _: &Transformer,
            input: &dyn Transferable,
            output: &mut dyn Transferable,
        ) -> Result<(), TransferError> {
            let pair = Pair::of(input, output);
            let n = number_of(input, &pair)?;
            number_slot(output, &pair)?.$set(n.$read());
            Ok(())
        }
    };
    ($name:ident, $read:ident, $set:ident, weak) => {
        pub(crate) fn $name(
            t: &Transformer,
            input: &dyn Transferable,
            output: &mut dyn Transferable,
        ) -> Result<(), TransferError> {
            let pair = Pair::of(input, output);
            pair.weak(t)?;
            let n = number_of(input, &pair)?;
            number_slot(output, &pair)?.$set(n.$read());
            Ok(())
        }
    };
}

number_to_number!(int_to_int, as_i64, set_i64, strict);
number_to_number!(int_to_uint, as_u64, set_u64, weak);
number_to_number!(int_to_float, as_f64, set_f64, weak);
number_to_number!(uint_to_int, as_i64, set_i64, weak);
number_to_number!(uint_to_uint, as_u64, set_u64, strict);
number_to_number!(uint_to_float, as_f64, set_f64, weak);
number_to_number!(float_to_float, as_f64, set_f64, strict);
number_to_number!(float_to_int, as_i64, set_i64, weak);
number_to_number!(float_to_uint, as_u64, set_u64, weak);

pub(crate) fn number_to_string(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    pair.weak(t)?;
    let n = number_of(input, &pair)?;
    *string_slot(output, &pair)? = n.to_decimal();
    Ok(())
}

// ════════════════════════════════════════════════════════════════
//  Indirection
// ════════════════════════════════════════════════════════════════

pub(crate) fn deref(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    match input.view() {
        View::Ref(Some(target)) => t.transfer_value(target, output),
        _ => Ok(()),
    }
}

pub(crate) fn unwrap_dynamic(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    match input.view() {
        View::Dynamic(Some(inner)) => t.transfer_value(inner, output),
        _ => Ok(()),
    }
}

// ════════════════════════════════════════════════════════════════
//  Sequences
// ════════════════════════════════════════════════════════════════

pub(crate) fn seq_to_dynamic(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let (View::Seq(seq) | View::Array(seq)) = input.view() else {
        return Err(pair.mismatch());
    };
    if seq.is_empty() {
        return Ok(());
    }

    let mut items = vec![Dynamic::Nil; seq.len()];
    for (i, item) in items.iter_mut().enumerate() {
        let value = seq.get(i).ok_or_else(|| pair.missing(format!("no element {i}")))?;
        t.transfer_value(value, item)?;
    }
    store(output, Dynamic::List(items), &pair)
}

pub(crate) fn seq_to_seq(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let (View::Seq(seq) | View::Array(seq)) = input.view() else {
        return Err(pair.mismatch());
    };
    let Slot::Seq(dest) = output.slot() else {
        return Err(pair.mismatch());
    };

    dest.resize(seq.len());
    for i in 0..seq.len() {
        let value = seq.get(i).ok_or_else(|| pair.missing(format!("no element {i}")))?;
        let item = dest.get_mut(i).ok_or_else(|| pair.missing(format!("no slot {i}")))?;
        t.transfer_value(value, item)?;
    }
    Ok(())
}

pub(crate) fn array_to_array(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let (View::Seq(seq) | View::Array(seq)) = input.view() else {
        return Err(pair.mismatch());
    };
    let Slot::Array(dest) = output.slot() else {
        return Err(pair.mismatch());
    };

    let copied = seq.len().min(dest.len());
    for i in 0..copied {
        let value = seq.get(i).ok_or_else(|| pair.missing(format!("no element {i}")))?;
        let item = dest.get_mut(i).ok_or_else(|| pair.missing(format!("no slot {i}")))?;
        t.transfer_value(value, item)?;
    }
    for i in copied..dest.len() {
        dest.reset(i);
    }
    Ok(())
}

pub(crate) fn seq_to_record(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let (View::Seq(seq) | View::Array(seq)) = input.view() else {
        return Err(pair.mismatch());
    };
    let Slot::Record(record) = output.slot() else {
        return Err(pair.mismatch());
    };

    let infos = record.fields();
    for (i, info) in infos.iter().enumerate().take(seq.len()) {
        if !info.exported {
            continue;
        }
        let value = seq.get(i).ok_or_else(|| pair.missing(format!("no element {i}")))?;
        let field = record
            .field_mut(i)
            .ok_or_else(|| pair.missing(format!("no field {}", info.name)))?;
        t.transfer_value(value, field)?;
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════
//  Map keys
// ════════════════════════════════════════════════════════════════

/// A key type is usable if it is a string or integer, or renders itself as
/// text. Checked once per map, before any entry is read.
fn validate_keys(map: &dyn MapView) -> Result<(), TransferError> {
    let shape = map.key_shape();
    if shape.kind.is_native_key() || shape.text {
        Ok(())
    } else {
        Err(TransferError::InvalidMapKey {
            type_name: shape.type_name,
        })
    }
}

fn render_key(key: &dyn Transferable) -> Result<String, TransferError> {
    match key.view() {
        View::Str(s) => return Ok(s.to_owned()),
        View::Number(n) if n.kind().is_native_key() => return Ok(n.to_decimal()),
        _ => {}
    }
    match key.as_text_marshaler() {
        Some(text) => text.marshal_text().map_err(|source| TransferError::Marshal {
            type_name: key.type_name(),
            source,
        }),
        None => Err(TransferError::InvalidMapKey {
            type_name: key.type_name(),
        }),
    }
}

fn dynamic_key(key: &dyn Transferable) -> Result<Key, TransferError> {
    match key.view() {
        View::Str(s) => Ok(Key::Str(s.to_owned())),
        View::Number(n) if n.kind().is_signed() => Ok(Key::Int(n.as_i64())),
        View::Number(n) if n.kind().is_unsigned() => Ok(Key::Uint(n.as_u64())),
        _ => render_key(key).map(Key::Str),
    }
}

// ════════════════════════════════════════════════════════════════
//  Maps
// ════════════════════════════════════════════════════════════════

pub(crate) fn map_to_dynamic(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let View::Map(map) = input.view() else {
        return Err(pair.mismatch());
    };

    validate_keys(map)?;
    let mut entries = BTreeMap::new();
    for (key, value) in map.entries() {
        let key = dynamic_key(key)?;
        let mut item = Dynamic::Nil;
        t.transfer_value(value, &mut item)?;
        entries.insert(key, item);
    }
    store(output, Dynamic::Map(entries), &pair)
}

pub(crate) fn map_to_map(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let View::Map(map) = input.view() else {
        return Err(pair.mismatch());
    };
    let Slot::Map(dest) = output.slot() else {
        return Err(pair.mismatch());
    };
    let key_kind = dest.key_kind().canonical();
    validate_keys(map)?;

    for (key, value) in map.entries() {
        let source_kind = key.kind().canonical();

        let rendered;
        let key: &dyn Transferable = if key_kind == Kind::Dynamic && !source_kind.is_native_key() {
            rendered = render_key(key)?;
            &rendered
        } else if key_kind == Kind::Dynamic || key_kind == source_kind {
            key
        } else {
            return Err(pair.mismatch());
        };

        dest.insert_with(&mut |k, v| {
            t.transfer_value(key, k)?;
            t.transfer_value(value, v)
        })?;
    }
    Ok(())
}

pub(crate) fn map_to_record(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let View::Map(map) = input.view() else {
        return Err(pair.mismatch());
    };
    let layout = match output.view() {
        View::Record(record) => fields::resolve(record, &t.tag_name),
        _ => return Err(pair.mismatch()),
    };
    let Slot::Record(record) = output.slot() else {
        return Err(pair.mismatch());
    };

    validate_keys(map)?;
    for (key, value) in map.entries() {
        let name = render_key(key)?;
        let Some(path) = layout.lookup(&name) else {
            tracing::debug!(key = %name, record = pair.output, "no field for map key");
            continue;
        };
        let field = fields::field_at(&mut *record, path)
            .ok_or_else(|| pair.missing(format!("no field at {path:?}")))?;
        t.transfer_value(value, field)?;
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════
//  Records
// ════════════════════════════════════════════════════════════════

pub(crate) fn record_to_dynamic(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let mut entries = BTreeMap::<Key, Dynamic>::new();
    record_to_map(t, input, &mut entries)?;
    store(output, Dynamic::Map(entries), &pair)
}

pub(crate) fn record_to_map(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let View::Record(record) = input.view() else {
        return Err(pair.mismatch());
    };
    let (key_kind, key_type) = match output.slot() {
        Slot::Map(dest) => (dest.key_kind(), dest.key_type()),
        _ => return Err(pair.mismatch()),
    };
    if !matches!(key_kind, Kind::String | Kind::Dynamic) {
        return Err(TransferError::InvalidMapKey { type_name: key_type });
    }

    let layout = fields::resolve(record, &t.tag_name);
    for desc in layout.fields() {
        let value = record
            .field(desc.index)
            .ok_or_else(|| pair.missing(format!("no field {}", desc.name)))?;
        if desc.options.omit_empty && value.is_zero() {
            continue;
        }
        if desc.flatten {
            t.transfer_value(value, output)?;
            continue;
        }

        let Slot::Map(dest) = output.slot() else {
            return Err(pair.mismatch());
        };
        let name = &desc.name;
        dest.insert_with(&mut |k, v| {
            t.transfer_value(name, k)?;
            t.transfer_value(value, v)
        })?;
    }
    Ok(())
}

pub(crate) fn record_to_record(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let View::Record(record) = input.view() else {
        return Err(pair.mismatch());
    };
    let target = match output.view() {
        View::Record(dest) => fields::resolve(dest, &t.tag_name),
        _ => return Err(pair.mismatch()),
    };

    let layout = fields::resolve(record, &t.tag_name);
    for desc in layout.fields() {
        let value = record
            .field(desc.index)
            .ok_or_else(|| pair.missing(format!("no field {}", desc.name)))?;
        if desc.options.omit_empty && value.is_zero() {
            continue;
        }
        if desc.flatten {
            t.transfer_value(value, output)?;
            continue;
        }

        let Some(path) = target.lookup(&desc.name) else {
            tracing::debug!(field = %desc.name, record = pair.output, "no matching field");
            continue;
        };
        let Slot::Record(dest) = output.slot() else {
            return Err(pair.mismatch());
        };
        let field = fields::field_at(dest, path).ok_or_else(|| pair.missing(format!("no field at {path:?}")))?;
        t.transfer_value(value, field)?;
    }
    Ok(())
}

pub(crate) fn record_to_seq(
    t: &Transformer,
    input: &dyn Transferable,
    output: &mut dyn Transferable,
) -> Result<(), TransferError> {
    let pair = Pair::of(input, output);
    let View::Record(record) = input.view() else {
        return Err(pair.mismatch());
    };
    let layout = fields::resolve(record, &t.tag_name);

    let mut visible = Vec::with_capacity(layout.fields().len());
    for desc in layout.fields() {
        let value = record
            .field(desc.index)
            .ok_or_else(|| pair.missing(format!("no field {}", desc.name)))?;
        if desc.options.omit_empty && value.is_zero() {
            continue;
        }
        visible.push((desc.index, value));
    }

    match output.slot() {
        Slot::Seq(dest) => {
            dest.resize(0);
            dest.resize(visible.len());
            for (i, (_, value)) in visible.into_iter().enumerate() {
                let item = dest.get_mut(i).ok_or_else(|| pair.missing(format!("no slot {i}")))?;
                t.transfer_value(value, item)?;
            }
        }
        Slot::Array(dest) => {
            for (index, value) in visible {
                if index >= dest.len() {
                    break;
                }
                let item = dest
                    .get_mut(index)
                    .ok_or_else(|| pair.missing(format!("no slot {index}")))?;
                t.transfer_value(value, item)?;
            }
        }
        _ => return Err(pair.mismatch()),
    }
    Ok(())
}
