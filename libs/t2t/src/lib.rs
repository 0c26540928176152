//! Tag-driven structural transfer between typed values.
//!
//! A source value is read through its [`View`] and written into a
//! destination through its [`Slot`]; the pair of kinds picks a converter
//! that recurses into nested values. Records take part through
//! `#[derive(Transfer)]`, field names come from
//! `#[transfer(<namespace> = "name,inline,omitempty")]`.

extern crate self as t2t;

mod convert;
pub mod dispatch;
pub mod dynamic;
mod engine;
pub mod error;
pub mod fields;
pub mod hooks;
mod impls;
pub mod json;
pub mod kind;
pub mod tag;
pub mod transformer;
pub mod value;

pub use t2t_derive::Transfer;

pub use dynamic::{Dynamic, Key};
pub use error::{ConfigError, TransferError};
pub use fields::{FieldDescriptor, FieldInfo, RecordLayout};
pub use hooks::{HookError, JsonMarshaler, JsonUnmarshaler, Marshaler, TextMarshaler, Unmarshaler};
pub use kind::Kind;
pub use tag::TagOptions;
pub use transformer::{Transformer, transfer, transfer_with_tag_name};
pub use value::{
    ArraySlot, DynamicSlot, KeyShape, MapSlot, MapView, Number, NumberSlot, RecordSlot, RecordView, RefSlot, SeqSlot,
    SeqView, Slot, Transferable, View,
};
