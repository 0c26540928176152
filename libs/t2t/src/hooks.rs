//! User-defined conversion hooks.
//!
//! A type opts in by overriding the matching `as_*` probe on
//! [`Transferable`](crate::Transferable) (or by listing the hook in
//! `#[transfer(...)]` on a derived record).

use crate::value::Transferable;

/// Error returned by hook implementations.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Default tag namespace.
pub const DEFAULT_TAG: &str = "t2t";

/// Namespace under which the JSON hooks are honoured.
pub const JSON_TAG: &str = "json";

/// Produces an intermediate value that is transferred in place of `self`.
pub trait Marshaler {
    fn marshal(&self) -> Result<Box<dyn Transferable>, HookError>;
}

/// Consumes the raw source value. Dispatch is bypassed for the destination.
pub trait Unmarshaler {
    fn unmarshal(&mut self, input: &dyn Transferable) -> Result<(), HookError>;
}

/// Produces JSON bytes. Only consulted under the `json` namespace.
pub trait JsonMarshaler {
    fn marshal_json(&self) -> Result<Vec<u8>, HookError>;
}

/// Consumes JSON bytes. Only consulted under the `json` namespace.
pub trait JsonUnmarshaler {
    fn unmarshal_json(&mut self, data: &[u8]) -> Result<(), HookError>;
}

/// Renders a map key that is not a string or integer.
pub trait TextMarshaler {
    fn marshal_text(&self) -> Result<String, HookError>;
}
