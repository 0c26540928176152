use serde_json::Value;

use crate::dispatch;
use crate::error::TransferError;
use crate::hooks::JSON_TAG;
use crate::kind::Kind;
use crate::transformer::Transformer;
use crate::value::{Slot, Transferable};

impl Transformer {
    /// One recursive step: hooks, then reference destinations, then the
    /// dispatch table.
    pub(crate) fn transfer_value(
        &self,
        input: &dyn Transferable,
        output: &mut dyn Transferable,
    ) -> Result<(), TransferError> {
        if self.intercept(input, output)? {
            return Ok(());
        }

        let output_kind = output.slot().kind();
        if output_kind == Kind::Ref {
            if input.view().is_nil() {
                return Ok(());
            }
            if let Slot::Ref(reference) = output.slot() {
                let target = reference.target()?;
                return self.transfer_value(input, target);
            }
        }

        let input_kind = input.kind();
        let Some(convert) = dispatch::lookup(input_kind, output_kind) else {
            return Err(TransferError::mismatch(input, output));
        };
        tracing::trace!(
            input = input.type_name(),
            output = output.type_name(),
            %input_kind,
            %output_kind,
            "dispatch"
        );
        convert(self, input, output)
    }

    /// Run the first applicable hook. Returns whether one ran.
    fn intercept(&self, input: &dyn Transferable, output: &mut dyn Transferable) -> Result<bool, TransferError> {
        if let Some(marshaler) = input.as_marshaler() {
            tracing::trace!(input = input.type_name(), "marshal hook");
            let substitute = marshaler.marshal().map_err(|source| TransferError::Marshal {
                type_name: input.type_name(),
                source,
            })?;
            self.transfer_value(&*substitute, output)?;
            return Ok(true);
        }

        let output_type = output.type_name();
        if let Some(unmarshaler) = output.as_unmarshaler() {
            tracing::trace!(output = output_type, "unmarshal hook");
            unmarshaler.unmarshal(input).map_err(|source| TransferError::Unmarshal {
                type_name: output_type,
                source,
            })?;
            return Ok(true);
        }

        if self.tag_name != JSON_TAG {
            return Ok(false);
        }

        if let Some(marshaler) = input.as_json_marshaler() {
            tracing::trace!(input = input.type_name(), "json marshal hook");
            let data = marshaler.marshal_json().map_err(|source| TransferError::Marshal {
                type_name: input.type_name(),
                source,
            })?;
            let value: Value = serde_json::from_slice(&data)?;
            self.transfer_value(&value, output)?;
            return Ok(true);
        }

        if output.as_json_unmarshaler().is_some() {
            tracing::trace!(output = output_type, "json unmarshal hook");
            let mut value = Value::Null;
            self.transfer_value(input, &mut value)?;
            let data = serde_json::to_vec(&value)?;
            if let Some(unmarshaler) = output.as_json_unmarshaler() {
                unmarshaler.unmarshal_json(&data).map_err(|source| TransferError::Unmarshal {
                    type_name: output_type,
                    source,
                })?;
            }
            return Ok(true);
        }

        Ok(false)
    }
}
