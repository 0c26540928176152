use crate::hooks::HookError;
use crate::kind::Kind;

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("invalid transfer input: {type_name} is nil")]
    InvalidInput { type_name: &'static str },

    #[error("invalid transfer output: {type_name} cannot be written through")]
    InvalidOutput { type_name: &'static str },

    #[error("cannot transfer {input} ({input_kind}) into {output} ({output_kind})")]
    TypeMismatch {
        input: &'static str,
        output: &'static str,
        input_kind: Kind,
        output_kind: Kind,
    },

    #[error("unsupported map key type {type_name}")]
    InvalidMapKey { type_name: &'static str },

    #[error("invalid tag '{tag}' on field '{field}'")]
    InvalidTag { field: String, tag: String },

    #[error("marshal {type_name}: {source}")]
    Marshal {
        type_name: &'static str,
        #[source]
        source: HookError,
    },

    #[error("unmarshal into {type_name}: {source}")]
    Unmarshal {
        type_name: &'static str,
        #[source]
        source: HookError,
    },

    #[error("weak type transfer from {input} to {output} is disabled")]
    WeakTypeTransferDisabled {
        input: &'static str,
        output: &'static str,
    },

    #[error("cannot parse '{value}' as {output}: {source}")]
    Parse {
        value: String,
        output: &'static str,
        #[source]
        source: HookError,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal: {0}")]
    Internal(String),
}

impl TransferError {
    pub(crate) fn mismatch(input: &dyn crate::Transferable, output: &mut dyn crate::Transferable) -> Self {
        Self::TypeMismatch {
            input: input.type_name(),
            output: output.type_name(),
            input_kind: input.kind(),
            output_kind: output.slot().kind(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_types_and_kinds() {
        let err = TransferError::TypeMismatch {
            input: "bool",
            output: "alloc::string::String",
            input_kind: Kind::Bool,
            output_kind: Kind::String,
        };
        assert_eq!(
            err.to_string(),
            "cannot transfer bool (bool) into alloc::string::String (string)"
        );
    }

    #[test]
    fn parse_error_keeps_source() {
        let source = "x".parse::<i64>().unwrap_err();
        let err = TransferError::Parse {
            value: "x".into(),
            output: "i64",
            source: Box::new(source),
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
