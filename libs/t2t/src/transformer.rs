use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TransferError};
use crate::hooks::DEFAULT_TAG;
use crate::value::Transferable;

/// Transfer configuration.
///
/// Cheap to clone and immutable during a transfer; share one instance
/// across threads freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformer {
    /// Tag namespace used to resolve field names.
    #[serde(default = "default_tag_name")]
    pub tag_name: String,

    /// Allow lossy conversions between numbers and strings and across
    /// signed, unsigned and float kinds.
    #[serde(default)]
    pub weak_type_transfer: bool,
}

fn default_tag_name() -> String {
    DEFAULT_TAG.to_string()
}

impl Default for Transformer {
    fn default() -> Self {
        Self {
            tag_name: default_tag_name(),
            weak_type_transfer: false,
        }
    }
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_weak_type_transfer(&mut self) -> &mut Self {
        self.weak_type_transfer = true;
        self
    }

    pub fn disable_weak_type_transfer(&mut self) -> &mut Self {
        self.weak_type_transfer = false;
        self
    }

    pub fn with_weak_type_transfer(mut self, enabled: bool) -> Self {
        self.weak_type_transfer = enabled;
        self
    }

    /// Copy of this configuration reading tags from `tag_name`.
    pub fn with_tag_name(&self, tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..self.clone()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Transfer `input` into `output`.
    ///
    /// A nil reference or empty dynamic value at the top level is rejected.
    /// Nested nil values are skipped. On error `output` may be partially
    /// written.
    pub fn transfer(&self, input: &dyn Transferable, output: &mut dyn Transferable) -> Result<(), TransferError> {
        let guarded = AssertUnwindSafe(|| {
            if input.view().is_nil() {
                return Err(TransferError::InvalidInput {
                    type_name: input.type_name(),
                });
            }
            self.transfer_value(input, output)
        });

        match panic::catch_unwind(guarded) {
            Ok(result) => result,
            Err(payload) => match payload.downcast::<TransferError>() {
                Ok(err) => Err(*err),
                Err(payload) => panic::resume_unwind(payload),
            },
        }
    }
}

/// Transfer with the default configuration.
pub fn transfer(input: &dyn Transferable, output: &mut dyn Transferable) -> Result<(), TransferError> {
    Transformer::default().transfer(input, output)
}

/// Transfer with the default configuration under another tag namespace.
pub fn transfer_with_tag_name(
    input: &dyn Transferable,
    output: &mut dyn Transferable,
    tag_name: &str,
) -> Result<(), TransferError> {
    Transformer::default().with_tag_name(tag_name).transfer(input, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dynamic;

    #[test]
    fn defaults() {
        let t = Transformer::new();
        assert_eq!(t.tag_name, "t2t");
        assert!(!t.weak_type_transfer);
    }

    #[test]
    fn builder_toggles() {
        let mut t = Transformer::new();
        t.enable_weak_type_transfer();
        assert!(t.weak_type_transfer);
        t.disable_weak_type_transfer();
        assert!(!t.weak_type_transfer);
        assert!(Transformer::new().with_weak_type_transfer(true).weak_type_transfer);
    }

    #[test]
    fn tag_override_leaves_original() {
        let t = Transformer::new().with_weak_type_transfer(true);
        let json = t.with_tag_name("json");
        assert_eq!(json.tag_name, "json");
        assert!(json.weak_type_transfer);
        assert_eq!(t.tag_name, "t2t");
    }

    #[test]
    fn parse_toml() {
        let t = Transformer::parse("tag_name = \"json\"\nweak_type_transfer = true\n").unwrap();
        assert_eq!(t, Transformer::new().with_weak_type_transfer(true).with_tag_name("json"));

        let t = Transformer::parse("").unwrap();
        assert_eq!(t, Transformer::default());

        assert!(matches!(Transformer::parse("tag_name = 3"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_missing_file() {
        let err = Transformer::load("/nonexistent/t2t.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn nil_top_level_input_is_rejected() {
        let mut out = Dynamic::Nil;
        let err = transfer(&None::<i64>, &mut out).unwrap_err();
        assert!(matches!(err, TransferError::InvalidInput { .. }));
        let err = transfer(&Dynamic::Nil, &mut out).unwrap_err();
        assert!(matches!(err, TransferError::InvalidInput { .. }));
    }

    struct Panicking;

    impl Transferable for Panicking {
        fn view(&self) -> crate::View<'_> {
            std::panic::panic_any(TransferError::Internal("boom".into()))
        }

        fn slot(&mut self) -> crate::Slot<'_> {
            unreachable!()
        }

        fn is_zero(&self) -> bool {
            false
        }
    }

    #[test]
    fn transfer_error_panics_become_errors() {
        let mut out = 0i64;
        let result = Transformer::new().transfer(&Panicking, &mut out);
        assert!(matches!(result, Err(TransferError::Internal(ref m)) if m == "boom"));
    }
}
