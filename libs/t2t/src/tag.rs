use crate::error::TransferError;

/// Punctuation allowed in a tag name besides letters and digits.
const NAME_PUNCTUATION: &str = "!#$%&()*+-./:<=>?@[]^_{|}~ ";

/// Parsed form of a field tag: `name[,option...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    /// Empty when the field's own name applies.
    pub name: String,
    pub inline: bool,
    pub omit_empty: bool,
}

impl TagOptions {
    /// Parse a tag, never failing. An invalid name is treated as absent.
    pub fn parse(tag: &str) -> Self {
        let (name, options) = split(tag);
        Self {
            name: if is_valid_name(name) { name.to_string() } else { String::new() },
            inline: options.contains("inline"),
            omit_empty: options.contains("omitempty"),
        }
    }

    /// Parse a tag, rejecting a non-empty name with disallowed characters.
    pub fn parse_strict(field: &str, tag: &str) -> Result<Self, TransferError> {
        let (name, _) = split(tag);
        if !name.is_empty() && !is_valid_name(name) {
            return Err(TransferError::InvalidTag {
                field: field.to_string(),
                tag: tag.to_string(),
            });
        }
        Ok(Self::parse(tag))
    }

    /// `-` excludes the field from every transfer.
    pub fn is_skipped(&self) -> bool {
        self.name == "-"
    }
}

fn split(tag: &str) -> (&str, &str) {
    tag.split_once(',').unwrap_or((tag, ""))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphabetic() || c.is_ascii_digit() || NAME_PUNCTUATION.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_only() {
        let opts = TagOptions::parse("user_id");
        assert_eq!(opts.name, "user_id");
        assert!(!opts.inline && !opts.omit_empty);
    }

    #[test]
    fn options_after_first_comma() {
        let opts = TagOptions::parse("id,omitempty");
        assert_eq!(opts.name, "id");
        assert!(opts.omit_empty);
        assert!(!opts.inline);

        let opts = TagOptions::parse(",inline,omitempty");
        assert_eq!(opts.name, "");
        assert!(opts.inline && opts.omit_empty);
    }

    #[test]
    fn options_match_by_substring() {
        let opts = TagOptions::parse("x,noinline,whatever");
        assert!(opts.inline);
    }

    #[test]
    fn invalid_name_falls_back_to_empty() {
        assert_eq!(TagOptions::parse("bad\"name").name, "");
        assert_eq!(TagOptions::parse("back\\slash,omitempty").name, "");
        assert_eq!(TagOptions::parse("ok name-1.x").name, "ok name-1.x");
        assert_eq!(TagOptions::parse("名前").name, "名前");
    }

    #[test]
    fn only_decimal_digits_count() {
        assert_eq!(TagOptions::parse("id42").name, "id42");
        assert_eq!(TagOptions::parse("half½").name, "");
        assert_eq!(TagOptions::parse("x²,omitempty").name, "");
    }

    #[test]
    fn dash_is_skip() {
        assert!(TagOptions::parse("-").is_skipped());
        assert!(TagOptions::parse("-,omitempty").is_skipped());
        assert!(!TagOptions::parse("").is_skipped());
    }

    #[test]
    fn strict_rejects_invalid_name() {
        let err = TagOptions::parse_strict("Name", "na\"me").unwrap_err();
        assert!(matches!(err, TransferError::InvalidTag { ref field, .. } if field == "Name"));
        assert!(TagOptions::parse_strict("Name", ",inline").is_ok());
        assert!(TagOptions::parse_strict("Name", "").is_ok());
    }
}
