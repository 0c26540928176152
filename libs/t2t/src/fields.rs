use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;

use crate::error::TransferError;
use crate::tag::TagOptions;
use crate::value::{RecordSlot, RecordView, Slot, Transferable, View};

/// Static description of one declared record field.
///
/// Emitted by `#[derive(Transfer)]` as a `const` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    /// `(namespace, tag)` pairs.
    pub tags: &'static [(&'static str, &'static str)],
    /// Declared `pub`.
    pub exported: bool,
}

impl FieldInfo {
    /// Tag string for `namespace`, empty if none was declared.
    pub fn tag(&self, namespace: &str) -> &'static str {
        self.tags
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map_or("", |(_, tag)| tag)
    }
}

/// A visible field after tag resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declaration index within the record.
    pub index: usize,
    /// Tag name, or the field's own name when the tag has none.
    pub name: String,
    pub options: TagOptions,
    pub exported: bool,
    /// `inline` on a field that is itself a record.
    pub flatten: bool,
}

/// Name → field mapping of one record type under one namespace.
#[derive(Debug, Default)]
pub struct RecordLayout {
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<String, Vec<usize>>,
}

impl RecordLayout {
    /// Visible top-level fields in declaration order (`-` and non-exported
    /// fields removed).
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Field path for `name`, descending through flattened records.
    pub fn lookup(&self, name: &str) -> Option<&[usize]> {
        self.by_name.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

static LAYOUTS: LazyLock<DashMap<(TypeId, String), Arc<RecordLayout>>> = LazyLock::new(DashMap::new);

/// Resolve (and cache) the layout of `record` under `namespace`.
pub fn resolve(record: &dyn RecordView, namespace: &str) -> Arc<RecordLayout> {
    let key = (record.record_id(), namespace.to_string());
    if let Some(layout) = LAYOUTS.get(&key) {
        return Arc::clone(layout.value());
    }

    let layout = Arc::new(build(record, namespace));
    tracing::trace!(namespace, fields = layout.len(), "resolved record layout");
    LAYOUTS.insert(key, Arc::clone(&layout));
    layout
}

fn build(record: &dyn RecordView, namespace: &str) -> RecordLayout {
    let mut layout = RecordLayout::default();

    for (index, info) in record.fields().iter().enumerate() {
        let options = TagOptions::parse(info.tag(namespace));
        if options.is_skipped() || !info.exported {
            continue;
        }

        let nested = match record.field(index).map(|f| f.view()) {
            Some(View::Record(inner)) if options.inline => Some(resolve(inner, namespace)),
            _ => None,
        };

        let name = if options.name.is_empty() {
            info.name.to_string()
        } else {
            options.name.clone()
        };

        match &nested {
            Some(inner) => {
                for (inner_name, path) in &inner.by_name {
                    let mut full = Vec::with_capacity(path.len() + 1);
                    full.push(index);
                    full.extend_from_slice(path);
                    layout.by_name.insert(inner_name.clone(), full);
                }
            }
            None => {
                layout.by_name.insert(name.clone(), vec![index]);
            }
        }

        layout.fields.push(FieldDescriptor {
            index,
            name,
            options,
            exported: info.exported,
            flatten: nested.is_some(),
        });
    }

    layout
}

/// Strictly validate every tag of `record` (and of its inline records)
/// under `namespace`.
pub fn validate_tags(record: &dyn RecordView, namespace: &str) -> Result<(), TransferError> {
    for (index, info) in record.fields().iter().enumerate() {
        let options = TagOptions::parse_strict(info.name, info.tag(namespace))?;
        if options.inline {
            if let Some(View::Record(inner)) = record.field(index).map(|f| f.view()) {
                validate_tags(inner, namespace)?;
            }
        }
    }
    Ok(())
}

/// Follow a field path produced by [`RecordLayout::lookup`].
pub fn field_at<'a>(record: &'a mut dyn RecordSlot, path: &[usize]) -> Option<&'a mut dyn Transferable> {
    let (&first, rest) = path.split_first()?;
    let field = record.field_mut(first)?;
    if rest.is_empty() {
        return Some(field);
    }
    match field.slot() {
        Slot::Record(inner) => field_at(inner, rest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Transfer;

    #[derive(Debug, Default, Transfer)]
    struct Inner {
        #[transfer(t2t = "c")]
        pub c: i64,
        #[transfer(t2t = "shared")]
        pub d: String,
    }

    #[derive(Debug, Default, Transfer)]
    struct Outer {
        #[transfer(t2t = "a")]
        pub a: i64,
        #[transfer(t2t = "-")]
        pub skipped: i64,
        hidden: i64,
        #[transfer(t2t = "shared")]
        pub e: String,
        #[transfer(t2t = ",inline")]
        pub inner: Inner,
        #[transfer(t2t = "plain,inline", json = "j")]
        pub not_record: i64,
    }

    #[test]
    fn resolves_names_paths_and_skips() {
        let outer = Outer::default();
        let layout = resolve(&outer, "t2t");

        assert_eq!(layout.lookup("a"), Some(&[0][..]));
        assert_eq!(layout.lookup("c"), Some(&[4, 0][..]));
        assert_eq!(layout.lookup("skipped"), None);
        assert_eq!(layout.lookup("-"), None);
        assert_eq!(layout.lookup("hidden"), None);
        assert_eq!(layout.lookup("plain"), Some(&[5][..]));

        let visible: Vec<_> = layout.fields().iter().map(|f| f.index).collect();
        assert_eq!(visible, vec![0, 3, 4, 5]);
        assert!(layout.fields()[2].flatten);
        assert!(!layout.fields()[3].flatten);
    }

    #[test]
    fn inline_merge_is_last_write_wins() {
        let layout = resolve(&Outer::default(), "t2t");
        assert_eq!(layout.lookup("shared"), Some(&[4, 1][..]));
    }

    #[test]
    fn namespace_selects_tags() {
        let layout = resolve(&Outer::default(), "json");
        assert_eq!(layout.lookup("j"), Some(&[5][..]));
        assert_eq!(layout.lookup("a"), Some(&[0][..]));
        assert_eq!(layout.lookup("inner"), Some(&[4][..]));
    }

    #[test]
    fn cached_layout_is_shared() {
        let first = resolve(&Inner::default(), "t2t");
        let second = resolve(&Inner::default(), "t2t");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn field_paths_reach_nested_fields() {
        let mut outer = Outer::default();
        let layout = resolve(&outer, "t2t");
        let path = layout.lookup("c").unwrap().to_vec();

        let field = field_at(&mut outer, &path).unwrap();
        crate::transfer(&7i64, field).unwrap();
        assert_eq!(outer.inner.c, 7);
    }

    #[derive(Debug, Default, Transfer)]
    struct BadTag {
        #[transfer(t2t = "bad\"name")]
        pub field: i64,
    }

    #[test]
    fn strict_validation_reports_field() {
        let err = validate_tags(&BadTag::default(), "t2t").unwrap_err();
        assert!(matches!(err, TransferError::InvalidTag { ref field, .. } if field == "field"));
        assert!(validate_tags(&Outer::default(), "t2t").is_ok());

        // lenient resolution falls back to the field name
        let layout = resolve(&BadTag::default(), "t2t");
        assert_eq!(layout.lookup("field"), Some(&[0][..]));
    }
}
