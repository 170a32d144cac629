//! Conversions from parsed front matter into template [`Value`]s.

use crate::source::Metadata;
use gtmpl_value::Value;
use serde_yaml::Value as Yaml;

/// Converts a YAML value into a template value. Mapping keys that are not
/// strings are dropped.
pub fn from_yaml(yaml: &Yaml) -> Value {
    match yaml {
        Yaml::Null => Value::Nil,
        Yaml::Bool(b) => (*b).into(),
        Yaml::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.into(),
            (None, Some(f)) => f.into(),
            (None, None) => Value::Nil,
        },
        Yaml::String(s) => s.as_str().into(),
        Yaml::Sequence(seq) => Value::Array(seq.iter().map(from_yaml).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .iter()
                .filter_map(|(k, v)| k.as_str().map(|k| (k.to_owned(), from_yaml(v))))
                .collect(),
        ),
    }
}

impl From<&Metadata> for Value {
    /// Converts [`Metadata`] into a [`Value::Object`] so templates can
    /// reference `.metadata.title` and friends.
    fn from(metadata: &Metadata) -> Value {
        Value::Object(
            metadata
                .iter()
                .map(|(k, v)| (k.clone(), from_yaml(v)))
                .collect(),
        )
    }
}
